use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::capture::domain::capture_source::{CaptureError, CaptureSource, Snapshot};
use crate::shared::constants::IMAGE_EXTENSIONS;

/// Cycles through a directory's images in name order, the demo and test
/// stand-in for a live camera.
pub struct FolderSource {
    dir: PathBuf,
    files: Vec<PathBuf>,
    next: usize,
}

impl FolderSource {
    /// List the directory's image files. A missing directory or one with
    /// no supported images is a configuration error worth surfacing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CaptureError> {
        let dir = dir.into();
        let entries = fs::read_dir(&dir).map_err(|e| CaptureError::Read {
            path: dir.clone(),
            source: e,
        })?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| has_image_extension(path))
            .collect();
        files.sort();
        if files.is_empty() {
            return Err(CaptureError::EmptyFolder(dir));
        }
        Ok(Self {
            dir,
            files,
            next: 0,
        })
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

impl CaptureSource for FolderSource {
    fn ready(&self) -> bool {
        !self.files.is_empty()
    }

    fn snapshot(&mut self) -> Option<Snapshot> {
        // At most one lap; files that stopped decoding are skipped.
        for _ in 0..self.files.len() {
            let path = self.files[self.next].clone();
            self.next = (self.next + 1) % self.files.len();
            match fs::read(&path) {
                Ok(bytes) => match Snapshot::from_encoded(bytes) {
                    Ok(snapshot) => return Some(snapshot),
                    Err(e) => warn!("skipping undecodable image {}: {e}", path.display()),
                },
                Err(e) => warn!("skipping unreadable image {}: {e}", path.display()),
            }
        }
        None
    }

    fn describe(&self) -> String {
        format!("folder {}", self.dir.display())
    }
}
