use std::time::Duration;

use iced::widget::image;
use log::info;

use facedeck_core::capture::domain::capture_source::{CaptureSource, Snapshot};
use facedeck_core::capture::infrastructure::folder_source::FolderSource;
use facedeck_core::capture::infrastructure::http_still_source::HttpStillSource;

use crate::settings::CameraSource;

/// How often the viewport pulls a new frame from each source kind.
const HTTP_REFRESH: Duration = Duration::from_millis(100);
const FOLDER_REFRESH: Duration = Duration::from_millis(800);

/// The live feed behind the camera panel. Owns the capture source and the
/// latest frame, both as raw bytes (for analysis) and as a widget handle
/// (for display).
pub struct CameraFeed {
    source: Option<Box<dyn CaptureSource>>,
    error: Option<String>,
    refresh: Duration,
    snapshot: Option<Snapshot>,
    handle: Option<image::Handle>,
}

impl CameraFeed {
    pub fn from_settings(camera: &CameraSource) -> Self {
        let (source, error, refresh): (Option<Box<dyn CaptureSource>>, _, _) = match camera {
            CameraSource::Http { url } => (
                Some(Box::new(HttpStillSource::connect(url, HTTP_REFRESH)) as Box<_>),
                None,
                HTTP_REFRESH,
            ),
            CameraSource::Folder { path } => match FolderSource::open(path) {
                Ok(folder) => (Some(Box::new(folder) as Box<_>), None, FOLDER_REFRESH),
                Err(e) => (None, Some(e.to_string()), FOLDER_REFRESH),
            },
        };
        if let Some(source) = &source {
            info!("camera feed: {}", source.describe());
        }
        Self {
            source,
            error,
            refresh,
            snapshot: None,
            handle: None,
        }
    }

    /// Pulls the next frame if the source has one. Stale frames stay on
    /// screen until replaced.
    pub fn refresh(&mut self) {
        let Some(source) = &mut self.source else {
            return;
        };
        if let Some(snapshot) = source.snapshot() {
            self.handle = Some(image::Handle::from_bytes(snapshot.jpeg.clone()));
            self.snapshot = Some(snapshot);
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh
    }

    /// The frame currently on screen; analysis snapshots this so boxes
    /// always line up with what the user saw.
    pub fn current_snapshot(&self) -> Option<Snapshot> {
        self.snapshot.clone()
    }

    pub fn handle(&self) -> Option<&image::Handle> {
        self.handle.as_ref()
    }

    pub fn frame_size(&self) -> Option<(u32, u32)> {
        self.snapshot.as_ref().map(|s| (s.width, s.height))
    }

    pub fn describe(&self) -> String {
        match &self.source {
            Some(source) => source.describe(),
            None => "no source".to_string(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
