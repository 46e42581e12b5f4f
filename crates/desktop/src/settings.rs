use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use facedeck_core::shared::constants::DEFAULT_BASE_URL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    System,
    Dark,
    Light,
}

impl Appearance {
    /// Header button cycles through these.
    pub fn next(self) -> Self {
        match self {
            Appearance::System => Appearance::Dark,
            Appearance::Dark => Appearance::Light,
            Appearance::Light => Appearance::System,
        }
    }
}

impl std::fmt::Display for Appearance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Appearance::System => write!(f, "Auto"),
            Appearance::Dark => write!(f, "Dark"),
            Appearance::Light => write!(f, "Light"),
        }
    }
}

/// Which live source feeds the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CameraSource {
    /// A still-JPEG endpoint polled over HTTP (`/shot.jpg`-style).
    Http { url: String },
    /// A local directory of images, cycled. Demo mode.
    Folder { path: PathBuf },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub backend_url: String,
    pub camera: CameraSource,
    pub appearance: Appearance,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BASE_URL.to_string(),
            camera: CameraSource::Http {
                url: "http://127.0.0.1:8081/shot.jpg".to_string(),
            },
            appearance: Appearance::System,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceDeck").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Ok(json) = serde_json::to_string_pretty(self) {
                let _ = fs::write(path, json);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_source_round_trips_through_json() {
        let folder = CameraSource::Folder {
            path: PathBuf::from("/tmp/faces"),
        };
        let json = serde_json::to_string(&folder).unwrap();
        assert!(json.contains("\"kind\":\"folder\""));
        assert_eq!(serde_json::from_str::<CameraSource>(&json).unwrap(), folder);

        let http: CameraSource =
            serde_json::from_str(r#"{"kind": "http", "url": "http://cam.local/shot.jpg"}"#).unwrap();
        assert_eq!(
            http,
            CameraSource::Http {
                url: "http://cam.local/shot.jpg".to_string()
            }
        );
    }

    #[test]
    fn test_appearance_cycle_covers_all_modes() {
        let a = Appearance::System;
        assert_eq!(a.next(), Appearance::Dark);
        assert_eq!(a.next().next(), Appearance::Light);
        assert_eq!(a.next().next().next(), Appearance::System);
    }
}
