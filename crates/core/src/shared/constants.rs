use std::time::Duration;

/// Default backend origin; every API path hangs off this.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Cadence of the live analysis loop while detection is running.
pub const ANALYZE_INTERVAL: Duration = Duration::from_millis(500);

/// Cadence of the backend health probe, independent of the loop.
pub const HEALTH_INTERVAL: Duration = Duration::from_secs(10);

/// Per-request timeout for the health probe (tighter than the default).
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// Client-level timeout for every other API request. No retries.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a toast stays up before the sweep removes it.
pub const TOAST_TTL: Duration = Duration::from_millis(3500);

/// Name the backend reports for faces below its recognition threshold.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Similarity band edges for the faces panel (high ≥ 0.6, medium ≥ 0.4).
pub const HIGH_SIMILARITY: f32 = 0.6;
pub const MEDIUM_SIMILARITY: f32 = 0.4;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
