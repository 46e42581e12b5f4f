use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, warn};

use crate::capture::domain::capture_source::{CaptureSource, Snapshot};

/// Connect timeout for each still fetch; slower than this and the cycle
/// is better spent on the next frame.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Polls a still-JPEG URL (`/shot.jpg`-style camera endpoints) from a
/// background thread and keeps the latest frame for the dashboard.
///
/// Fetch failures never surface as UI errors: the source just reports not
/// ready until a frame lands. The thread stops when the source drops.
pub struct HttpStillSource {
    url: String,
    frames: Receiver<Snapshot>,
    last: Option<Snapshot>,
    stop: Arc<AtomicBool>,
}

impl HttpStillSource {
    /// Spawn the fetch thread. Returns immediately; `ready()` flips once
    /// the first frame arrives.
    pub fn connect(url: impl Into<String>, interval: Duration) -> Self {
        let url = url.into();
        let (tx, rx) = unbounded();
        let stop = Arc::new(AtomicBool::new(false));

        let thread_url = url.clone();
        let thread_stop = Arc::clone(&stop);
        thread::spawn(move || fetch_loop(&thread_url, interval, &tx, &thread_stop));

        Self {
            url,
            frames: rx,
            last: None,
            stop,
        }
    }
}

impl CaptureSource for HttpStillSource {
    fn ready(&self) -> bool {
        self.last.is_some() || !self.frames.is_empty()
    }

    fn snapshot(&mut self) -> Option<Snapshot> {
        // Drain to the newest frame; older ones are already history.
        if let Some(snapshot) = self.frames.try_iter().last() {
            self.last = Some(snapshot);
        }
        self.last.clone()
    }

    fn describe(&self) -> String {
        format!("camera {}", self.url)
    }
}

impl Drop for HttpStillSource {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

fn fetch_loop(url: &str, interval: Duration, frames: &Sender<Snapshot>, stop: &AtomicBool) {
    let client = match reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!("camera fetch thread could not build an http client: {e}");
            return;
        }
    };

    let mut failing = false;
    while !stop.load(Ordering::Relaxed) {
        match fetch_frame(&client, url) {
            Ok(snapshot) => {
                failing = false;
                if frames.send(snapshot).is_err() {
                    // Receiver gone; the source was dropped.
                    break;
                }
            }
            Err(e) => {
                // First failure is worth a warning; repeats only clutter.
                if failing {
                    debug!("camera fetch from {url} still failing: {e}");
                } else {
                    warn!("camera fetch from {url} failed: {e}");
                    failing = true;
                }
            }
        }
        thread::sleep(interval);
    }
}

fn fetch_frame(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<Snapshot, Box<dyn std::error::Error>> {
    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
    Ok(Snapshot::from_encoded(bytes.to_vec())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    fn tiny_jpeg() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            4,
            4,
            image::Rgb([10, 20, 30]),
        ));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Jpeg,
        )
        .unwrap();
        bytes
    }

    /// One-socket HTTP server handing the same JPEG to every request.
    fn serve_jpeg(jpeg: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let header = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    jpeg.len()
                );
                let _ = stream.write_all(header.as_bytes());
                let _ = stream.write_all(&jpeg);
            }
        });
        format!("http://{addr}/shot.jpg")
    }

    #[test]
    fn test_receives_frames_from_still_endpoint() {
        let url = serve_jpeg(tiny_jpeg());
        let mut source = HttpStillSource::connect(url, Duration::from_millis(10));

        let mut snapshot = None;
        for _ in 0..200 {
            if let Some(s) = source.snapshot() {
                snapshot = Some(s);
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        let snapshot = snapshot.expect("no frame within deadline");
        assert!(snapshot.jpeg.starts_with(&[0xFF, 0xD8]));
        assert_eq!((snapshot.width, snapshot.height), (4, 4));
        assert!(source.ready());
    }

    #[test]
    fn test_unreachable_endpoint_is_just_not_ready() {
        let mut source =
            HttpStillSource::connect("http://127.0.0.1:1/shot.jpg", Duration::from_millis(50));
        thread::sleep(Duration::from_millis(100));
        assert!(!source.ready());
        assert!(source.snapshot().is_none());
    }
}
