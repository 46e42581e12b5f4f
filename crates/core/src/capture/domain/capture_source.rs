use std::io::Cursor;
use std::path::PathBuf;

use image::{GenericImageView, ImageReader};
use thiserror::Error;

/// JPEG start-of-image marker; frames starting with it pass through
/// without a re-encode.
const JPEG_MAGIC: [u8; 2] = [0xFF, 0xD8];

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode image data: {0}")]
    Decode(#[from] image::ImageError),
    #[error("no images with a supported extension in {0}")]
    EmptyFolder(PathBuf),
}

/// One still from a capture source: JPEG bytes plus pixel dimensions in
/// the source's native resolution.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Snapshot {
    /// Normalize arbitrary encoded image bytes into a JPEG snapshot.
    ///
    /// JPEG input keeps its bytes (dimensions come from the header);
    /// anything else is decoded and re-encoded.
    pub fn from_encoded(bytes: Vec<u8>) -> Result<Self, CaptureError> {
        if bytes.starts_with(&JPEG_MAGIC) {
            let (width, height) = ImageReader::new(Cursor::new(&bytes))
                .with_guessed_format()
                .map_err(image::ImageError::IoError)?
                .into_dimensions()?;
            return Ok(Self {
                jpeg: bytes,
                width,
                height,
            });
        }

        let decoded = image::load_from_memory(&bytes)?;
        let (width, height) = decoded.dimensions();
        let mut jpeg = Vec::new();
        decoded.write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)?;
        Ok(Self {
            jpeg,
            width,
            height,
        })
    }
}

/// A live producer of frames for the dashboard.
///
/// Implementations may be stateful, and acquisition cost must stay out of
/// the caller's frame budget: fetch in the background or read cheap local
/// data. Callers treat a `None` snapshot as "skip this cycle".
pub trait CaptureSource: Send {
    /// Whether at least one frame is available.
    fn ready(&self) -> bool;

    /// The most recent frame, if any.
    fn snapshot(&mut self) -> Option<Snapshot>;

    /// Short description for the status strip.
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn encoded(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            Rgb([200, 120, 40]),
        ));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }

    #[test]
    fn test_jpeg_bytes_pass_through() {
        let jpeg = encoded(8, 6, image::ImageFormat::Jpeg);
        let snapshot = Snapshot::from_encoded(jpeg.clone()).unwrap();
        assert_eq!(snapshot.jpeg, jpeg);
        assert_eq!((snapshot.width, snapshot.height), (8, 6));
    }

    #[test]
    fn test_png_is_transcoded_to_jpeg() {
        let png = encoded(5, 7, image::ImageFormat::Png);
        let snapshot = Snapshot::from_encoded(png).unwrap();
        assert!(snapshot.jpeg.starts_with(&JPEG_MAGIC));
        assert_eq!((snapshot.width, snapshot.height), (5, 7));
    }

    #[test]
    fn test_garbage_bytes_are_an_error() {
        assert!(Snapshot::from_encoded(vec![0x00, 0x01, 0x02, 0x03]).is_err());
    }
}
