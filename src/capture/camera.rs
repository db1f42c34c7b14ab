//! Camera device contract and the built-in devices.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::ColorType;

use crate::error::{FoodLensError, Result};

const JPEG_QUALITY: u8 = 92;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    /// Rear camera on phones and tablets.
    Environment,
    User,
}

/// A still RGB8 frame taken from a live stream.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Requests a video stream. May suspend until the user grants or denies access.
    /// The facing mode is a preference; devices without it fall back to whatever they have.
    async fn open(&self, facing: FacingMode) -> Result<Box<dyn MediaStream>>;
}

pub trait MediaStream: Send {
    fn current_frame(&self) -> Result<Frame>;

    fn tracks(&self) -> &[Box<dyn MediaTrack>];

    fn tracks_mut(&mut self) -> &mut [Box<dyn MediaTrack>];

    fn track_count(&self) -> usize {
        self.tracks().len()
    }
}

pub trait MediaTrack: Send {
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

pub fn encode_jpeg(frame: &Frame) -> Result<Vec<u8>> {
    if frame.width == 0 || frame.height == 0 {
        return Err(FoodLensError::Encode("preview has no frame yet".to_string()));
    }
    let expected = frame.width as usize * frame.height as usize * 3;
    if frame.pixels.len() != expected {
        return Err(FoodLensError::Encode(format!(
            "frame buffer holds {} bytes, expected {} for {}x{} RGB",
            frame.pixels.len(),
            expected,
            frame.width,
            frame.height
        )));
    }

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
        .encode(&frame.pixels, frame.width, frame.height, ColorType::Rgb8)
        .map_err(|e| FoodLensError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Track whose liveness is shared through an atomic flag.
pub struct FlagTrack {
    live: Arc<AtomicBool>,
}

impl FlagTrack {
    pub fn new(live: Arc<AtomicBool>) -> Self {
        live.store(true, Ordering::SeqCst);
        Self { live }
    }
}

impl MediaTrack for FlagTrack {
    fn stop(&mut self) {
        self.live.store(false, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

/// Stream that renders a gradient test pattern.
pub struct SyntheticStream {
    width: u32,
    height: u32,
    tracks: Vec<Box<dyn MediaTrack>>,
}

impl SyntheticStream {
    pub fn new(width: u32, height: u32, tracks: Vec<Box<dyn MediaTrack>>) -> Self {
        Self {
            width,
            height,
            tracks,
        }
    }
}

impl MediaStream for SyntheticStream {
    fn current_frame(&self) -> Result<Frame> {
        if !self.tracks.iter().any(|t| t.is_live()) {
            return Err(FoodLensError::CameraUnavailable("stream has been stopped".to_string()));
        }

        let mut pixels = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for y in 0..self.height {
            for x in 0..self.width {
                pixels.push((x * 255 / self.width.max(1)) as u8);
                pixels.push((y * 255 / self.height.max(1)) as u8);
                pixels.push(128);
            }
        }

        Ok(Frame {
            width: self.width,
            height: self.height,
            pixels,
        })
    }

    fn tracks(&self) -> &[Box<dyn MediaTrack>] {
        &self.tracks
    }

    fn tracks_mut(&mut self) -> &mut [Box<dyn MediaTrack>] {
        &mut self.tracks
    }
}

/// Test-pattern camera for running without capture hardware.
#[derive(Debug, Clone)]
pub struct StubCamera {
    pub width: u32,
    pub height: u32,
}

impl Default for StubCamera {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

#[async_trait]
impl CameraDevice for StubCamera {
    async fn open(&self, facing: FacingMode) -> Result<Box<dyn MediaStream>> {
        log::info!("StubCamera: opened {}x{} ({:?})", self.width, self.height, facing);
        let track = FlagTrack::new(Arc::new(AtomicBool::new(true)));
        Ok(Box::new(SyntheticStream::new(
            self.width,
            self.height,
            vec![Box::new(track)],
        )))
    }
}

/// Device for hosts without a camera. Every request is refused.
#[derive(Debug, Clone, Default)]
pub struct UnavailableCamera;

#[async_trait]
impl CameraDevice for UnavailableCamera {
    async fn open(&self, _facing: FacingMode) -> Result<Box<dyn MediaStream>> {
        Err(FoodLensError::CameraUnavailable(
            "no capture device is configured".to_string(),
        ))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_jpeg_has_soi_marker() {
        let frame = Frame {
            width: 4,
            height: 2,
            pixels: vec![200; 4 * 2 * 3],
        };
        let jpeg = encode_jpeg(&frame).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_rejects_mismatched_buffer() {
        let frame = Frame {
            width: 4,
            height: 4,
            pixels: vec![0; 10],
        };
        assert!(matches!(encode_jpeg(&frame), Err(FoodLensError::Encode(_))));
    }

    #[test]
    fn test_encode_rejects_empty_frame() {
        let frame = Frame {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        };
        assert!(encode_jpeg(&frame).is_err());
    }

    #[tokio::test]
    async fn test_stub_camera_frame() {
        let stream = StubCamera { width: 16, height: 8 }
            .open(FacingMode::Environment)
            .await
            .unwrap();
        let frame = stream.current_frame().unwrap();
        assert_eq!(frame.pixels.len(), 16 * 8 * 3);
        assert_eq!(stream.track_count(), 1);
    }

    #[tokio::test]
    async fn test_stopped_stream_has_no_frame() {
        let mut stream = StubCamera::default()
            .open(FacingMode::Environment)
            .await
            .unwrap();
        for track in stream.tracks_mut() {
            track.stop();
        }
        assert!(stream.current_frame().is_err());
    }

    #[tokio::test]
    async fn test_unavailable_camera() {
        let result = UnavailableCamera.open(FacingMode::Environment).await;
        assert!(matches!(result, Err(FoodLensError::CameraUnavailable(_))));
    }
}
