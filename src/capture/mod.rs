//! Image acquisition from the file picker or a live camera.
//!
//! Both paths end in a single in-memory [`ImageBlob`]. The [`CaptureController`]
//! is the only owner of the camera session and keeps at most one open.

pub mod camera;
pub mod picker;
pub mod validator;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};

use crate::error::{FoodLensError, Result};
use camera::{encode_jpeg, CameraDevice, FacingMode, MediaStream};
use picker::FilePicker;

/// File name given to every frame taken from the live preview.
pub const CAMERA_CAPTURE_NAME: &str = "camera-capture.jpg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaType {
    Jpeg,
    Png,
    Other(String),
}

impl MediaType {
    pub fn mime(&self) -> &str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Other(mime) => mime,
        }
    }

    /// Declared type of a file, guessed from its extension the way a browser file input does.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "jpg" | "jpeg" | "jfif" => MediaType::Jpeg,
            "png" => MediaType::Png,
            "gif" => MediaType::Other("image/gif".to_string()),
            "webp" => MediaType::Other("image/webp".to_string()),
            "bmp" => MediaType::Other("image/bmp".to_string()),
            "heic" => MediaType::Other("image/heic".to_string()),
            _ => MediaType::Other("application/octet-stream".to_string()),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// In-memory image payload with its declared type.
///
/// `size` is the declared byte size. It equals `bytes.len()` except for files
/// too large to load, which carry their on-disk size and no bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlob {
    pub name: String,
    pub media_type: MediaType,
    pub bytes: Vec<u8>,
    size: u64,
}

impl ImageBlob {
    pub fn new(name: impl Into<String>, media_type: MediaType, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type,
            size: bytes.len() as u64,
            bytes,
        }
    }

    /// A blob known only by its declared size; its contents were never read.
    pub fn unread(name: impl Into<String>, media_type: MediaType, size: u64) -> Self {
        Self {
            name: name.into(),
            media_type,
            bytes: Vec::new(),
            size,
        }
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type.mime(),
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

struct CameraSession {
    stream: Box<dyn MediaStream>,
}

impl CameraSession {
    fn close(mut self) {
        for track in self.stream.tracks_mut() {
            track.stop();
        }
    }
}

pub struct CaptureController {
    camera: Arc<dyn CameraDevice>,
    picker: Arc<dyn FilePicker>,
    session: Option<CameraSession>,
}

impl CaptureController {
    pub fn new(camera: Arc<dyn CameraDevice>, picker: Arc<dyn FilePicker>) -> Self {
        Self {
            camera,
            picker,
            session: None,
        }
    }

    pub fn is_camera_open(&self) -> bool {
        self.session.is_some()
    }

    /// Closes the camera and asks the configured picker for an image.
    /// `Ok(None)` means the picker was dismissed.
    pub async fn start_upload(&mut self) -> Result<Option<ImageBlob>> {
        let picker = Arc::clone(&self.picker);
        self.start_upload_with(picker.as_ref()).await
    }

    pub async fn start_upload_with(
        &mut self,
        picker: &dyn FilePicker,
    ) -> Result<Option<ImageBlob>> {
        self.stop_camera();

        let picked = picker.pick(&[MediaType::Jpeg, MediaType::Png]).await?;
        Ok(picked.map(|file| {
            log::debug!("Picked {} ({} bytes, {})", file.name, file.size, file.media_type);
            match file.bytes {
                Some(bytes) => ImageBlob::new(file.name, file.media_type, bytes),
                None => ImageBlob::unread(file.name, file.media_type, file.size),
            }
        }))
    }

    /// Replaces any open session with a fresh stream from the camera device.
    pub async fn start_camera(&mut self) -> Result<()> {
        self.stop_camera();

        let stream = self
            .camera
            .open(FacingMode::Environment)
            .await
            .map_err(|e| {
                log::error!("Camera access failed: {}", e);
                e
            })?;

        log::info!("Camera session opened with {} track(s)", stream.track_count());
        self.session = Some(CameraSession { stream });
        Ok(())
    }

    /// Grabs the current preview frame as a JPEG blob and closes the session.
    pub fn capture(&mut self) -> Result<ImageBlob> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| {
                FoodLensError::CameraUnavailable("no camera session is open".to_string())
            })?;

        let frame = session.stream.current_frame()?;
        let bytes = encode_jpeg(&frame)?;
        self.stop_camera();

        Ok(ImageBlob::new(CAMERA_CAPTURE_NAME, MediaType::Jpeg, bytes))
    }

    pub fn stop_camera(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("Stopping camera session");
            session.close();
        }
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.stop_camera();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::camera::testing::{FakeCamera, FakeStreamHandle};
    use crate::capture::picker::{FixedPathPicker, PickedFile};
    use async_trait::async_trait;
    use std::io::Write;

    struct DismissedPicker;

    #[async_trait]
    impl FilePicker for DismissedPicker {
        async fn pick(&self, _accept: &[MediaType]) -> Result<Option<PickedFile>> {
            Ok(None)
        }
    }

    fn controller(camera: Arc<FakeCamera>) -> CaptureController {
        CaptureController::new(camera, Arc::new(DismissedPicker))
    }

    #[test]
    fn test_media_type_from_path() {
        assert_eq!(MediaType::from_path(Path::new("lunch.JPG")), MediaType::Jpeg);
        assert_eq!(MediaType::from_path(Path::new("lunch.jpeg")), MediaType::Jpeg);
        assert_eq!(MediaType::from_path(Path::new("plate.png")), MediaType::Png);
        assert_eq!(
            MediaType::from_path(Path::new("anim.gif")),
            MediaType::Other("image/gif".to_string())
        );
        assert_eq!(MediaType::from_path(Path::new("noext")).mime(), "application/octet-stream");
    }

    #[test]
    fn test_data_url() {
        let blob = ImageBlob::new("a.png", MediaType::Png, vec![1, 2, 3]);
        assert_eq!(blob.to_data_url(), "data:image/png;base64,AQID");
        assert_eq!(blob.size(), 3);
    }

    #[test]
    fn test_unread_blob_keeps_declared_size() {
        let blob = ImageBlob::unread("huge.jpg", MediaType::Jpeg, 42);
        assert_eq!(blob.size(), 42);
        assert!(blob.bytes.is_empty());
    }

    #[tokio::test]
    async fn test_second_camera_start_stops_previous_tracks() {
        let camera = Arc::new(FakeCamera::new());
        let mut controller = controller(camera.clone());

        controller.start_camera().await.unwrap();
        controller.start_camera().await.unwrap();

        let streams: Vec<FakeStreamHandle> = camera.opened_streams();
        assert_eq!(streams.len(), 2);
        assert!(streams[0].all_stopped());
        assert!(!streams[1].any_stopped());
        assert_eq!(camera.live_sessions(), 1);
        assert!(controller.is_camera_open());
    }

    #[tokio::test]
    async fn test_camera_requests_rear_facing() {
        let camera = Arc::new(FakeCamera::new());
        let mut controller = controller(camera.clone());

        controller.start_camera().await.unwrap();
        assert_eq!(camera.requested_facing(), vec![FacingMode::Environment]);
    }

    #[tokio::test]
    async fn test_failed_camera_leaves_no_session() {
        let camera = Arc::new(FakeCamera::denied());
        let mut controller = controller(camera);

        let err = controller.start_camera().await.unwrap_err();
        assert!(matches!(err, FoodLensError::CameraUnavailable(_)));
        assert!(!controller.is_camera_open());
    }

    #[tokio::test]
    async fn test_capture_produces_jpeg_and_closes_session() {
        let camera = Arc::new(FakeCamera::new());
        let mut controller = controller(camera.clone());
        controller.start_camera().await.unwrap();

        let blob = controller.capture().unwrap();
        assert_eq!(blob.name, CAMERA_CAPTURE_NAME);
        assert_eq!(blob.media_type, MediaType::Jpeg);
        assert_eq!(&blob.bytes[..2], &[0xFF, 0xD8]);
        assert!(!controller.is_camera_open());
        assert!(camera.opened_streams()[0].all_stopped());
    }

    #[test]
    fn test_capture_without_session_fails() {
        let mut controller = controller(Arc::new(FakeCamera::new()));
        assert!(matches!(
            controller.capture(),
            Err(FoodLensError::CameraUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_stop_camera_is_idempotent() {
        let camera = Arc::new(FakeCamera::new());
        let mut controller = controller(camera.clone());
        controller.stop_camera();
        controller.start_camera().await.unwrap();
        controller.stop_camera();
        controller.stop_camera();
        assert_eq!(camera.live_sessions(), 0);
    }

    #[tokio::test]
    async fn test_upload_closes_camera_and_reads_file() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

        let camera = Arc::new(FakeCamera::new());
        let mut controller = controller(camera.clone());
        controller.start_camera().await.unwrap();

        let picker = FixedPathPicker::new(file.path());
        let blob = controller.start_upload_with(&picker).await.unwrap().unwrap();

        assert_eq!(blob.media_type, MediaType::Png);
        assert_eq!(blob.size(), 4);
        assert!(!controller.is_camera_open());
        assert_eq!(camera.live_sessions(), 0);
    }

    #[tokio::test]
    async fn test_dismissed_picker_yields_nothing() {
        let mut controller = controller(Arc::new(FakeCamera::new()));
        assert!(controller.start_upload().await.unwrap().is_none());
    }
}
