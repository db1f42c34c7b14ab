use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rustyline::DefaultEditor;

use crate::capture::validator::MAX_SIZE_BYTES;
use crate::capture::MediaType;
use crate::error::{FoodLensError, Result};

/// A file chosen by the user, with the type and size the host declared for it.
///
/// `bytes` is `None` when the file is over the upload limit and was not read.
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub name: String,
    pub media_type: MediaType,
    pub size: u64,
    pub bytes: Option<Vec<u8>>,
}

impl PickedFile {
    pub async fn read(path: &Path) -> Result<Self> {
        let size = tokio::fs::metadata(path).await?.len();
        let bytes = if size > MAX_SIZE_BYTES {
            log::debug!("{} is {} bytes, not reading it", path.display(), size);
            None
        } else {
            Some(tokio::fs::read(path).await?)
        };
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        Ok(Self {
            name,
            media_type: MediaType::from_path(path),
            size: bytes.as_ref().map_or(size, |b| b.len() as u64),
            bytes,
        })
    }
}

fn io_error(e: impl ToString) -> FoodLensError {
    FoodLensError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
}

#[async_trait]
pub trait FilePicker: Send + Sync {
    /// Prompts for a file. `accept` is a hint for hosts that can filter;
    /// the returned type is whatever the host declares. `None` means dismissed.
    async fn pick(&self, accept: &[MediaType]) -> Result<Option<PickedFile>>;
}

/// Picker that always returns the same path.
#[derive(Debug, Clone)]
pub struct FixedPathPicker {
    path: PathBuf,
}

impl FixedPathPicker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FilePicker for FixedPathPicker {
    async fn pick(&self, _accept: &[MediaType]) -> Result<Option<PickedFile>> {
        PickedFile::read(&self.path).await.map(Some)
    }
}

/// Asks for a path on the terminal. An empty answer dismisses the prompt.
#[derive(Debug, Clone, Default)]
pub struct TerminalPicker;

#[async_trait]
impl FilePicker for TerminalPicker {
    async fn pick(&self, accept: &[MediaType]) -> Result<Option<PickedFile>> {
        let kinds = accept
            .iter()
            .map(|m| m.mime())
            .collect::<Vec<_>>()
            .join(", ");
        let prompt = format!("📁 Image path ({}): ", kinds);

        let line = tokio::task::spawn_blocking(move || -> Result<String> {
            let mut rl = DefaultEditor::new().map_err(io_error)?;
            match rl.readline(&prompt) {
                Ok(line) => Ok(line),
                Err(_) => Ok(String::new()),
            }
        })
        .await
        .map_err(io_error)??;

        let path = line.trim();
        if path.is_empty() {
            return Ok(None);
        }
        PickedFile::read(Path::new(path)).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_fixed_path_picker_declares_type_from_extension() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(b"not really a jpeg").unwrap();

        let picked = FixedPathPicker::new(file.path())
            .pick(&[MediaType::Jpeg, MediaType::Png])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(picked.media_type, MediaType::Jpeg);
        assert_eq!(picked.bytes.as_deref(), Some(&b"not really a jpeg"[..]));
        assert_eq!(picked.size, 17);
        assert!(picked.name.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_oversized_file_is_not_loaded() {
        let file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.as_file().set_len(MAX_SIZE_BYTES + 1).unwrap();

        let picked = PickedFile::read(file.path()).await.unwrap();

        assert_eq!(picked.size, MAX_SIZE_BYTES + 1);
        assert!(picked.bytes.is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = FixedPathPicker::new("/definitely/not/here.png")
            .pick(&[MediaType::Png])
            .await;
        assert!(matches!(result, Err(FoodLensError::Io(_))));
    }
}
