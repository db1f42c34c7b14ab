use std::fmt;

use crate::capture::{ImageBlob, MediaType};

pub const MAX_SIZE_MB: u64 = 20;
pub const MAX_SIZE_BYTES: u64 = MAX_SIZE_MB * 1024 * 1024;

/// An [`ImageBlob`] that passed the type and size checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedImage(ImageBlob);

impl ValidatedImage {
    pub fn blob(&self) -> &ImageBlob {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    InvalidType { media_type: MediaType },
    TooLarge { size: u64, limit_mb: u64 },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::InvalidType { .. } => {
                write!(f, "Invalid file type. Please upload JPEG or PNG.")
            }
            RejectionReason::TooLarge { limit_mb, .. } => {
                write!(f, "File too large. Max size is {}MB.", limit_mb)
            }
        }
    }
}

pub fn validate(blob: ImageBlob) -> Result<ValidatedImage, RejectionReason> {
    if !matches!(blob.media_type, MediaType::Jpeg | MediaType::Png) {
        return Err(RejectionReason::InvalidType {
            media_type: blob.media_type,
        });
    }

    let size = blob.size();
    if size > MAX_SIZE_BYTES {
        return Err(RejectionReason::TooLarge {
            size,
            limit_mb: MAX_SIZE_MB,
        });
    }

    Ok(ValidatedImage(blob))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(media_type: MediaType, size: usize) -> ImageBlob {
        ImageBlob::new("meal", media_type, vec![0u8; size])
    }

    #[test]
    fn test_accepts_jpeg_and_png() {
        assert!(validate(blob(MediaType::Jpeg, 10)).is_ok());
        assert!(validate(blob(MediaType::Png, 10)).is_ok());
    }

    #[test]
    fn test_rejects_other_types() {
        for mime in ["image/gif", "image/webp", "application/pdf", ""] {
            let err = validate(blob(MediaType::Other(mime.to_string()), 10)).unwrap_err();
            assert!(matches!(err, RejectionReason::InvalidType { .. }));
            assert!(err.to_string().contains("JPEG or PNG"));
        }
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let at_limit = validate(blob(MediaType::Png, MAX_SIZE_BYTES as usize));
        assert!(at_limit.is_ok());

        let err = validate(blob(MediaType::Png, MAX_SIZE_BYTES as usize + 1)).unwrap_err();
        assert_eq!(
            err,
            RejectionReason::TooLarge {
                size: MAX_SIZE_BYTES + 1,
                limit_mb: 20
            }
        );
        assert!(err.to_string().contains("20MB"));
    }

    #[test]
    fn test_unread_blob_rejected_by_declared_size() {
        let unread = ImageBlob::unread("huge.jpg", MediaType::Jpeg, MAX_SIZE_BYTES + 1);
        assert!(matches!(
            validate(unread),
            Err(RejectionReason::TooLarge { limit_mb: 20, .. })
        ));
    }

    #[test]
    fn test_type_checked_before_size() {
        let gif = MediaType::Other("image/gif".into());
        let err = validate(blob(gif, MAX_SIZE_BYTES as usize + 1)).unwrap_err();
        assert!(matches!(err, RejectionReason::InvalidType { .. }));
    }
}
