use thiserror::Error;

use crate::capture::validator::RejectionReason;

#[derive(Error, Debug)]
pub enum FoodLensError {
    #[error("Invalid file type. Please upload JPEG or PNG.")]
    InvalidType,
    #[error("File too large. Max size is {limit_mb}MB.")]
    TooLarge { limit_mb: u64 },
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),
    #[error("{0}")]
    UploadError(String),
    #[error("Analysis error: {0}")]
    AnalysisError(String),
    #[error("No image selected")]
    NoActiveImage,
    #[error("Analysis already in progress")]
    AnalysisInFlight,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Encode(String),
}

impl From<RejectionReason> for FoodLensError {
    fn from(reason: RejectionReason) -> Self {
        match reason {
            RejectionReason::InvalidType { .. } => FoodLensError::InvalidType,
            RejectionReason::TooLarge { limit_mb, .. } => FoodLensError::TooLarge { limit_mb },
        }
    }
}

pub type Result<T> = std::result::Result<T, FoodLensError>;
