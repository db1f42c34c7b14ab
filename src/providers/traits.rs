use async_trait::async_trait;

use crate::capture::ImageBlob;
use crate::error::Result;
use crate::food::FoodItem;

/// Public image hosting. Implementations fail with `FoodLensError::UploadError`.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Uploads the blob and returns a URL the vision service can fetch.
    async fn upload_image(&self, blob: &ImageBlob) -> Result<String>;

    fn name(&self) -> &str;
}

/// Vision-language model that estimates nutrition from an image URL.
/// Implementations fail with `FoodLensError::AnalysisError`.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    async fn analyze_image(&self, image_url: &str) -> Result<Vec<FoodItem>>;

    fn get_model_info(&self) -> String;
}
