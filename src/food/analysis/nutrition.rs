use std::sync::Arc;

use crate::capture::validator::ValidatedImage;
use crate::config::ServiceConfig;
use crate::error::Result;
use crate::food::config::FoodConfig;
use crate::food::FoodItem;
use crate::providers::groq::groq::GroqVisionProvider;
use crate::providers::imgbb::imgbb::ImgbbHost;
use crate::providers::traits::{ImageHost, VisionProvider};
use crate::providers::utils::placeholder_food_items;

/// Upload stage followed by the vision stage.
#[derive(Clone)]
pub struct AnalysisPipeline {
    host: Arc<dyn ImageHost>,
    vision: Arc<dyn VisionProvider>,
}

impl AnalysisPipeline {
    pub fn new(host: Arc<dyn ImageHost>, vision: Arc<dyn VisionProvider>) -> Self {
        Self { host, vision }
    }

    /// ImgBB + Groq, sharing one HTTP client.
    pub fn from_config(credentials: FoodConfig, services: &ServiceConfig) -> Result<Self> {
        let client = services.http_client()?;
        let host = ImgbbHost::new(
            client.clone(),
            credentials.imgbb_api_key,
            services.imgbb_api_url.clone(),
        );
        let vision = GroqVisionProvider::new(
            client,
            credentials.groq_api_key,
            services.groq_api_url.clone(),
            services.model.clone(),
            services.max_tokens,
        );
        Ok(Self::new(Arc::new(host), Arc::new(vision)))
    }

    /// Upload errors are returned. Any failure of the vision stage is logged and
    /// answered with the placeholder list instead.
    pub async fn analyze(&self, image: &ValidatedImage) -> Result<Vec<FoodItem>> {
        let blob = image.blob();
        log::info!("Uploading {} ({} bytes) to {}", blob.name, blob.size(), self.host.name());
        let image_url = self.host.upload_image(blob).await?;
        log::debug!("Image hosted at {}", image_url);

        log::info!("Analyzing image with {}", self.vision.get_model_info());
        match self.vision.analyze_image(&image_url).await {
            Ok(items) => {
                log::info!("Model recognized {} item(s)", items.len());
                Ok(items)
            }
            Err(e) => {
                log::error!("Vision analysis failed, using placeholder items: {}", e);
                Ok(placeholder_food_items())
            }
        }
    }
}
