pub mod capture;
pub mod commands;
pub mod config;
pub mod error;
pub mod food;
pub mod providers;
pub mod render;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used items
pub use capture::{CaptureController, ImageBlob, MediaType};
pub use error::{FoodLensError, Result};
pub use food::analysis::AnalysisPipeline;
pub use food::{FoodConfig, FoodItem};
pub use session::{Session, ViewState};
