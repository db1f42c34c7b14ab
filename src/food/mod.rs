pub mod analysis;
pub mod config;
pub mod item;

pub use config::FoodConfig;
pub use item::FoodItem;
