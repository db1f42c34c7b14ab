pub mod groq;
pub mod imgbb;
pub mod traits;
pub mod utils;
