pub mod nutrition;

pub use nutrition::AnalysisPipeline;
