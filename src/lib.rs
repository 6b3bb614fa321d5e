pub mod cache;
pub mod cli;
pub mod config;
pub mod cost;
pub mod error;
pub mod generator;
pub mod i18n;
pub mod llm;
pub mod research;
pub mod sources;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::PipelineError;
pub use generator::context::GeneratorContext;
pub use generator::workflow::{ContentPipeline, ContentResponse, launch};
pub use types::request::ContentRequest;
