pub mod completion;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod report;

pub use completion::{CompletionService, GeminiClient};
pub use config::Config;
pub use error::{ConfigError, ExtractError, PipelineError};
pub use extract::{ExtractorConfig, HierarchyExtractor};
pub use model::{HierarchyResult, Module, Submodule};
pub use pipeline::run_pipeline;
pub use report::OutputFormat;
