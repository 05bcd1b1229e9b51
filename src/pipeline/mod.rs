// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod orchestrator;
mod progress;
mod prompt;

pub use orchestrator::RagPipeline;
pub use progress::{IndexingStats, ProgressTracker};
pub use prompt::PromptTemplate;
