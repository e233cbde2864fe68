//! Review source files with a locally hosted model and write back its corrections.
//!
//! The pipeline runs in three steps: [`collector`] finds the files,
//! [`requester`] asks the model about each one and stores any corrected copy,
//! and [`updater`] copies those corrections over the originals.

pub mod collector;
pub mod config;
pub mod error;
pub mod fence;
pub mod ollama;
pub mod pipeline;
pub mod prompt;
pub mod requester;
pub mod server;
pub mod store;
pub mod tools;
pub mod updater;

pub use collector::{collect_files, collect_files_excluding};
pub use config::CorrectorConfig;
pub use error::CorrectorError;
pub use ollama::{ModelResponse, OllamaClient};
pub use pipeline::{run_pipeline, PipelineReport};
pub use requester::{
    request_corrections, AnalysisRecord, CorrectionReport, CorrectionStatus, SkipReason,
};
pub use updater::{update_originals, UpdateReport};
