use std::path::{Path, PathBuf};

use crate::collector::collect_files_excluding;
use crate::config::CorrectorConfig;
use crate::error::Result;
use crate::ollama::OllamaClient;
use crate::requester::{request_corrections, CorrectionReport};
use crate::updater::{update_originals, UpdateReport};

#[derive(Debug)]
pub struct PipelineReport {
    pub files: Vec<PathBuf>,
    pub corrections: CorrectionReport,
    /// Present only when the run was asked to apply corrections
    pub update: Option<UpdateReport>,
}

impl PipelineReport {
    pub fn format_summary(&self) -> String {
        let mut text = format!(
            "{} file{} collected\n\n{}",
            self.files.len(),
            if self.files.len() == 1 { "" } else { "s" },
            self.corrections.format_summary()
        );
        if let Some(update) = &self.update {
            text.push_str("\n\n");
            text.push_str(&update.format_summary());
        }
        text
    }
}

/// Collect, review and optionally write corrections back over the originals.
pub async fn run_pipeline<E: AsRef<str>>(
    config: &CorrectorConfig,
    root: &Path,
    extensions: &[E],
    output_dir: &Path,
    apply: bool,
) -> Result<PipelineReport> {
    let files = collect_files_excluding(root, extensions, &config.excluded_folders)?;
    let client = OllamaClient::new(config)?;

    let corrections = request_corrections(&client, &files, output_dir, config.char_budget).await;

    let update = if apply {
        Some(update_originals(&files, &corrections.records).await)
    } else {
        None
    };

    Ok(PipelineReport {
        files,
        corrections,
        update,
    })
}
