use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{CorrectorError, Result};
use crate::fence::extract_fenced_block;
use crate::ollama::OllamaClient;
use crate::prompt::{build_prompt, language_tag, truncate_chars};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionStatus {
    /// A fenced block was found and written to `file_path`
    Corrected,
    /// The model answered without a fenced block; nothing was written
    NoCorrection,
}

/// Result of analysing one file. Built only after any output write succeeded.
#[derive(Debug, Clone)]
pub struct AnalysisRecord {
    pub source_path: PathBuf,
    pub file_path: PathBuf, // destination of the corrected copy
    pub analyzed_result: String,
    pub status: CorrectionStatus,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn is_corrected(&self) -> bool {
        self.status == CorrectionStatus::Corrected
    }

    pub fn format_summary(&self) -> String {
        let status = match self.status {
            CorrectionStatus::Corrected => format!("corrected -> `{}`", self.file_path.display()),
            CorrectionStatus::NoCorrection => "no correction".to_string(),
        };
        format!(
            "`{}` ({}): {}",
            self.source_path.display(),
            self.analyzed_at,
            status
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BlankContent,
    NoResponse,
}

#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: CorrectorError,
}

#[derive(Debug)]
pub struct CorrectionReport {
    pub run_id: String,
    pub records: Vec<AnalysisRecord>,
    pub skipped: Vec<(PathBuf, SkipReason)>,
    pub failures: Vec<FileFailure>,
}

impl CorrectionReport {
    pub fn corrected(&self) -> impl Iterator<Item = &AnalysisRecord> {
        self.records.iter().filter(|r| r.is_corrected())
    }

    pub fn format_summary(&self) -> String {
        let mut lines = vec![format!(
            "**Run {}**: {} analysed, {} corrected, {} skipped, {} failed",
            self.run_id,
            self.records.len(),
            self.corrected().count(),
            self.skipped.len(),
            self.failures.len()
        )];
        lines.extend(self.records.iter().map(|r| format!("- {}", r.format_summary())));
        lines.extend(
            self.skipped
                .iter()
                .map(|(path, reason)| format!("- `{}`: skipped ({reason:?})", path.display())),
        );
        lines.extend(
            self.failures
                .iter()
                .map(|f| format!("- `{}`: failed: {}", f.path.display(), f.error)),
        );
        lines.join("\n")
    }
}

enum FileOutcome {
    Analysed(AnalysisRecord),
    Skipped(SkipReason),
}

/// Ask the model to review each file in turn.
///
/// Files are handled one at a time and each failure is contained to its file:
/// it is logged, recorded in `failures`, and the batch moves on.
pub async fn request_corrections(
    client: &OllamaClient,
    files: &[PathBuf],
    output_dir: &Path,
    char_budget: usize,
) -> CorrectionReport {
    let run_id = uuid::Uuid::new_v4().to_string();
    let mut report = CorrectionReport {
        run_id: run_id.clone(),
        records: Vec::new(),
        skipped: Vec::new(),
        failures: Vec::new(),
    };

    tracing::info!(%run_id, files = files.len(), model = client.model(), "requesting corrections");

    for path in files {
        match correct_file(client, path, output_dir, char_budget).await {
            Ok(FileOutcome::Analysed(record)) => report.records.push(record),
            Ok(FileOutcome::Skipped(reason)) => report.skipped.push((path.clone(), reason)),
            Err(error) => {
                tracing::error!(%run_id, path = %path.display(), "failed to analyse file: {error}");
                report.failures.push(FileFailure {
                    path: path.clone(),
                    error,
                });
            }
        }
    }

    tracing::info!(
        %run_id,
        analysed = report.records.len(),
        skipped = report.skipped.len(),
        failed = report.failures.len(),
        "correction requests finished"
    );
    report
}

async fn correct_file(
    client: &OllamaClient,
    path: &Path,
    output_dir: &Path,
    char_budget: usize,
) -> Result<FileOutcome> {
    let file_name = path
        .file_name()
        .ok_or_else(|| {
            CorrectorError::InvalidArgument(format!("{} has no file name", path.display()))
        })?
        .to_owned();

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| CorrectorError::io(path, e))?;
    let content = String::from_utf8_lossy(&bytes);

    if content.trim().is_empty() {
        tracing::info!(path = %path.display(), "file is blank, skipping");
        return Ok(FileOutcome::Skipped(SkipReason::BlankContent));
    }

    let snippet = truncate_chars(&content, char_budget);
    let prompt = build_prompt(
        &file_name.to_string_lossy(),
        &language_tag(path),
        snippet,
    );

    let Some(reply) = client.generate(&prompt).await? else {
        tracing::warn!(path = %path.display(), "model returned no response, skipping");
        return Ok(FileOutcome::Skipped(SkipReason::NoResponse));
    };

    let analyzed_result = reply.trim().to_string();
    let output_path = output_dir.join(&file_name);

    let status = match extract_fenced_block(&analyzed_result) {
        Some(code) => {
            tokio::fs::create_dir_all(output_dir)
                .await
                .map_err(|e| CorrectorError::io(output_dir, e))?;
            tokio::fs::write(&output_path, code)
                .await
                .map_err(|e| CorrectorError::io(&output_path, e))?;
            tracing::info!(path = %path.display(), output = %output_path.display(), "wrote corrected file");
            CorrectionStatus::Corrected
        }
        None => {
            tracing::info!(path = %path.display(), "no corrected code found");
            CorrectionStatus::NoCorrection
        }
    };

    Ok(FileOutcome::Analysed(AnalysisRecord {
        source_path: path.to_path_buf(),
        file_path: output_path,
        analyzed_result,
        status,
        analyzed_at: Utc::now(),
    }))
}
