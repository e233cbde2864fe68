use std::path::{Path, PathBuf};

use similar::{ChangeTag, TextDiff};

use crate::error::{CorrectorError, Result};
use crate::requester::AnalysisRecord;

/// Line-level summary of what an overwrite changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub hunks: usize,
    pub lines_added: usize,
    pub lines_removed: usize,
}

#[derive(Debug, Clone)]
pub struct UpdatedFile {
    pub original: PathBuf,
    /// File the model reviewed; differs from `original` when another file shares its name
    pub source: PathBuf,
    pub corrected: PathBuf,
    pub diff: DiffSummary,
}

#[derive(Debug)]
pub struct UpdateFailure {
    pub record: AnalysisRecord,
    pub error: CorrectorError,
}

#[derive(Debug, Default)]
pub struct UpdateReport {
    pub updated: Vec<UpdatedFile>,
    /// Records the model had nothing to correct for
    pub unchanged: Vec<PathBuf>,
    /// Corrected outputs with no surviving original of the same name
    pub unmatched: Vec<PathBuf>,
    pub failures: Vec<UpdateFailure>,
}

impl UpdateReport {
    pub fn format_summary(&self) -> String {
        let mut lines = vec![format!(
            "{} updated, {} unchanged, {} unmatched, {} failed",
            self.updated.len(),
            self.unchanged.len(),
            self.unmatched.len(),
            self.failures.len()
        )];
        lines.extend(self.updated.iter().map(|u| {
            format!(
                "- `{}`: {} hunk{} (+{} -{})",
                u.original.display(),
                u.diff.hunks,
                if u.diff.hunks == 1 { "" } else { "s" },
                u.diff.lines_added,
                u.diff.lines_removed
            )
        }));
        lines.extend(
            self.unmatched
                .iter()
                .map(|p| format!("- `{}`: no matching original", p.display())),
        );
        lines.extend(self.failures.iter().map(|f| {
            format!("- `{}`: failed: {}", f.record.file_path.display(), f.error)
        }));
        lines.join("\n")
    }
}

/// Copy each corrected output back over the original with the same file name.
///
/// When several originals share that name the first one in `originals` wins.
/// Every record is handled on its own; a failure is collected in the report and
/// the remaining records are still applied. Overwrites go through a sibling
/// temp file and a rename, so a failed write leaves the original intact.
pub async fn update_originals(originals: &[PathBuf], records: &[AnalysisRecord]) -> UpdateReport {
    let mut report = UpdateReport::default();

    for record in records {
        if !record.is_corrected() {
            report.unchanged.push(record.source_path.clone());
            continue;
        }

        let Some(original) = find_original(originals, &record.file_path) else {
            tracing::warn!(output = %record.file_path.display(), "no original file matches corrected output");
            report.unmatched.push(record.file_path.clone());
            continue;
        };

        if !tokio::fs::try_exists(original).await.unwrap_or(false) {
            tracing::warn!(original = %original.display(), "original file no longer exists");
            report.unmatched.push(record.file_path.clone());
            continue;
        }

        if record.source_path != *original {
            tracing::warn!(
                source = %record.source_path.display(),
                original = %original.display(),
                "correction applied to a different file with the same name"
            );
        }

        match apply_correction(original, &record.file_path).await {
            Ok(diff) => {
                tracing::info!(
                    original = %original.display(),
                    hunks = diff.hunks,
                    added = diff.lines_added,
                    removed = diff.lines_removed,
                    "updated original file"
                );
                report.updated.push(UpdatedFile {
                    original: original.clone(),
                    source: record.source_path.clone(),
                    corrected: record.file_path.clone(),
                    diff,
                });
            }
            Err(error) => {
                tracing::error!(original = %original.display(), "failed to update original: {error}");
                report.failures.push(UpdateFailure {
                    record: record.clone(),
                    error,
                });
            }
        }
    }

    report
}

// find_original - first original whose file name equals the output's, case-sensitive
fn find_original<'a>(originals: &'a [PathBuf], output: &Path) -> Option<&'a PathBuf> {
    let name = output.file_name()?;
    originals.iter().find(|p| p.file_name() == Some(name))
}

async fn apply_correction(original: &Path, corrected: &Path) -> Result<DiffSummary> {
    let new = tokio::fs::read(corrected)
        .await
        .map_err(|e| CorrectorError::io(corrected, e))?;
    let old = tokio::fs::read(original)
        .await
        .map_err(|e| CorrectorError::io(original, e))?;

    let diff = summarize_diff(&String::from_utf8_lossy(&old), &String::from_utf8_lossy(&new));
    replace_file(original, &new).await?;
    Ok(diff)
}

// replace_file - write a sibling temp file, then rename it over `target`.
// Symlinks are followed so the link survives and its target is rewritten; the
// target's permissions are carried over to the replacement.
async fn replace_file(target: &Path, contents: &[u8]) -> Result<()> {
    let target = tokio::fs::canonicalize(target)
        .await
        .map_err(|e| CorrectorError::io(target, e))?;
    let permissions = tokio::fs::metadata(&target)
        .await
        .map_err(|e| CorrectorError::io(&target, e))?
        .permissions();

    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = dir.join(format!(".{name}.{}.tmp", uuid::Uuid::new_v4()));

    if let Err(e) = tokio::fs::write(&temp, contents).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(CorrectorError::io(&temp, e));
    }

    if let Err(e) = tokio::fs::set_permissions(&temp, permissions).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(CorrectorError::io(&temp, e));
    }

    if let Err(e) = tokio::fs::rename(&temp, &target).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(CorrectorError::io(&target, e));
    }

    Ok(())
}

pub fn summarize_diff(old: &str, new: &str) -> DiffSummary {
    let diff = TextDiff::from_lines(old, new);
    let mut summary = DiffSummary::default();

    for hunk in diff.unified_diff().iter_hunks() {
        summary.hunks += 1;
        for change in hunk.iter_changes() {
            match change.tag() {
                ChangeTag::Delete => summary.lines_removed += 1,
                ChangeTag::Insert => summary.lines_added += 1,
                ChangeTag::Equal => {}
            }
        }
    }

    summary
}
