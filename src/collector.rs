use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::config::DEFAULT_EXCLUDED_FOLDERS;
use crate::error::{CorrectorError, Result};

/// Collect files under `root` whose extension is in `extensions`, skipping the
/// built-in excluded folders.
pub fn collect_files<E: AsRef<str>>(root: &Path, extensions: &[E]) -> Result<Vec<PathBuf>> {
    collect_files_excluding(root, extensions, DEFAULT_EXCLUDED_FOLDERS)
}

/// Collect files under `root` whose extension is in `extensions`.
///
/// Directories whose path below `root` contains one of `excluded` as a whole
/// segment (compared case-insensitively) are skipped along with everything under
/// them. `root` itself is never filtered. Results are grouped per directory, then
/// per extension in the order given; duplicates are not removed.
///
/// A filesystem error stops the walk but is not fatal: it is logged and the
/// paths gathered up to that point are returned.
pub fn collect_files_excluding<E: AsRef<str>, X: AsRef<str>>(
    root: &Path,
    extensions: &[E],
    excluded: &[X],
) -> Result<Vec<PathBuf>> {
    if extensions.is_empty() {
        return Err(CorrectorError::InvalidArgument(
            "at least one file extension is required".into(),
        ));
    }

    let extensions: Vec<String> = extensions
        .iter()
        .map(|e| normalize_extension(e.as_ref()))
        .collect();
    let excluded: Vec<String> = excluded
        .iter()
        .map(|x| x.as_ref().to_lowercase())
        .collect();

    let mut found = Vec::new();

    if let Err(e) = list_matching(root, &extensions, &mut found) {
        tracing::error!(root = %root.display(), "failed to list files: {e}");
        return Ok(found);
    }

    let dirs = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded(root, entry.path(), &excluded));

    for entry in dirs {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!(root = %root.display(), "directory walk failed: {e}");
                break;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        if let Err(e) = list_matching(entry.path(), &extensions, &mut found) {
            tracing::error!(dir = %entry.path().display(), "failed to list files: {e}");
            break;
        }
    }

    tracing::debug!(root = %root.display(), count = found.len(), "collected files");
    Ok(found)
}

// list_matching - files directly inside `dir`, one pass per extension
fn list_matching(dir: &Path, extensions: &[String], found: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    for ext in extensions {
        found.extend(
            files
                .iter()
                .filter(|path| {
                    path.extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
                })
                .cloned(),
        );
    }

    Ok(())
}

fn is_excluded(root: &Path, path: &Path, excluded: &[String]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|component| match component {
        Component::Normal(name) => name
            .to_str()
            .is_some_and(|name| excluded.contains(&name.to_lowercase())),
        _ => false,
    })
}

// ".cs", "*.cs" and "cs" all mean the same thing
fn normalize_extension(ext: &str) -> String {
    ext.trim()
        .trim_start_matches('*')
        .trim_start_matches('.')
        .to_string()
}
