use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};

use crate::requester::CorrectionReport;

const MAX_RUNS: usize = 20;

#[derive(Debug)]
pub struct RunRecord {
    pub run_id: String,
    pub root: PathBuf,
    pub originals: Vec<PathBuf>, // collected source paths, in collection order
    pub report: CorrectionReport,
    pub created_at: DateTime<Utc>,
}

impl RunRecord {
    pub fn format_summary(&self) -> String {
        format!(
            "**Run {}** `{}` ({}): {} files, {} corrected",
            self.run_id,
            self.root.display(),
            self.created_at,
            self.originals.len(),
            self.report.corrected().count()
        )
    }
}

/// Recent correction runs, kept in memory only so they can be applied later.
#[derive(Debug, Clone, Default)]
pub struct RunStore {
    runs: Arc<Mutex<VecDeque<Arc<RunRecord>>>>,
}

impl RunStore {
    pub fn new() -> Self {
        Self::default()
    }

    // save - store a run, evicting the oldest once the store is full
    pub fn save(&self, root: PathBuf, originals: Vec<PathBuf>, report: CorrectionReport) -> String {
        let run_id = report.run_id.clone();
        let record = Arc::new(RunRecord {
            run_id: run_id.clone(),
            root,
            originals,
            report,
            created_at: Utc::now(),
        });

        let mut runs = self.runs.lock().expect("run store lock poisoned");
        runs.push_front(record);
        runs.truncate(MAX_RUNS);
        run_id
    }

    pub fn get(&self, run_id: &str) -> Option<Arc<RunRecord>> {
        let runs = self.runs.lock().expect("run store lock poisoned");
        runs.iter().find(|r| r.run_id == run_id).cloned()
    }

    // list_recent - newest first
    pub fn list_recent(&self, limit: usize) -> Vec<Arc<RunRecord>> {
        let runs = self.runs.lock().expect("run store lock poisoned");
        runs.iter().take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(run_id: &str) -> CorrectionReport {
        CorrectionReport {
            run_id: run_id.to_string(),
            records: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
        }
    }

    #[test]
    fn saved_runs_can_be_fetched_by_id() {
        let store = RunStore::new();
        let id = store.save("/src".into(), vec!["/src/A.cs".into()], report("run-1"));

        let run = store.get(&id).unwrap();
        assert_eq!(run.run_id, "run-1");
        assert_eq!(run.originals, vec![PathBuf::from("/src/A.cs")]);
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn list_recent_is_newest_first_and_bounded() {
        let store = RunStore::new();
        for i in 0..(MAX_RUNS + 3) {
            store.save("/src".into(), Vec::new(), report(&format!("run-{i}")));
        }

        let recent = store.list_recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].run_id, format!("run-{}", MAX_RUNS + 2));
        assert_eq!(store.list_recent(100).len(), MAX_RUNS);
        assert!(store.get("run-0").is_none());
    }
}
