//! Persistent analysis store.
//!
//! Holds the most recent combined report so it can be re-rendered offline and
//! keeps a per-run history. This replaces ambient cross-view state with an
//! explicit store owned by the CLI entrypoint; `reset` is the explicit
//! discard operation.

use crate::report::CombinedReport;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".finlens")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub saved_at: DateTime<Utc>,
    pub report: CombinedReport,
}

pub struct AnalysisStore {
    dir: PathBuf,
}

impl Default for AnalysisStore {
    fn default() -> Self {
        Self { dir: default_dir() }
    }
}

impl AnalysisStore {
    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn latest_path(&self) -> PathBuf {
        self.dir.join("latest.json")
    }

    pub fn save(&self, report: &CombinedReport) -> Result<()> {
        let snapshot = AnalysisSnapshot {
            saved_at: Utc::now(),
            report: report.clone(),
        };
        let history = self.dir.join("history");
        std::fs::create_dir_all(&history)?;
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(
            history.join(format!("{}.json", snapshot.saved_at.format("%Y%m%dT%H%M%S"))),
            &json,
        )?;
        std::fs::write(self.latest_path(), &json)?;
        Ok(())
    }

    pub fn load_latest(&self) -> Option<AnalysisSnapshot> {
        let content = std::fs::read_to_string(self.latest_path()).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Explicitly discard the stored snapshot. History files are kept.
    pub fn reset(&self) -> Result<()> {
        match std::fs::remove_file(self.latest_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> CombinedReport {
        CombinedReport {
            session_id: "abc123".into(),
            generated_at: Utc::now(),
            summary: Some("**Overall**: stable".into()),
            sections_attempted: 1,
            ..CombinedReport::default()
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AnalysisStore::at(tmp.path().to_path_buf());
        store.save(&sample_report()).unwrap();

        let snapshot = store.load_latest().unwrap();
        assert_eq!(snapshot.report.session_id, "abc123");
        assert_eq!(snapshot.report.summary.as_deref(), Some("**Overall**: stable"));
    }

    #[test]
    fn save_appends_history() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AnalysisStore::at(tmp.path().to_path_buf());
        store.save(&sample_report()).unwrap();
        let entries = std::fs::read_dir(tmp.path().join("history")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn reset_clears_latest_and_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AnalysisStore::at(tmp.path().to_path_buf());
        store.save(&sample_report()).unwrap();
        store.reset().unwrap();
        assert!(store.load_latest().is_none());
        store.reset().unwrap();
    }

    #[test]
    fn load_missing_returns_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AnalysisStore::at(tmp.path().to_path_buf());
        assert!(store.load_latest().is_none());
    }
}
