//! Flat-directory store for report markdown/image pairs

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// A loaded report: the markdown text and, when present, the path to
/// the companion chart image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedReport {
    pub markdown: String,
    pub image_path: Option<PathBuf>,
}

/// Outcome of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The markdown file was removed (with its image when present)
    Deleted,
    /// The markdown file was already gone
    NotFound,
}

/// A flat directory of `{base_name}.md` / `{base_name}.png` pairs,
/// keyed by base name
///
/// The store exclusively owns the directory. A pair with one file
/// missing is a recoverable state, not an error: loads report the
/// image as absent and deletes remove whichever files still exist.
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the report directory if it does not exist (idempotent)
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    pub fn markdown_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.md"))
    }

    pub fn image_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.png"))
    }

    /// List report ids (markdown base names), optionally restricted to
    /// those starting with `prefix`, sorted by name for determinism
    pub fn list(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if prefix.is_none_or(|p| stem.starts_with(p)) {
                ids.push(stem.to_string());
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Load a report by id
    ///
    /// Returns `Ok(None)` when the markdown no longer exists — an
    /// expected state when another session deleted it in between.
    pub fn load(&self, id: &str) -> Result<Option<LoadedReport>> {
        let md_path = self.markdown_path(id);
        let markdown = match fs::read_to_string(&md_path) {
            Ok(markdown) => markdown,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(id, "report not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let image_path = self.image_path(id);
        let image_path = image_path.exists().then_some(image_path);

        Ok(Some(LoadedReport {
            markdown,
            image_path,
        }))
    }

    /// Delete a report pair by id
    ///
    /// The markdown and image removals are attempted independently so
    /// a previously-partial pair does not block deletion. Deleting an
    /// absent report yields [`DeleteOutcome::NotFound`], not an error.
    pub fn delete(&self, id: &str) -> Result<DeleteOutcome> {
        let outcome = match fs::remove_file(self.markdown_path(id)) {
            Ok(()) => DeleteOutcome::Deleted,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => DeleteOutcome::NotFound,
            Err(e) => return Err(e.into()),
        };

        match fs::remove_file(self.image_path(id)) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        tracing::info!(id, ?outcome, "delete requested");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_with_report(id: &str, markdown: &str, with_image: bool) -> (tempfile::TempDir, ReportStore) {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(dir.path());
        store.ensure_dir().unwrap();
        fs::write(store.markdown_path(id), markdown).unwrap();
        if with_image {
            fs::write(store.image_path(id), b"png bytes").unwrap();
        }
        (dir, store)
    }

    #[test]
    fn test_list_filters_by_prefix() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(dir.path());
        store.ensure_dir().unwrap();
        fs::write(store.markdown_path("AAPL_daily_report_20240301_120000"), "a").unwrap();
        fs::write(store.markdown_path("TSLA_daily_report_20240301_120000"), "t").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let all = store.list(None).unwrap();
        assert_eq!(all.len(), 2);

        let aapl = store.list(Some("AAPL")).unwrap();
        assert_eq!(aapl, vec!["AAPL_daily_report_20240301_120000"]);
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(dir.path().join("nope"));
        assert!(store.list(None).unwrap().is_empty());
    }

    #[test]
    fn test_load_round_trip() {
        let content = "# AAPL Daily Briefing Report\n\nbody\n";
        let (_dir, store) = store_with_report("AAPL_daily_report_20240301_120000", content, true);

        let loaded = store
            .load("AAPL_daily_report_20240301_120000")
            .unwrap()
            .unwrap();
        assert_eq!(loaded.markdown, content);
        assert!(loaded.image_path.unwrap().ends_with("AAPL_daily_report_20240301_120000.png"));
    }

    #[test]
    fn test_load_missing_image_is_absent_not_error() {
        let (_dir, store) = store_with_report("AAPL_daily_report_20240301_120000", "md", false);

        let loaded = store
            .load("AAPL_daily_report_20240301_120000")
            .unwrap()
            .unwrap();
        assert_eq!(loaded.image_path, None);
    }

    #[test]
    fn test_load_missing_report_is_none() {
        let dir = tempdir().unwrap();
        let store = ReportStore::new(dir.path());
        assert!(store.load("GONE_daily_report_20240301_120000").unwrap().is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_dir, store) = store_with_report("AAPL_daily_report_20240301_120000", "md", true);
        let id = "AAPL_daily_report_20240301_120000";

        assert_eq!(store.delete(id).unwrap(), DeleteOutcome::Deleted);
        assert!(!store.markdown_path(id).exists());
        assert!(!store.image_path(id).exists());

        // Second call reports NotFound without raising
        assert_eq!(store.delete(id).unwrap(), DeleteOutcome::NotFound);
        assert!(store.list(None).unwrap().is_empty());
    }

    #[test]
    fn test_delete_partial_pair() {
        // Image already missing must not block deleting the markdown
        let (_dir, store) = store_with_report("AAPL_daily_report_20240301_120000", "md", false);
        assert_eq!(
            store.delete("AAPL_daily_report_20240301_120000").unwrap(),
            DeleteOutcome::Deleted
        );

        // Orphaned image with no markdown: NotFound, but the image is swept
        let (_dir2, store2) = store_with_report("X_daily_report_20240301_120000", "md", true);
        fs::remove_file(store2.markdown_path("X_daily_report_20240301_120000")).unwrap();
        assert_eq!(
            store2.delete("X_daily_report_20240301_120000").unwrap(),
            DeleteOutcome::NotFound
        );
        assert!(!store2.image_path("X_daily_report_20240301_120000").exists());
    }
}
