/// Run summary written after a pipeline run.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::Stage;
use crate::model::{Dataset, FilteredDataset, PageViewError, PercentileBounds, Result};

/// What one run loaded, kept, and produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub input_path: PathBuf,
    pub rows_loaded: usize,
    pub rows_kept: usize,
    pub rows_removed: usize,
    pub bounds: Option<PercentileBounds>,
    pub years: Vec<i32>,
    pub outputs: Vec<PathBuf>,
}

impl RunSummary {
    pub fn new(input_path: &Path, loaded: &Dataset, filtered: &FilteredDataset, outputs: Vec<PathBuf>) -> Self {
        Self {
            input_path: input_path.to_path_buf(),
            rows_loaded: loaded.len(),
            rows_kept: filtered.len(),
            rows_removed: filtered.removed(),
            bounds: filtered.bounds(),
            years: filtered.years(),
            outputs,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the summary as pretty-printed JSON, creating parent directories.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PageViewError::io(parent, e))?;
        }
        fs::write(path, self.to_json()?).map_err(|e| PageViewError::io(path, e))?;
        log::debug!(target: Stage::System.target(), "Wrote run report to {}", path.display());
        Ok(())
    }

    pub fn log(&self) {
        let span = match (self.years.first(), self.years.last()) {
            (Some(first), Some(last)) if first != last => format!("{}-{}", first, last),
            (Some(only), _) => only.to_string(),
            _ => "no data".to_string(),
        };
        log::info!(
            target: Stage::System.target(),
            "Run complete: {} rows loaded, {} kept, {} removed ({}); {} figures written",
            self.rows_loaded,
            self.rows_kept,
            self.rows_removed,
            span,
            self.outputs.len()
        );
    }
}
