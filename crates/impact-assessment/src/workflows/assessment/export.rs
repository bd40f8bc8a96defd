use super::report::views::{AssessmentSummary, MitigationPlanView};
use super::report::{render_mitigation_document, render_summary_document, write_scheduled_csv};
use crate::config::{ExportConfig, ExportFormat};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const SUMMARY_STEM: &str = "assessment-summary";
pub const MITIGATION_STEM: &str = "mitigation-plan";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode JSON document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write CSV action table: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes assessment documents into a single directory.
///
/// Exports read the views handed to them and never touch session state.
#[derive(Debug, Clone)]
pub struct DocumentExporter {
    directory: PathBuf,
    format: ExportFormat,
}

impl DocumentExporter {
    pub fn new(directory: impl Into<PathBuf>, format: ExportFormat) -> Self {
        Self {
            directory: directory.into(),
            format,
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.directory.clone(), config.format)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Writes `assessment-summary.txt` or `assessment-summary.json`.
    pub fn export_summary(&self, summary: &AssessmentSummary) -> Result<PathBuf, ExportError> {
        let contents = match self.format {
            ExportFormat::Text => render_summary_document(summary),
            ExportFormat::Json => serde_json::to_string_pretty(summary)?,
        };
        let path = self.write_document(SUMMARY_STEM, &contents)?;
        info!(path = %path.display(), "assessment summary exported");
        Ok(path)
    }

    /// Writes the mitigation plan document plus `mitigation-plan.csv` holding
    /// the dated action table. Returns both paths, document first.
    pub fn export_mitigation_plan(
        &self,
        plan: &MitigationPlanView,
    ) -> Result<Vec<PathBuf>, ExportError> {
        let contents = match self.format {
            ExportFormat::Text => render_mitigation_document(plan),
            ExportFormat::Json => serde_json::to_string_pretty(plan)?,
        };
        let document = self.write_document(MITIGATION_STEM, &contents)?;

        let csv_path = self.directory.join(format!("{MITIGATION_STEM}.csv"));
        let file = self.create(&csv_path)?;
        write_scheduled_csv(&plan.scheduled, BufWriter::new(file))?;

        info!(
            path = %document.display(),
            scheduled = plan.scheduled.len(),
            "mitigation plan exported"
        );
        Ok(vec![document, csv_path])
    }

    fn write_document(&self, stem: &str, contents: &str) -> Result<PathBuf, ExportError> {
        let path = self
            .directory
            .join(format!("{stem}.{}", self.format.extension()));
        let mut writer = BufWriter::new(self.create(&path)?);
        writer
            .write_all(contents.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    fn create(&self, path: &Path) -> Result<File, ExportError> {
        fs::create_dir_all(&self.directory).map_err(|source| ExportError::Io {
            path: self.directory.clone(),
            source,
        })?;
        File::create(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
