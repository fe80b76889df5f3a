//! Report generation port trait.

use std::path::Path;

use crate::domain::error::CopilotError;
use crate::domain::recommendation::RecommendationReport;

/// Port for writing recommendation reports.
pub trait ReportPort {
    fn write(&self, report: &RecommendationReport, output_path: &Path)
        -> Result<(), CopilotError>;

    /// Default implementation: one `write` per report, named `<SYMBOL>.<extension>`
    /// under `output_dir`.
    fn write_all(
        &self,
        reports: &[RecommendationReport],
        output_dir: &Path,
        extension: &str,
    ) -> Result<(), CopilotError> {
        for report in reports {
            let path = output_dir.join(format!("{}.{}", report.symbol(), extension));
            self.write(report, &path)?;
        }
        Ok(())
    }
}
