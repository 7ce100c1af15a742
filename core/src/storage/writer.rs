use std::path::PathBuf;

use tokio::fs;
use tracing::info;

use informes_common::error::ReportError;
use informes_common::report::{Report, ReportStamp};

/// Persists report bodies under the reports directory.
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes `content` verbatim to `<dir>/<stamp.filename()>`, creating `dir` if needed.
    ///
    /// Two reports stamped in the same second share a name; the later one wins.
    pub async fn write(&self, content: &str, stamp: ReportStamp) -> Result<Report, ReportError> {
        if content.is_empty() {
            return Err(ReportError::EmptyFile);
        }

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ReportError::Write {
                path: self.dir.clone(),
                source,
            })?;

        let filename = stamp.filename();
        let path = self.dir.join(&filename);
        fs::write(&path, content.as_bytes())
            .await
            .map_err(|source| ReportError::Write {
                path: path.clone(),
                source,
            })?;

        info!("Report saved to {}", path.display());
        Ok(Report {
            stamp,
            filename,
            path,
        })
    }
}
