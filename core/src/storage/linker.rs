use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tokio::task;
use tracing::{info, warn};

use informes_common::error::ReportError;
use informes_common::index::{IndexDocument, Insertion};
use informes_common::report::Report;

/// What happened to the landing page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkOutcome {
    Inserted,
    /// The marker was not found; the file was not touched.
    MarkerMissing,
}

/// Registers new reports in the landing page.
pub struct IndexLinker {
    index_file: PathBuf,
    marker: String,
}

impl IndexLinker {
    pub fn new(index_file: impl Into<PathBuf>, marker: impl Into<String>) -> Self {
        Self {
            index_file: index_file.into(),
            marker: marker.into(),
        }
    }

    /// Inserts the link for `report` right after the marker.
    ///
    /// A missing marker is not an error. A missing or unreadable index file is.
    pub async fn link(&self, report: &Report) -> Result<LinkOutcome, ReportError> {
        let content = tokio::fs::read_to_string(&self.index_file)
            .await
            .map_err(|source| self.error(source))?;

        match IndexDocument::new(content).insert_entry(&self.marker, &report.link_fragment()) {
            Insertion::Inserted(updated) => {
                let index_file = self.index_file.clone();
                task::spawn_blocking(move || replace(&index_file, &updated))
                    .await
                    .map_err(io::Error::other)
                    .and_then(|written| written)
                    .map_err(|source| self.error(source))?;
                info!(
                    "{} updated with {}",
                    self.index_file.display(),
                    report.filename
                );
                Ok(LinkOutcome::Inserted)
            }
            Insertion::MarkerMissing => {
                warn!(
                    "Marker not found in {}, no link inserted for {}",
                    self.index_file.display(),
                    report.filename
                );
                Ok(LinkOutcome::MarkerMissing)
            }
        }
    }

    fn error(&self, source: io::Error) -> ReportError {
        ReportError::Link {
            path: self.index_file.clone(),
            source,
        }
    }
}

/// Swaps `index_file` for `content` through a sibling temp file and a rename.
///
/// Blocking; runs on the blocking pool.
fn replace(index_file: &Path, content: &str) -> io::Result<()> {
    let dir = index_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let permissions = fs::metadata(index_file)?.permissions();

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.persist(index_file).map_err(|e| e.error)?;
    Ok(())
}
