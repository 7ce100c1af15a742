//! # Report Service
//!
//! Orchestrates one webhook call:
//!
//! `Received → Authenticated → FileValidated → Written → Linked → Published → Done`
//!
//! The first failure ends the call. Nothing already written is undone: a
//! failed publish leaves the report file and the updated index on disk.

use tracing::{debug, error, info};

use informes_common::clock::Clock;
use informes_common::config::Config;
use informes_common::error::ReportError;
use informes_common::publish::PublishRepository;
use informes_common::report::{Report, ReportStamp};

use crate::auth::Authenticator;
use crate::storage::linker::{IndexLinker, LinkOutcome};
use crate::storage::writer::ReportWriter;

/// Position of a call in the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Received,
    Authenticated,
    FileValidated,
    Written,
    Linked,
    Published,
    Done,
}

/// What a successful call produced.
#[derive(Debug)]
pub struct Receipt {
    pub report: Report,
    pub link: LinkOutcome,
}

pub struct ReportService {
    auth: Authenticator,
    writer: ReportWriter,
    linker: IndexLinker,
    publisher: Box<dyn PublishRepository>,
    clock: Box<dyn Clock>,
}

impl ReportService {
    pub fn new(cfg: &Config, publisher: Box<dyn PublishRepository>, clock: Box<dyn Clock>) -> Self {
        Self {
            auth: Authenticator::new(cfg.api_secret.clone()),
            writer: ReportWriter::new(cfg.reports_dir()),
            linker: IndexLinker::new(cfg.index_file(), cfg.marker.clone()),
            publisher,
            clock,
        }
    }

    /// `Received → Authenticated`. Must pass before the body is looked at.
    pub fn authorize(&self, api_key: Option<&str>) -> Result<(), ReportError> {
        if self.auth.is_authorized(api_key) {
            debug!(stage = ?Stage::Authenticated);
            Ok(())
        } else {
            info!("Rejected request with missing or wrong API key");
            Err(ReportError::Unauthorized)
        }
    }

    /// Validates the uploaded bytes and runs the rest of the pipeline.
    ///
    /// `None` means the request carried no report field.
    pub async fn submit(&self, upload: Option<Vec<u8>>) -> Result<Receipt, ReportError> {
        let content = validate_upload(upload)?;
        let mut stage = Stage::FileValidated;
        debug!(?stage);

        match self.run(content, &mut stage).await {
            Ok(receipt) => {
                debug!(stage = ?Stage::Done);
                Ok(receipt)
            }
            Err(err) => {
                error!(?stage, "Report pipeline failed: {err}");
                Err(err)
            }
        }
    }

    async fn run(&self, content: String, stage: &mut Stage) -> Result<Receipt, ReportError> {
        let stamp = ReportStamp::from(self.clock.now());

        let report = self.writer.write(&content, stamp).await?;
        *stage = Stage::Written;

        let link = self.linker.link(&report).await?;
        *stage = Stage::Linked;

        self.publisher.publish(&stamp.commit_message()).await?;
        *stage = Stage::Published;

        info!("Report {} published", report.filename);
        Ok(Receipt { report, link })
    }
}

/// `FileValidated` gate: the field must be present, UTF-8 and non-empty.
pub fn validate_upload(upload: Option<Vec<u8>>) -> Result<String, ReportError> {
    let bytes = upload.ok_or(ReportError::MissingFile)?;
    let content = String::from_utf8(bytes)?;
    if content.is_empty() {
        return Err(ReportError::EmptyFile);
    }
    Ok(content)
}
