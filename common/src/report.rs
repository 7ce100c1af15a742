//! # Report Model
//!
//! A report is the HTML body received by the webhook, persisted once under
//! `reports/` and never touched again. Everything derived from it (file
//! name, landing page label, commit message) hangs off a single
//! [`ReportStamp`] so the three always agree.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Directory (relative to the site root) that holds the report files.
pub const REPORTS_DIR: &str = "reports";

/// The instant a report was accepted, truncated to whole seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportStamp {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl ReportStamp {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// `YYYY-MM-DD`
    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// `HHMMSS`
    pub fn time_label(&self) -> String {
        self.time.format("%H%M%S").to_string()
    }

    /// `informe-<YYYY-MM-DD>-<HHMMSS>.html`
    pub fn filename(&self) -> String {
        format!("informe-{}-{}.html", self.date_label(), self.time_label())
    }

    /// The landing page entry for a report stored as `filename`, newline included.
    pub fn link_fragment(&self, filename: &str) -> String {
        format!(
            "<li><a href=\"{REPORTS_DIR}/{filename}\">Informe del {} ({})</a></li>\n",
            self.date_label(),
            self.time_label()
        )
    }

    pub fn commit_message(&self) -> String {
        format!(
            "Reporte automático para {} a las {}",
            self.date_label(),
            self.time_label()
        )
    }
}

impl From<NaiveDateTime> for ReportStamp {
    fn from(instant: NaiveDateTime) -> Self {
        let time = instant.time();
        Self::new(instant.date(), time.with_nanosecond(0).unwrap_or(time))
    }
}

/// A report that has been written to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub stamp: ReportStamp,
    pub filename: String,
    pub path: PathBuf,
}

impl Report {
    pub fn link_fragment(&self) -> String {
        self.stamp.link_fragment(&self.filename)
    }
}
