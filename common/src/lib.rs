//! # Informes Common
//!
//! Shared vocabulary for the report webhook.
//!
//! * **[`report`]**: Report naming (filename, link label, commit message).
//! * **[`index`]**: The landing page document and its insertion marker.
//! * **[`publish`]** and **[`clock`]**: Outbound ports implemented by `informes-core`.
//! * **[`config`]**: Process-wide configuration, built once at startup.
//! * **[`error`]**: Error taxonomy shared by the service and its adapters.

pub mod clock;
pub mod config;
pub mod error;
pub mod index;
pub mod publish;
pub mod report;
