//! # Storage Adapters
//!
//! Plain filesystem access under the site root:
//! * [`writer`]: one new HTML file per accepted report.
//! * [`linker`]: the link insertion into `index.html`.

pub mod linker;
pub mod writer;
