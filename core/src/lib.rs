//! # Informes Core
//!
//! Application service and adapters for the report webhook.
//!
//! * **[`service`]**: The request pipeline (authenticate, validate, write, link, publish).
//! * **[`auth`]**: Shared-secret check.
//! * **[`storage`]**: Filesystem adapters for the report files and the landing page.
//! * **[`git`]**: [`PublishRepository`](informes_common::publish::PublishRepository)
//!   backed by the git CLI.
//! * **[`http`]**: The axum router exposing the webhook.

pub mod auth;
pub mod git;
pub mod http;
pub mod service;
pub mod storage;
