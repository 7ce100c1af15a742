//! # Error Taxonomy
//!
//! Every failure of the webhook falls in one of three classes:
//!
//! * **Auth**: the shared secret did not match. Nothing else runs.
//! * **Validation**: the upload is missing, empty or not text. Nothing is written.
//! * **Failure**: persisting, linking or publishing broke. Whatever was already
//!   written stays on disk.
//!
//! The `Display` texts are the messages returned to the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse grouping of [`ReportError`], one per response status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    Auth,
    Validation,
    Failure,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("No autorizado")]
    Unauthorized,
    #[error("No se encontró el archivo en la petición")]
    MissingFile,
    #[error("El archivo HTML está vacío")]
    EmptyFile,
    #[error("El archivo no contiene texto UTF-8 válido: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),
    #[error("Fallo al guardar el informe en {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Fallo al actualizar {path}: {source}")]
    Link {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Fallo en el proceso de Git: {0}")]
    Publish(#[from] PublishError),
}

impl ReportError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ReportError::Unauthorized => ErrorClass::Auth,
            ReportError::MissingFile | ReportError::EmptyFile | ReportError::InvalidEncoding(_) => {
                ErrorClass::Validation
            }
            ReportError::Write { .. } | ReportError::Link { .. } | ReportError::Publish(_) => {
                ErrorClass::Failure
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("La variable de entorno GITHUB_TOKEN no está configurada.")]
    MissingCredential,
    #[error("no se pudo ejecutar `git {command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`git {command}` terminó con {status}: {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },
}
