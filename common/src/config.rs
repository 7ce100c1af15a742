//! # Configuration
//!
//! Built once at startup and handed to the service; nothing reads the
//! environment after that. Values come from a lookup function so the binary
//! can pass `std::env::var` and tests can pass a map.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::index::LINK_MARKER;
use crate::report::REPORTS_DIR;

pub const API_SECRET_KEY: &str = "API_SECRET_KEY";
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const REMOTE_URL: &str = "REPORTS_REMOTE_URL";
pub const BRANCH: &str = "REPORTS_BRANCH";
pub const MAX_BODY_BYTES: &str = "REPORTS_MAX_BODY_BYTES";

/// Must be overridden in any real deployment.
pub const DEFAULT_API_SECRET: &str = "MI_CLAVE_SECRETA_POR_DEFECTO";
pub const DEFAULT_REMOTE_URL: &str =
    "https://{token}@github.com/gabrieloliveiracarballo-cmd/informes-diarios.git";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
pub const INDEX_FILE: &str = "index.html";
pub const TOKEN_PLACEHOLDER: &str = "{token}";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// A string that never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Exact, case-sensitive comparison.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes() == candidate.as_bytes()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Identity written into the local git config before every commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Default for Author {
    fn default() -> Self {
        Self {
            name: "Bot de Informes".to_string(),
            email: "bot@example.com".to_string(),
        }
    }
}

/// The remote the site is pushed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteTarget {
    pub name: String,
    /// URL with a `{token}` placeholder for the credential.
    pub url_template: String,
}

impl RemoteTarget {
    pub fn url(&self, token: &Secret) -> String {
        self.url_template.replace(TOKEN_PLACEHOLDER, token.expose())
    }
}

impl Default for RemoteTarget {
    fn default() -> Self {
        Self {
            name: "origin".to_string(),
            url_template: DEFAULT_REMOTE_URL.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_secret: Secret,
    /// Absent tokens only fail the publish step.
    pub github_token: Option<Secret>,
    /// Project root: holds `index.html`, `reports/` and the git working tree.
    pub root: PathBuf,
    pub marker: String,
    pub remote: RemoteTarget,
    pub branch: String,
    pub author: Author,
    pub git_binary: PathBuf,
    pub max_body_bytes: usize,
}

impl Config {
    /// Defaults for everything, rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            api_secret: Secret::new(DEFAULT_API_SECRET),
            github_token: None,
            root: root.into(),
            marker: LINK_MARKER.to_string(),
            remote: RemoteTarget::default(),
            branch: DEFAULT_BRANCH.to_string(),
            author: Author::default(),
            git_binary: PathBuf::from("git"),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Reads every environment-backed value through `lookup`.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(root: impl Into<PathBuf>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let mut cfg = Self::new(root);

        if let Some(secret) = get(API_SECRET_KEY) {
            cfg.api_secret = Secret::new(secret);
        }
        cfg.github_token = get(GITHUB_TOKEN).map(Secret::new);
        if let Some(url) = get(REMOTE_URL) {
            cfg.remote.url_template = url;
        }
        if let Some(branch) = get(BRANCH) {
            cfg.branch = branch;
        }
        if let Some(raw) = get(MAX_BODY_BYTES) {
            cfg.max_body_bytes = raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid {
                    key: MAX_BODY_BYTES,
                    value: raw,
                })?;
        }
        Ok(cfg)
    }

    pub fn from_env(root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Self::from_lookup(root, |key| std::env::var(key).ok())
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join(REPORTS_DIR)
    }

    pub fn index_file(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.api_secret.matches(DEFAULT_API_SECRET)
    }
}
