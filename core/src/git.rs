//! # Git Publisher
//!
//! [`PublishRepository`] implementation that drives the `git` executable
//! inside the site root. Every call runs the full sequence:
//!
//! 1. `git init` when `<root>/.git` does not exist.
//! 2. Make the configured branch the current one.
//! 3. Write the bot identity into the local config.
//! 4. `git add -A` (the whole tree, not only the new report).
//! 5. Commit, even when nothing changed.
//! 6. Point the remote at the token-bearing URL.
//! 7. Force-push the branch onto the remote branch of the same name.
//!
//! The first failing step aborts the rest. Diagnostics keep the failing
//! command and its stderr, with the token replaced by `***`.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use informes_common::config::{Author, Config, RemoteTarget, Secret};
use informes_common::error::PublishError;
use informes_common::publish::PublishRepository;

const REDACTED: &str = "***";

pub struct GitCliPublisher {
    git: PathBuf,
    root: PathBuf,
    branch: String,
    author: Author,
    remote: RemoteTarget,
    token: Option<Secret>,
}

impl GitCliPublisher {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            git: cfg.git_binary.clone(),
            root: cfg.root.clone(),
            branch: cfg.branch.clone(),
            author: cfg.author.clone(),
            remote: cfg.remote.clone(),
            token: cfg.github_token.clone(),
        }
    }

    /// Runs `git -C <root> <args>` and returns its trimmed stdout.
    async fn git(&self, args: &[&str]) -> Result<String, PublishError> {
        let output = self.command(args).output().await.map_err(|source| PublishError::Spawn {
            command: self.describe(args),
            source,
        })?;

        if !output.status.success() {
            return Err(PublishError::Command {
                command: self.describe(args),
                status: output.status.to_string(),
                stderr: self.redact(String::from_utf8_lossy(&output.stderr).trim()),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Like [`Self::git`] but a non-zero exit is an answer, not an error.
    async fn probe(&self, args: &[&str]) -> Result<bool, PublishError> {
        let status = self
            .command(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| PublishError::Spawn {
                command: self.describe(args),
                source,
            })?;
        Ok(status.success())
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.git);
        cmd.arg("-C")
            .arg(&self.root)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null());
        cmd
    }

    fn describe(&self, args: &[&str]) -> String {
        self.redact(&args.join(" "))
    }

    fn redact(&self, text: &str) -> String {
        match &self.token {
            Some(token) if !token.expose().is_empty() => text.replace(token.expose(), REDACTED),
            _ => text.to_string(),
        }
    }

    async fn ensure_repository(&self) -> Result<(), PublishError> {
        if self.root.join(".git").exists() {
            return Ok(());
        }
        info!("Initializing git repository in {}", self.root.display());
        self.git(&["init"]).await?;
        Ok(())
    }

    async fn ensure_branch(&self) -> Result<(), PublishError> {
        let current = self.git(&["symbolic-ref", "--short", "HEAD"]).await?;
        if current == self.branch {
            return Ok(());
        }

        debug!("Renaming branch {current} to {}", self.branch);
        if self.probe(&["rev-parse", "--verify", "--quiet", "HEAD"]).await? {
            self.git(&["branch", "-m", &self.branch]).await?;
        } else {
            // Unborn branch: nothing to rename yet, just repoint HEAD.
            let head = format!("refs/heads/{}", self.branch);
            self.git(&["symbolic-ref", "HEAD", &head]).await?;
        }
        Ok(())
    }

    async fn configure_identity(&self) -> Result<(), PublishError> {
        self.git(&["config", "user.name", &self.author.name]).await?;
        self.git(&["config", "user.email", &self.author.email]).await?;
        Ok(())
    }

    async fn configure_remote(&self, url: &str) -> Result<(), PublishError> {
        let name = self.remote.name.as_str();
        if self.probe(&["remote", "get-url", name]).await? {
            self.git(&["remote", "set-url", name, url]).await?;
        } else {
            self.git(&["remote", "add", name, url]).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl PublishRepository for GitCliPublisher {
    async fn publish(&self, message: &str) -> Result<(), PublishError> {
        let token = self.token.as_ref().ok_or(PublishError::MissingCredential)?;
        let url = self.remote.url(token);

        self.ensure_repository().await?;
        self.ensure_branch().await?;
        self.configure_identity().await?;

        debug!("Staging all changes");
        self.git(&["add", "-A"]).await?;

        debug!("Committing: {message}");
        self.git(&["commit", "--allow-empty", "-m", message]).await?;

        self.configure_remote(&url).await?;

        info!("Pushing to branch '{}'", self.branch);
        let refspec = format!("{0}:{0}", self.branch);
        self.git(&["push", "--force", &self.remote.name, &refspec]).await?;

        info!("Changes pushed");
        Ok(())
    }
}
