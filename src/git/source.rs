//! Repository sources: local paths and remote URLs
//!
//! Remote sources are cloned into a scratch directory owned by the
//! [`RepoSource`]. The directory is removed when the source is dropped.

use super::repository::GitRepo;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{info, warn};

const REMOTE_PREFIXES: &[&str] = &["http://", "https://", "ssh://", "git@"];

/// A repository location ready to be analyzed.
#[derive(Debug)]
pub struct RepoSource {
    /// What the user passed on the command line
    spec: String,
    /// Local directory holding the repository
    path: PathBuf,
    /// Scratch directory for remote clones
    scratch: Option<TempDir>,
}

impl RepoSource {
    /// Whether `spec` names a remote repository rather than a local path
    pub fn is_remote(spec: &str) -> bool {
        REMOTE_PREFIXES.iter().any(|prefix| spec.starts_with(prefix))
    }

    /// Resolve a command-line repository argument, cloning remote URLs.
    pub fn resolve(spec: &str) -> Result<Self> {
        if !Self::is_remote(spec) {
            return Ok(Self {
                spec: spec.to_string(),
                path: PathBuf::from(spec),
                scratch: None,
            });
        }

        info!("Cloning repository {} ...", spec);
        let scratch = tempfile::Builder::new()
            .prefix("mi-analysis-")
            .tempdir()
            .context("Failed to create scratch directory for clone")?;
        let path = scratch.path().join("repo");
        GitRepo::clone(spec, &path)?;

        Ok(Self {
            spec: spec.to_string(),
            path,
            scratch: Some(scratch),
        })
    }

    /// The repository argument as given
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Local path of the repository
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RepoSource {
    fn drop(&mut self) {
        if let Some(scratch) = self.scratch.take() {
            let dir = scratch.path().to_path_buf();
            if let Err(e) = scratch.close() {
                warn!("Failed to remove scratch clone {}: {}", dir.display(), e);
            }
        }
    }
}
