//! Scoped ownership of a repository's working tree
//!
//! A [`WorkTreeSession`] records where HEAD pointed when it was acquired and
//! puts it back exactly once when released. Dropping an unreleased session
//! (early return, panic) performs the release.

use crate::git::{GitRepo, Revision};
use anyhow::Result;
use tracing::{debug, warn};

/// A working tree whose checked-out revision can be moved and restored.
pub trait WorkTree {
    /// Revision currently checked out, if it can be resolved
    fn current_revision(&self) -> Option<Revision>;

    /// Check out `revision`, failing rather than discarding local changes
    fn checkout(&self, revision: &str) -> Result<()>;

    /// Return to a revision recorded earlier
    fn restore(&self, original: &Revision) -> Result<()>;
}

impl WorkTree for GitRepo {
    fn current_revision(&self) -> Option<Revision> {
        GitRepo::current_revision(self)
    }

    fn checkout(&self, revision: &str) -> Result<()> {
        GitRepo::checkout(self, revision)
    }

    fn restore(&self, original: &Revision) -> Result<()> {
        GitRepo::restore(self, original)
    }
}

/// What happened when a session was released
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Working tree is back at the original revision
    Restored { revision: String },
    /// Restoration was attempted and failed
    Failed { revision: String, message: String },
    /// No original revision could be recorded, nothing to restore
    NotRecorded,
}

impl RestoreOutcome {
    pub fn is_restored(&self) -> bool {
        matches!(self, RestoreOutcome::Restored { .. })
    }
}

/// Exclusive use of a working tree for the duration of a run.
pub struct WorkTreeSession<'a, W: WorkTree + ?Sized> {
    tree: &'a W,
    original: Option<Revision>,
    released: bool,
}

impl<'a, W: WorkTree + ?Sized> WorkTreeSession<'a, W> {
    /// Record the current revision before anything is checked out.
    pub fn acquire(tree: &'a W) -> Self {
        let original = tree.current_revision();
        match &original {
            Some(rev) => debug!("Recorded original revision {}", rev.id),
            None => warn!("Could not resolve the current revision; it will not be restored"),
        }
        Self {
            tree,
            original,
            released: false,
        }
    }

    pub fn original(&self) -> Option<&Revision> {
        self.original.as_ref()
    }

    pub fn checkout(&self, revision: &str) -> Result<()> {
        self.tree.checkout(revision)
    }

    /// Restore the original revision and end the session.
    pub fn release(mut self) -> RestoreOutcome {
        self.restore_once()
    }

    fn restore_once(&mut self) -> RestoreOutcome {
        self.released = true;
        let Some(original) = &self.original else {
            return RestoreOutcome::NotRecorded;
        };

        match self.tree.restore(original) {
            Ok(()) => {
                debug!("Restored original revision {}", original.id);
                RestoreOutcome::Restored {
                    revision: original.id.clone(),
                }
            }
            Err(e) => {
                warn!("Failed to restore original revision {}: {:#}", original.id, e);
                RestoreOutcome::Failed {
                    revision: original.id.clone(),
                    message: format!("{:#}", e),
                }
            }
        }
    }
}

impl<W: WorkTree + ?Sized> Drop for WorkTreeSession<'_, W> {
    fn drop(&mut self) {
        if !self.released {
            self.restore_once();
        }
    }
}
