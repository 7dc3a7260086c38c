//! Repository access using libgit2
//!
//! Everything a historic run needs from version control: open or clone a
//! repository, list the commits on a ref, move the working tree between
//! revisions, and report where HEAD currently points.

use crate::models::Commit;
use anyhow::{Context, Result};
use chrono::{FixedOffset, TimeZone, Utc};
use git2::build::CheckoutBuilder;
use git2::{Oid, Repository, Sort};
use std::path::Path;
use tracing::debug;

/// Where HEAD pointed when a run started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Commit id HEAD resolved to
    pub id: String,
    /// Full branch reference (`refs/heads/...`) when HEAD was attached
    pub branch: Option<String>,
}

impl Revision {
    pub fn detached(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            branch: None,
        }
    }
}

/// A git repository with a working tree.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open a git repository.
    ///
    /// # Arguments
    /// * `path` - Path to the repository (or any subdirectory)
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("Failed to open git repository at {}", path.display()))?;
        debug!("Opened git repository at {:?}", repo.path());
        Ok(Self { repo })
    }

    /// Clone a remote repository into `dest`.
    pub fn clone(url: &str, dest: &Path) -> Result<Self> {
        let repo = Repository::clone(url, dest)
            .with_context(|| format!("Failed to clone repository {}", url))?;
        debug!("Cloned {} into {}", url, dest.display());
        Ok(Self { repo })
    }

    /// Get the working tree root.
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .context("Repository has no working directory (bare repo?)")
    }

    /// List every commit reachable from `refname`, newest first.
    ///
    /// A repository whose HEAD has no commits yet yields an empty list.
    pub fn list_commits(&self, refname: &str) -> Result<Vec<Commit>> {
        if self.repo.is_empty()? {
            debug!("Repository has no commits");
            return Ok(Vec::new());
        }

        let tip = self
            .repo
            .revparse_single(refname)
            .and_then(|object| object.peel_to_commit())
            .with_context(|| format!("Unknown ref '{}'", refname))?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push(tip.id())?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(Commit::new(oid.to_string(), format_git_time(&commit.time())));
        }

        debug!("Found {} commits on {}", commits.len(), refname);
        Ok(commits)
    }

    /// Where HEAD points right now, if it resolves to a commit.
    pub fn current_revision(&self) -> Option<Revision> {
        let head = self.repo.head().ok()?;
        let commit = head.peel_to_commit().ok()?;
        let branch = if head.is_branch() {
            head.name().map(str::to_string)
        } else {
            None
        };
        Some(Revision {
            id: commit.id().to_string(),
            branch,
        })
    }

    /// Check out a commit with a detached HEAD.
    ///
    /// Uses a safe checkout, so local modifications that would be
    /// overwritten make this fail instead of being discarded.
    pub fn checkout(&self, revision: &str) -> Result<()> {
        let oid = Oid::from_str(revision)
            .with_context(|| format!("Invalid revision '{}'", revision))?;
        let commit = self
            .repo
            .find_commit(oid)
            .with_context(|| format!("Commit {} not found", revision))?;

        let mut opts = CheckoutBuilder::new();
        opts.safe();
        self.repo
            .checkout_tree(commit.as_object(), Some(&mut opts))
            .with_context(|| format!("Failed to check out {}", revision))?;
        self.repo.set_head_detached(oid)?;
        Ok(())
    }

    /// Return the working tree to a previously recorded revision,
    /// re-attaching HEAD to its branch when it had one.
    pub fn restore(&self, original: &Revision) -> Result<()> {
        let Some(refname) = &original.branch else {
            return self.checkout(&original.id);
        };

        let commit = self
            .repo
            .find_reference(refname)
            .and_then(|reference| reference.peel_to_commit())
            .with_context(|| format!("Branch {} no longer resolves", refname))?;

        let mut opts = CheckoutBuilder::new();
        opts.safe();
        self.repo
            .checkout_tree(commit.as_object(), Some(&mut opts))
            .with_context(|| format!("Failed to check out {}", refname))?;
        self.repo.set_head(refname)?;
        Ok(())
    }
}

/// Format a git timestamp as RFC 3339, keeping the committer's offset.
fn format_git_time(time: &git2::Time) -> String {
    let local = FixedOffset::east_opt(time.offset_minutes() * 60)
        .and_then(|offset| offset.timestamp_opt(time.seconds(), 0).single());
    match local {
        Some(dt) => dt.to_rfc3339(),
        None => match Utc.timestamp_opt(time.seconds(), 0).single() {
            Some(dt) => dt.to_rfc3339(),
            None => "1970-01-01T00:00:00+00:00".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Signature, Time};
    use tempfile::tempdir;

    fn commit_file(repo: &Repository, dir: &Path, name: &str, body: &str, secs: i64) -> Result<Oid> {
        std::fs::write(dir.join(name), body)?;
        let mut index = repo.index()?;
        index.add_path(Path::new(name))?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;
        let sig = Signature::new("Test User", "test@example.com", &Time::new(secs, 60))?;
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        Ok(repo.commit(Some("HEAD"), &sig, &sig, name, &tree, &parents)?)
    }

    fn create_test_repo() -> Result<(tempfile::TempDir, Vec<Oid>)> {
        let dir = tempdir()?;
        let repo = Repository::init(dir.path())?;
        let mut oids = Vec::new();
        for (i, secs) in [1_577_836_800i64, 1_580_515_200, 1_583_020_800].iter().enumerate() {
            oids.push(commit_file(
                &repo,
                dir.path(),
                "test.txt",
                &format!("version {}", i),
                *secs,
            )?);
        }
        Ok((dir, oids))
    }

    #[test]
    fn test_open_repo() -> Result<()> {
        let (dir, _) = create_test_repo()?;
        let repo = GitRepo::open(dir.path())?;
        assert!(repo.workdir()?.exists());
        Ok(())
    }

    #[test]
    fn test_open_non_repo_fails() -> Result<()> {
        let dir = tempdir()?;
        assert!(GitRepo::open(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_list_commits_newest_first() -> Result<()> {
        let (dir, oids) = create_test_repo()?;
        let repo = GitRepo::open(dir.path())?;

        let commits = repo.list_commits("HEAD")?;
        let ids: Vec<String> = commits.iter().map(|c| c.id.clone()).collect();
        let expected: Vec<String> = oids.iter().rev().map(|o| o.to_string()).collect();
        assert_eq!(ids, expected);
        assert_eq!(commits[2].timestamp, "2020-01-01T01:00:00+01:00");
        Ok(())
    }

    #[test]
    fn test_list_commits_unknown_ref_fails() -> Result<()> {
        let (dir, _) = create_test_repo()?;
        let repo = GitRepo::open(dir.path())?;
        assert!(repo.list_commits("no-such-branch").is_err());
        Ok(())
    }

    #[test]
    fn test_list_commits_empty_repo() -> Result<()> {
        let dir = tempdir()?;
        Repository::init(dir.path())?;
        let repo = GitRepo::open(dir.path())?;
        assert!(repo.list_commits("HEAD")?.is_empty());
        assert!(repo.current_revision().is_none());
        Ok(())
    }

    #[test]
    fn test_checkout_and_restore_branch() -> Result<()> {
        let (dir, oids) = create_test_repo()?;
        let repo = GitRepo::open(dir.path())?;

        let original = repo.current_revision().expect("HEAD resolves");
        assert!(original.branch.is_some());
        assert_eq!(original.id, oids[2].to_string());

        repo.checkout(&oids[0].to_string())?;
        assert_eq!(std::fs::read_to_string(dir.path().join("test.txt"))?, "version 0");
        let moved = repo.current_revision().expect("HEAD resolves");
        assert_eq!(moved.id, oids[0].to_string());
        assert!(moved.branch.is_none());

        repo.restore(&original)?;
        assert_eq!(std::fs::read_to_string(dir.path().join("test.txt"))?, "version 2");
        assert_eq!(repo.current_revision(), Some(original));
        Ok(())
    }

    #[test]
    fn test_checkout_refuses_to_clobber_local_changes() -> Result<()> {
        let (dir, oids) = create_test_repo()?;
        let repo = GitRepo::open(dir.path())?;

        std::fs::write(dir.path().join("test.txt"), "uncommitted work")?;
        assert!(repo.checkout(&oids[0].to_string()).is_err());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("test.txt"))?,
            "uncommitted work"
        );
        Ok(())
    }

    #[test]
    fn test_checkout_unknown_commit_fails() -> Result<()> {
        let (dir, _) = create_test_repo()?;
        let repo = GitRepo::open(dir.path())?;
        assert!(repo.checkout("0123456789abcdef0123456789abcdef01234567").is_err());
        assert!(repo.checkout("not-a-sha").is_err());
        Ok(())
    }
}
