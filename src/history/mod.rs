//! Historic maintainability sampling
//!
//! Walks a sampled subset of a ref's commits oldest-first, scores the
//! working tree at each one, and always puts the tree back where it was.
//!
//! # Failure handling
//!
//! - No commits on the ref: [`HistoryError::NoCommits`], nothing is checked out
//! - A commit fails to check out: logged, skipped, not recorded
//! - The scorer returns nothing usable: recorded as a gap (`avg_mi = null`)
//! - Restoring the original revision fails: reported in [`SamplingRun::restore`],
//!   the collected series is still returned

mod sampler;
mod worktree;

pub use sampler::select_commits;
pub use worktree::{RestoreOutcome, WorkTree, WorkTreeSession};

use crate::config::HistoryConfig;
use crate::git::GitRepo;
use crate::models::{Commit, RunMetadata, SampleResult, Series};
use crate::scorer::Scorer;
use crate::scoring::{aggregate, round2};
use indicatif::ProgressBar;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Fatal conditions for a historic run
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Error fetching commits from {branch}: {message}")]
    ListCommits { branch: String, message: String },

    #[error("No commits found on {branch}.")]
    NoCommits { branch: String },
}

/// Sampling parameters for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingOptions {
    pub max_commits: usize,
    pub skip: usize,
    pub branch: String,
}

impl From<HistoryConfig> for SamplingOptions {
    fn from(config: HistoryConfig) -> Self {
        Self {
            max_commits: config.max_commits,
            skip: config.skip,
            branch: config.branch,
        }
    }
}

/// A commit that was sampled but could not be checked out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCommit {
    pub revision: String,
    pub reason: String,
}

/// Everything a historic run produced
#[derive(Debug, Clone)]
pub struct SamplingRun {
    /// Samples in oldest-first order
    pub series: Series,
    /// Sampled commits that failed to check out
    pub skipped: Vec<SkippedCommit>,
    /// Result of putting the working tree back
    pub restore: RestoreOutcome,
    /// Commits reachable from the ref
    pub total_commits: usize,
}

impl SamplingRun {
    /// Metadata block for reports
    pub fn metadata(&self, repo: &str, options: &SamplingOptions) -> RunMetadata {
        RunMetadata {
            repo: repo.to_string(),
            branch: options.branch.clone(),
            max_commits: options.max_commits,
            skip: options.skip,
            total_commits: self.total_commits,
            collected_points: self.series.len(),
        }
    }
}

/// List the ref's commits and sample them.
pub fn sample_repository<S: Scorer>(
    repo: &GitRepo,
    scorer: &S,
    scan_path: &Path,
    options: &SamplingOptions,
    progress: &ProgressBar,
) -> Result<SamplingRun, HistoryError> {
    info!(
        "Gathering up to {} commits from {} ...",
        options.max_commits, options.branch
    );
    let commits = repo
        .list_commits(&options.branch)
        .map_err(|e| HistoryError::ListCommits {
            branch: options.branch.clone(),
            message: format!("{:#}", e),
        })?;

    collect_series(repo, scorer, scan_path, &commits, options, progress)
}

/// Visit the sampled commits and score each snapshot.
///
/// `commits` is the ref's full history, newest first. `scan_path` is the
/// directory handed to the scorer after every checkout.
pub fn collect_series<W, S>(
    tree: &W,
    scorer: &S,
    scan_path: &Path,
    commits: &[Commit],
    options: &SamplingOptions,
    progress: &ProgressBar,
) -> Result<SamplingRun, HistoryError>
where
    W: WorkTree + ?Sized,
    S: Scorer + ?Sized,
{
    if commits.is_empty() {
        return Err(HistoryError::NoCommits {
            branch: options.branch.clone(),
        });
    }

    let sampled = select_commits(commits, options.max_commits, options.skip);
    progress.set_length(sampled.len() as u64);

    let session = WorkTreeSession::acquire(tree);
    let mut series = Vec::with_capacity(sampled.len());
    let mut skipped = Vec::new();

    for commit in &sampled {
        info!("Analyzing commit {} @ {}", commit.id, commit.timestamp);
        progress.set_message(short_id(&commit.id).to_string());

        if let Err(e) = session.checkout(&commit.id) {
            warn!("Error checking out {}: {:#}", commit.id, e);
            skipped.push(SkippedCommit {
                revision: commit.id.clone(),
                reason: format!("{:#}", e),
            });
            progress.inc(1);
            continue;
        }

        let report = scorer.score(scan_path);
        let aggregate_score = aggregate(&report).map(round2);
        if aggregate_score.is_none() {
            warn!("No usable scores for {}, recording a gap", commit.id);
        }

        series.push(SampleResult {
            revision: commit.id.clone(),
            timestamp: commit.timestamp.clone(),
            aggregate_score,
            file_count: report.len(),
        });
        progress.inc(1);
    }

    let restore = session.release();
    progress.finish_and_clear();

    Ok(SamplingRun {
        series,
        skipped,
        restore,
        total_commits: commits.len(),
    })
}

fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}
