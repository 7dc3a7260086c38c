//! `static` command: one-shot scan of the current tree

use crate::config::ProjectConfig;
use crate::git::RepoSource;
use crate::reporters::text;
use crate::scorer::{RadonScorer, Scorer};
use anyhow::{bail, Result};
use std::path::Path;

pub(super) fn run(repo: &str, output: Option<&Path>, config: &ProjectConfig) -> Result<()> {
    let source = RepoSource::resolve(repo)?;
    if !source.path().exists() {
        bail!("Repository path '{}' does not exist", repo);
    }

    let scorer = RadonScorer::from_config(&config.scorer);
    let report = scorer.score(source.path());
    let rendered = text::render_static(&report, source.path());

    super::emit(output, &rendered)
}
