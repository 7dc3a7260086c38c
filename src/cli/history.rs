//! `history` command: sample commits and chart MI over time

use crate::chart::{self, ChartError};
use crate::config::ProjectConfig;
use crate::git::{GitRepo, RepoSource};
use crate::history::{sample_repository, RestoreOutcome, SamplingOptions, SamplingRun};
use crate::reporters::{html, json};
use crate::scorer::RadonScorer;
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::warn;

pub(super) fn run(
    repo: &str,
    options: &SamplingOptions,
    output: Option<&Path>,
    config: &ProjectConfig,
) -> Result<()> {
    // dropped last, so a scratch clone outlives the repository handle
    let source = RepoSource::resolve(repo)?;
    let git = GitRepo::open(source.path())?;
    let scorer = RadonScorer::from_config(&config.scorer);

    let progress = create_progress_bar();
    let run = sample_repository(&git, &scorer, source.path(), options, &progress)?;
    report_run_problems(&run);

    match output {
        Some(path) => write_report(&run, source.spec(), options, path, config),
        None => {
            println!("{}", json::render_series(&run.series)?);
            Ok(())
        }
    }
}

fn write_report(
    run: &SamplingRun,
    repo: &str,
    options: &SamplingOptions,
    path: &Path,
    config: &ProjectConfig,
) -> Result<()> {
    let png = match chart::render_png(&run.series, &config.chart) {
        Ok(png) => png,
        Err(ChartError::NoPlottableData) => {
            warn!(
                "No valid date points to plot, printing the series instead of writing {}",
                path.display()
            );
            println!("{}", json::render_series(&run.series)?);
            return Ok(());
        }
        Err(e) => return Err(e).context("Error creating HTML report"),
    };

    let metadata = run.metadata(repo, options);
    let report = html::render(&run.series, &metadata, &png)?;
    std::fs::write(path, report)
        .with_context(|| format!("Error creating HTML report {}", path.display()))?;

    eprintln!(
        "Historic MI report written to {}",
        style(path.display()).cyan()
    );
    Ok(())
}

fn report_run_problems(run: &SamplingRun) {
    if !run.skipped.is_empty() {
        eprintln!(
            "{} {} sampled commit(s) could not be checked out and were skipped",
            style("warning:").yellow().bold(),
            run.skipped.len()
        );
    }
    if let RestoreOutcome::Failed { revision, message } = &run.restore {
        eprintln!(
            "{} could not restore the original revision {}: {}",
            style("warning:").yellow().bold(),
            revision,
            message
        );
    }
}

fn create_progress_bar() -> ProgressBar {
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|s| s.progress_chars("█▓▒░  "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let bar = ProgressBar::new(0);
    bar.set_style(style);
    bar
}
