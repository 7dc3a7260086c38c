//! CLI command definitions and handlers

mod history;
mod scan;

use crate::config;
use crate::history::SamplingOptions;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use std::path::{Path, PathBuf};

/// Parse and validate a count that must be at least 1
fn parse_positive(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// mi-analysis - Maintainability Index mining for git repositories
#[derive(Parser, Debug)]
#[command(name = "mi-analysis")]
#[command(
    version,
    about = "Maintainability Index analysis of a repository and its history",
    after_help = "\
Examples:
  mi-analysis static .                                  List files graded below A
  mi-analysis static https://github.com/org/repo.git    Scan a remote repository
  mi-analysis history . --max-commits 20                MI over the last 20 sampled commits (JSON)
  mi-analysis history . --branch main -o report.html    Standalone HTML report with chart"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Config file (default: ./mi-analysis.toml when present)
    #[arg(long, global = true, env = "MI_ANALYSIS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the current state of a repository and list files graded below A
    Static {
        /// Local path or git URL
        repo: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Sample commit history and track the average MI over time
    #[command(after_help = "\
Without --output the series is printed as JSON. With --output a single
HTML file is written containing the run metadata, the chart and the data.")]
    History {
        /// Local path or git URL
        repo: String,

        /// How many commits to sample, evenly spaced (default: 50)
        #[arg(long, value_parser = parse_positive)]
        max_commits: Option<usize>,

        /// Keep every Nth sampled commit (default: 1 = all)
        #[arg(long, value_parser = parse_positive)]
        skip: Option<usize>,

        /// Branch or ref to walk (default: HEAD)
        #[arg(long)]
        branch: Option<String>,

        /// HTML report path (default: print JSON to stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Cannot determine working directory")?;
    let settings = config::load(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Static { repo, output } => scan::run(&repo, output.as_deref(), &settings),

        Commands::History {
            repo,
            max_commits,
            skip,
            branch,
            output,
        } => {
            let mut options = SamplingOptions::from(settings.history.clone());
            if let Some(n) = max_commits {
                options.max_commits = n;
            }
            if let Some(n) = skip {
                options.skip = n;
            }
            if let Some(b) = branch {
                options.branch = b;
            }
            history::run(&repo, &options, output.as_deref(), &settings)
        }
    }
}

/// Write command output to a file, or stdout when no path is given
fn emit(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Report written to: {}", style(path.display()).cyan());
        }
        None => println!("{}", content),
    }
    Ok(())
}
