//! mi-analysis - Maintainability Index mining for git repositories
//!
//! Scores a repository's Python sources with an external MI tool, either
//! once for the current tree or across a sample of its commit history, and
//! reports the results as text, JSON or a standalone HTML page with a chart.

pub mod chart;
pub mod cli;
pub mod config;
pub mod git;
pub mod history;
pub mod models;
pub mod reporters;
pub mod scorer;
pub mod scoring;
