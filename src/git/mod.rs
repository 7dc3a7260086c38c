//! Version-control access
//!
//! Thin wrapper over libgit2 covering exactly what a historic run needs.
//!
//! # Example
//!
//! ```no_run
//! use mi_analysis::git::{GitRepo, RepoSource};
//!
//! let source = RepoSource::resolve("https://github.com/org/project.git").unwrap();
//! let repo = GitRepo::open(source.path()).unwrap();
//! let commits = repo.list_commits("HEAD").unwrap();
//! // `source` removes its scratch clone when dropped
//! ```

pub mod repository;
pub mod source;

pub use repository::{GitRepo, Revision};
pub use source::RepoSource;
