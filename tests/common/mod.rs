//! Shared fixtures: git repositories with controlled history and a
//! stand-in scorer script that speaks radon's JSON.

#![allow(dead_code)]

use git2::{Repository, Signature, Time};
use std::path::{Path, PathBuf};

/// 2020-09-13T12:26:40Z
pub const BASE_TIME: i64 = 1_600_000_000;
pub const DAY: i64 = 86_400;

/// Scorer that reports one file whose MI is the content of `score.txt`,
/// or nothing at all when the snapshot has no `score.txt`.
pub const SNAPSHOT_SCORER: &str = r#"#!/bin/sh
if [ -f "$1/score.txt" ]; then
  printf '{"%s/mod.py": {"mi": %s, "rank": "A"}}' "$1" "$(cat "$1/score.txt")"
else
  printf '{}'
fi
"#;

/// Scorer with a fixed report: one A file, one C file, one E file.
pub const FIXED_SCORER: &str = r#"#!/bin/sh
printf '{"%s/clean.py": {"mi": 91.3, "rank": "A"}, "%s/pkg/messy.py": {"mi": 55.456, "rank": "A"}, "%s/legacy.py": {"mi": 12.0, "rank": "B"}}' "$1" "$1" "$1"
"#;

pub fn signature(secs: i64) -> Signature<'static> {
    Signature::new("Test User", "test@example.com", &Time::new(secs, 0)).unwrap()
}

/// Write `files` into the work tree and commit them on top of HEAD.
pub fn commit_files(repo: &Repository, files: &[(&str, &str)], message: &str, secs: i64) -> String {
    let workdir = repo.workdir().unwrap().to_path_buf();
    let mut index = repo.index().unwrap();
    for (name, content) in files {
        let path = workdir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        index.add_path(Path::new(name)).unwrap();
    }
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = signature(secs);
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
        .to_string()
}

/// A repository with one commit per score, a day apart, oldest first.
///
/// Returns the commit ids in the same (oldest first) order.
pub fn repo_with_scores(dir: &Path, scores: &[f64]) -> (Repository, Vec<String>) {
    let repo = Repository::init(dir).unwrap();
    let mut ids = Vec::new();
    for (i, score) in scores.iter().enumerate() {
        let content = score.to_string();
        let id = commit_files(
            &repo,
            &[("score.txt", content.as_str()), ("mod.py", "x = 1\n")],
            &format!("commit {}", i),
            BASE_TIME + i as i64 * DAY,
        );
        ids.push(id);
    }
    (repo, ids)
}

/// Write a scorer script and return the command that runs it.
pub fn scorer_command(dir: &Path, script: &str) -> Vec<String> {
    let path = dir.join("score.sh");
    std::fs::write(&path, script).unwrap();
    vec!["sh".to_string(), path.display().to_string()]
}

/// Write a config file pointing the scorer at `script`.
pub fn write_config(dir: &Path, script: &str) -> PathBuf {
    let command = scorer_command(dir, script);
    let config = dir.join("mi-analysis.toml");
    std::fs::write(
        &config,
        format!("[scorer]\ncommand = ['{}', '{}']\n", command[0], command[1]),
    )
    .unwrap();
    config
}
