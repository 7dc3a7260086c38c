//! Commit sampling
//!
//! Picks an evenly spaced subset of a ref's history. With `total` commits
//! and at most `max_commits` samples the stride is `max(1, total / max_commits)`
//! over the newest-first list, so when `total` is not a multiple of
//! `max_commits` the oldest part of history can go unsampled.

/// Select commits to sample.
///
/// `commits` is newest-first. The result is oldest-first, holds at most
/// `max_commits` entries, and keeps every `skip`-th entry of that selection.
/// Zero for either count is treated as 1.
pub fn select_commits<T: Clone>(commits: &[T], max_commits: usize, skip: usize) -> Vec<T> {
    let total = commits.len();
    if total == 0 {
        return Vec::new();
    }

    let max_commits = max_commits.max(1);
    let skip = skip.max(1);
    let step = (total / max_commits).max(1);

    let mut selected: Vec<T> = commits
        .iter()
        .step_by(step)
        .take(max_commits)
        .cloned()
        .collect();

    // oldest first for the time axis
    selected.reverse();

    selected
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| idx % skip == 0)
        .map(|(_, commit)| commit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn newest_first(total: usize) -> Vec<usize> {
        (0..total).collect()
    }

    #[test]
    fn test_even_spacing_truncates_then_reverses() {
        // step = 10 / 3 = 3 -> indices 0, 3, 6 (9 dropped by truncation)
        assert_eq!(select_commits(&newest_first(10), 3, 1), vec![6, 3, 0]);
    }

    #[test]
    fn test_empty_history() {
        assert!(select_commits::<usize>(&[], 5, 1).is_empty());
    }

    #[test]
    fn test_more_samples_than_commits_takes_all() {
        assert_eq!(select_commits(&newest_first(4), 50, 1), vec![3, 2, 1, 0]);
        assert_eq!(select_commits(&newest_first(4), 4, 1), vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_skip_applies_to_selection_not_raw_history() {
        assert_eq!(select_commits(&newest_first(5), 5, 2), vec![4, 2, 0]);
        // selection is [6, 3, 0]; skip=2 keeps positions 0 and 2
        assert_eq!(select_commits(&newest_first(10), 3, 2), vec![6, 0]);
    }

    #[test]
    fn test_under_sampling_when_not_divisible() {
        // step = 7 / 4 = 1 -> first 4 commits only
        assert_eq!(select_commits(&newest_first(7), 4, 1), vec![3, 2, 1, 0]);
        // step = 11 / 5 = 2 -> 0, 2, 4, 6, 8
        assert_eq!(select_commits(&newest_first(11), 5, 1), vec![8, 6, 4, 2, 0]);
    }

    #[test]
    fn test_zero_counts_treated_as_one() {
        assert_eq!(select_commits(&newest_first(3), 0, 0), vec![0]);
    }

    #[test]
    fn test_never_exceeds_max() {
        for total in 1..40 {
            for max in 1..12 {
                let picked = select_commits(&newest_first(total), max, 1);
                assert!(picked.len() <= max);
                assert!(picked.windows(2).all(|w| w[0] > w[1]));
            }
        }
    }
}
