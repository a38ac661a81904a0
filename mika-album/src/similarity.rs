//! Fuzzy string similarity on a 0-100 scale
//!
//! `ratio` is the Indel ratio `2 * LCS / (len_a + len_b)`, where LCS is the
//! longest common character subsequence. `token_set_ratio` compares the
//! shared word set against each side's leftovers, so word order and extra
//! words on one side do not hurt the score.

use std::collections::BTreeSet;

/// Plain character similarity (0-100)
///
/// Two empty strings are identical (100).
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * common_subsequence_len(&a, &b) as f64 / total as f64
}

/// Length of the longest common subsequence, one DP row at a time
fn common_subsequence_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Token-set similarity (0-100)
///
/// Returns 0 if either side has no tokens, and 100 when one side's tokens
/// are a subset of the other's.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let only_a: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let only_b: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !intersection.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 100.0;
    }

    let shared = intersection.join(" ");
    let combined_a = join_nonempty(&shared, &only_a.join(" "));
    let combined_b = join_nonempty(&shared, &only_b.join(" "));

    let mut best = ratio(&combined_a, &combined_b);
    if !shared.is_empty() {
        best = best
            .max(ratio(&shared, &combined_a))
            .max(ratio(&shared, &combined_b));
    }
    best
}

fn join_nonempty(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{} {}", head, tail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_bounds() {
        assert_eq!(ratio("young thug", "young thug"), 100.0);
        assert_eq!(ratio("", ""), 100.0);
        assert!(ratio("abc", "xyz") < 1.0);
        let partial = ratio("Young Thug", "Young Thug (2)");
        assert!(partial > 50.0 && partial < 100.0, "got {}", partial);
    }

    #[test]
    fn test_ratio_counts_insertions_and_deletions() {
        // 2 * 10 / (10 + 14)
        assert!((ratio("Young Thug", "Young Thug (2)") - 83.333).abs() < 0.01);
        // 2 * 6 / (6 + 10), right on the artist threshold
        assert_eq!(ratio("Future", "Future (4)"), 75.0);
        assert_eq!(ratio("Future", "Future Islands"), 60.0);
        // A substitution costs a deletion plus an insertion
        assert_eq!(ratio("abcd", "abxd"), 75.0);
    }

    #[test]
    fn test_token_set_ignores_order_and_subsets() {
        assert_eq!(token_set_ratio("thug young", "young thug"), 100.0);
        assert_eq!(token_set_ratio("barter 6", "barter 6 deluxe"), 100.0);
    }

    #[test]
    fn test_token_set_empty_side() {
        assert_eq!(token_set_ratio("", "anything"), 0.0);
        assert_eq!(token_set_ratio("   ", "anything"), 0.0);
    }

    #[test]
    fn test_token_set_partial_overlap() {
        let score = token_set_ratio("slime season 3", "slime season 2");
        assert!(score > 80.0 && score < 100.0, "got {}", score);

        let unrelated = token_set_ratio("nevermind", "thriller");
        assert!(unrelated < 50.0, "got {}", unrelated);
    }
}
