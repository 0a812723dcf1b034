//! "Did you mean" suggestions ranked by edit distance.

use std::collections::BTreeSet;

pub const DEFAULT_MAX_DISTANCE: usize = 2;
pub const DEFAULT_MAX_RESULTS: usize = 3;

/// Levenshtein distance over chars (insert, delete, substitute all cost 1).
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Closest candidates within `max_distance`, at most `max_results` of them.
///
/// Ordered by distance, then shorter candidate, then lexicographically, so the
/// output is fully deterministic for a given candidate set.
pub fn fuzzy_match<'a, I>(
    input: &str,
    candidates: I,
    max_distance: usize,
    max_results: usize,
) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let input_len = input.chars().count();
    let unique: BTreeSet<&str> = candidates.into_iter().collect();

    let mut scored: Vec<(usize, usize, &str)> = unique
        .into_iter()
        .filter_map(|candidate| {
            let candidate_len = candidate.chars().count();
            if input_len.abs_diff(candidate_len) > max_distance {
                return None;
            }
            let distance = edit_distance(input, candidate);
            (distance <= max_distance).then_some((distance, candidate_len, candidate))
        })
        .collect();

    scored.sort();
    scored
        .into_iter()
        .take(max_results)
        .map(|(_, _, candidate)| candidate.to_string())
        .collect()
}

/// [`fuzzy_match`] with the default bounds.
pub fn suggest<'a, I>(input: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    fuzzy_match(input, candidates, DEFAULT_MAX_DISTANCE, DEFAULT_MAX_RESULTS)
}
