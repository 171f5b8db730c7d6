//! Suggestion filtering.
//!
//! Filtering is a stable subsequence: matches keep their original relative
//! order and are never re-ranked.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde::{Deserialize, Serialize};

use crate::catalog::Candidate;

/// How a query is matched against candidate labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-insensitive substring match.
    #[default]
    Contains,
    /// Fuzzy match via nucleo-matcher. Only decides membership; the
    /// original order is kept.
    Fuzzy,
}

/// Return the indices of `pool` whose label matches `query`, in pool order.
///
/// The query is trimmed first. An empty query matches everything.
///
/// # Example
///
/// ```
/// use flexfilter::{MatchMode, filter_candidates};
///
/// let pool = ["Status", "Owner", "Created at"];
/// assert_eq!(filter_candidates(" at", &pool, MatchMode::Contains), vec![0, 2]);
/// ```
pub fn filter_candidates<C: Candidate>(query: &str, pool: &[C], mode: MatchMode) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return (0..pool.len()).collect();
    }

    match mode {
        MatchMode::Contains => {
            let needle = query.to_lowercase();
            pool.iter()
                .enumerate()
                .filter(|(_, c)| c.match_label().to_lowercase().contains(&needle))
                .map(|(index, _)| index)
                .collect()
        }
        MatchMode::Fuzzy => {
            let mut matcher = Matcher::new(Config::DEFAULT);
            let pattern = Pattern::new(
                query,
                CaseMatching::Ignore,
                Normalization::Smart,
                AtomKind::Fuzzy,
            );
            let mut buf = Vec::new();
            pool.iter()
                .enumerate()
                .filter(|(_, c)| {
                    let haystack = Utf32Str::new(c.match_label(), &mut buf);
                    pattern.score(haystack, &mut matcher).is_some()
                })
                .map(|(index, _)| index)
                .collect()
        }
    }
}
