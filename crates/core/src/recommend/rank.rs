use crate::domain::inventory::ScoredRecord;

/// Number of recommendations returned per request.
pub const TOP_K: usize = 5;

/// Orders candidates best-first (ascending score) and keeps the first [`TOP_K`].
/// The sort is stable: equal scores keep the order the catalog returned them in.
pub fn rank(mut scored: Vec<ScoredRecord>) -> Vec<ScoredRecord> {
    scored.sort_by(|a, b| a.score.total_cmp(&b.score));
    scored.truncate(TOP_K);
    scored
}
