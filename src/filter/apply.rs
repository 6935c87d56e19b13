// file: src/filter/apply.rs
// description: derives the displayed subset from fetched results and filter state

use super::state::FilterState;
use crate::models::SearchResult;
use chrono::{DateTime, Utc};

/// Returns the results that pass every active predicate, in fetch order.
///
/// Per record:
/// - its source must be enabled
/// - its confidence must reach the threshold
/// - with non-empty `search_text`, title or description must contain it
///   (case-insensitive) and the time window is not consulted
/// - otherwise its date must fall inside the time window
pub fn apply_filters<'a>(
    results: &'a [SearchResult],
    filters: &FilterState,
    search_text: Option<&str>,
    now: DateTime<Utc>,
) -> Vec<&'a SearchResult> {
    let needle = search_text
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_lowercase);

    results
        .iter()
        .filter(|result| matches(result, filters, needle.as_deref(), now))
        .collect()
}

/// `needle_lower` must already be lowercased.
pub fn matches(
    result: &SearchResult,
    filters: &FilterState,
    needle_lower: Option<&str>,
    now: DateTime<Utc>,
) -> bool {
    if !filters.sources.is_enabled(&result.source) {
        return false;
    }

    if result.confidence_score < filters.min_confidence {
        return false;
    }

    if let Some(needle) = needle_lower {
        return result.matches_text(needle);
    }

    within_window(result, filters, now)
}

fn within_window(result: &SearchResult, filters: &FilterState, now: DateTime<Utc>) -> bool {
    let Some(max_hours) = filters.time_range.max_age_hours() else {
        return true;
    };

    match result.timestamp() {
        Some(ts) => {
            let hours = (now - ts).num_milliseconds() as f64 / 3_600_000.0;
            hours <= max_hours
        }
        None => false,
    }
}
