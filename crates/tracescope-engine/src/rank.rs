use std::cmp::Reverse;
use tracescope_types::{RankedTrace, TraceMap};

/// All traces, heaviest first.
///
/// Ordered by weight then count (both descending); trace text breaks ties so
/// positions are stable across runs.
pub fn rank(map: &TraceMap) -> Vec<RankedTrace<'_>> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by_key(|(trace, record)| (Reverse(record.weight), Reverse(record.count), *trace));

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (trace, record))| RankedTrace {
            position: i + 1,
            trace,
            record,
        })
        .collect()
}

/// Ranked traces whose text contains `term`, ignoring case.
///
/// Positions are those of the full ranking. A blank term matches nothing.
pub fn search<'a>(map: &'a TraceMap, term: &str) -> Vec<RankedTrace<'a>> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    rank(map)
        .into_iter()
        .filter(|ranked| ranked.trace.to_lowercase().contains(&term))
        .collect()
}

/// Resolve a reference typed by an operator: a 1-based rank position or the
/// exact trace text.
pub fn find_ranked<'a>(map: &'a TraceMap, reference: &str) -> Option<RankedTrace<'a>> {
    let ranked = rank(map);
    if let Ok(position) = reference.trim().parse::<usize>()
        && let Some(found) = ranked.iter().find(|r| r.position == position)
    {
        return Some(*found);
    }
    ranked.into_iter().find(|r| r.trace == reference)
}
