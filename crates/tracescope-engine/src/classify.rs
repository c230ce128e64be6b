use std::collections::BTreeMap;
use tracescope_types::{ClassificationRecord, TraceMap};

use crate::catalog::RuleCatalog;
use crate::extract::boundary::EXCEPTION_NAME;

/// Full exception name on `line`, e.g. `com.acme.widgets.core.NullPointerException`.
///
/// Only the leftmost candidate is returned.
pub fn exception_name(line: &str) -> Option<&str> {
    EXCEPTION_NAME
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Last dotted segment of a full exception name
pub fn simple_name(full_name: &str) -> &str {
    full_name.rsplit('.').next().unwrap_or(full_name)
}

/// Occurrences of each distinct block
pub fn count_blocks<'a, I>(blocks: I) -> BTreeMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = BTreeMap::new();
    for block in blocks {
        *counts.entry(block).or_insert(0) += 1;
    }
    counts
}

/// Resolve the record for one distinct block seen `count` times.
pub fn classify_block(block: &str, count: usize, catalog: &RuleCatalog) -> ClassificationRecord {
    let Some(full_name) = block.lines().find_map(exception_name) else {
        return ClassificationRecord::unknown(count);
    };

    let simple = simple_name(full_name);
    let terminal = catalog.terminal_weight(simple);
    let package_key = catalog.longest_package_prefix(full_name);

    ClassificationRecord {
        count,
        weight: terminal.unwrap_or(1).max(1),
        display_name: full_name.to_string(),
        class_key: terminal.map(|_| simple.to_string()),
        package_key: package_key.map(str::to_string),
        selected: false,
    }
}

/// Deduplicate `blocks` and classify every distinct one.
pub fn classify<'a, I>(blocks: I, catalog: &RuleCatalog) -> TraceMap
where
    I: IntoIterator<Item = &'a str>,
{
    count_blocks(blocks)
        .into_iter()
        .map(|(block, count)| (block.to_string(), classify_block(block, count, catalog)))
        .collect()
}
