//! Trace extraction and classification.
//!
//! The engine is pure: it takes materialized log text and a loaded
//! [`RuleCatalog`] and returns a [`TraceMap`]. All file and session handling
//! lives in `tracescope-runtime`.
//!
//! ```
//! use tracescope_engine::{RuleCatalog, analyze};
//!
//! let catalog = RuleCatalog::from_json_str(
//!     r#"{"ValueError": {"definition": "Bad argument value.", "weighting": 3}}"#,
//! ).unwrap();
//! let traces = analyze(["ValueError: bad input"], &catalog);
//! assert_eq!(traces["ValueError: bad input"].weight, 3);
//! ```

pub mod catalog;
pub mod classify;
pub mod extract;
pub mod rank;

pub use catalog::{CatalogLoadError, NO_DEFINITION, RuleCatalog};
pub use classify::{classify, classify_block, exception_name, simple_name};
pub use extract::{Extractor, extract_traces};
pub use rank::{find_ranked, rank, search};

pub use tracescope_types::{ClassificationRecord, RankedTrace, TraceMap};

/// Join `texts` with a newline, extract every block and classify it.
pub fn analyze<I, S>(texts: I, catalog: &RuleCatalog) -> TraceMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = texts
        .into_iter()
        .map(|t| t.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join("\n");
    analyze_text(&joined, catalog)
}

/// Extract and classify a single already-joined text.
pub fn analyze_text(text: &str, catalog: &RuleCatalog) -> TraceMap {
    classify(Extractor::new(text), catalog)
}
