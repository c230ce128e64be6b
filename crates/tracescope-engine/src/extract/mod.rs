//! Trace extraction: raw log text in, raw trace blocks out.
//!
//! Scanning is a single left-to-right pass. At every position the matchers in
//! [`DEFAULT_MATCHERS`] are asked for their next start; the leftmost start wins
//! (earlier matcher on ties), the winning matcher decides where the block
//! ends, and scanning resumes from that end. Consumed ranges never overlap.

pub mod boundary;
mod matchers;

pub use boundary::{ERROR_SUFFIXES, TRACEBACK_MARKER};
pub use matchers::{
    BlockMatcher, BlockStart, DEFAULT_MATCHERS, InlineExceptionMatcher, TracebackMatcher,
};

/// Iterator over the trace blocks of one log text, in order of appearance.
///
/// Yielded blocks borrow from the input and carry no trailing line breaks, so
/// a block cut short by the next record and an identical block ending the
/// input compare equal.
pub struct Extractor<'a> {
    text: &'a str,
    cursor: usize,
    matchers: &'static [&'static dyn BlockMatcher],
    // Per matcher: `None` = not searched yet, `Some(None)` = exhausted.
    pending: Vec<Option<Option<BlockStart>>>,
}

impl<'a> Extractor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::with_matchers(text, DEFAULT_MATCHERS)
    }

    pub fn with_matchers(text: &'a str, matchers: &'static [&'static dyn BlockMatcher]) -> Self {
        Self {
            text,
            cursor: 0,
            matchers,
            pending: vec![None; matchers.len()],
        }
    }

    fn next_start(&mut self, index: usize) -> Option<BlockStart> {
        match self.pending[index] {
            Some(Some(start)) if start.offset >= self.cursor => Some(start),
            Some(None) => None,
            _ => {
                let found = self.matchers[index].find_start(self.text, self.cursor);
                self.pending[index] = Some(found);
                found
            }
        }
    }
}

impl<'a> Iterator for Extractor<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let mut best: Option<(usize, BlockStart)> = None;
        for index in 0..self.matchers.len() {
            let Some(start) = self.next_start(index) else {
                continue;
            };
            if best.is_none_or(|(_, current)| start.offset < current.offset) {
                best = Some((index, start));
            }
        }

        let (index, start) = best?;
        let end = self.matchers[index].find_end(self.text, start);
        self.cursor = end.max(start.anchor_end);

        Some(self.text[start.offset..self.cursor].trim_end_matches(['\r', '\n']))
    }
}

/// All trace blocks in `text`, duplicates included, in order of appearance.
pub fn extract_traces(text: &str) -> Vec<&str> {
    Extractor::new(text).collect()
}
