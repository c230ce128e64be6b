use super::boundary::{self, EXCEPTION_NAME, TRACEBACK_MARKER};

/// Where a candidate block begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockStart {
    /// Byte offset of the first character of the block
    pub offset: usize,
    /// Byte offset just past the start anchor (marker line or exception name)
    pub anchor_end: usize,
}

/// One family of trace blocks.
///
/// Matchers are tried in order at every scan position; the earliest start
/// wins and, on equal offsets, the matcher listed first.
pub trait BlockMatcher: Send + Sync {
    /// Earliest block start at or after `from`
    fn find_start(&self, text: &str, from: usize) -> Option<BlockStart>;

    /// Byte offset where the block opened at `start` stops consuming input.
    /// Always greater than `start.offset`.
    fn find_end(&self, text: &str, start: BlockStart) -> usize;
}

/// Python-style `Traceback (most recent call last):` blocks.
///
/// Runs until a newline that is immediately followed by a structured record
/// (`LEVEL: token` or a `YYYY-MM-DD` date), or to end of input.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracebackMatcher;

impl BlockMatcher for TracebackMatcher {
    fn find_start(&self, text: &str, from: usize) -> Option<BlockStart> {
        let offset = from + text.get(from..)?.find(TRACEBACK_MARKER)?;
        Some(BlockStart {
            offset,
            anchor_end: offset + TRACEBACK_MARKER.len(),
        })
    }

    fn find_end(&self, text: &str, start: BlockStart) -> usize {
        let mut pos = start.anchor_end;
        while let Some(found) = text[pos..].find('\n') {
            let newline = pos + found;
            if boundary::opens_record(&text[newline + 1..]) {
                return newline;
            }
            pos = newline + 1;
        }
        text.len()
    }
}

/// Inline `pkg.SomethingException: message` blocks with their frame lines.
///
/// Consumes whole lines after the exception name until the next line opens a
/// new record, is a lone closing bracket, or follows a blank line and is not a
/// frame. Without any such line the block runs to end of input.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExceptionMatcher;

impl BlockMatcher for InlineExceptionMatcher {
    fn find_start(&self, text: &str, from: usize) -> Option<BlockStart> {
        let name = EXCEPTION_NAME.captures_at(text, from)?.get(1)?;
        Some(BlockStart {
            offset: name.start(),
            anchor_end: name.end(),
        })
    }

    fn find_end(&self, text: &str, start: BlockStart) -> usize {
        // A bare name on its own line may already be complete.
        if boundary::blank_line_then_new_record(&text[start.anchor_end..]) {
            return start.anchor_end;
        }

        let mut pos = start.anchor_end;
        loop {
            let Some(found) = text[pos..].find('\n') else {
                return text.len();
            };
            pos += found + 1;
            if boundary::ends_inline_block(&text[pos..]) {
                return pos;
            }
        }
    }
}

/// Matchers in priority order: tracebacks win ties.
pub static DEFAULT_MATCHERS: &[&dyn BlockMatcher] = &[&TracebackMatcher, &InlineExceptionMatcher];
