pub mod record;
pub mod rule;
pub mod session;

pub use record::{ClassificationRecord, RankedTrace, TraceMap, UNKNOWN_ERROR};
pub use rule::RuleEntry;
pub use session::{SessionData, SessionIndex, SessionSummary};
