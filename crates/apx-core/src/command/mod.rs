//! Command text → request descriptor.
//!
//! The extraction backend hands back a shell command (`curl ...`). Callers
//! only ever see the [`CommandParser`] trait; [`CurlHeuristicParser`] is the
//! pattern-based implementation used by default.

mod descriptor;
mod heuristic;

pub use descriptor::RequestDescriptor;
pub use heuristic::CurlHeuristicParser;

/// Turns command text into a [`RequestDescriptor`].
///
/// Implementations are pure and total: malformed input degrades to defaults
/// (method `GET`, empty URL, no headers, no body) instead of failing.
pub trait CommandParser: Send + Sync {
    fn parse(&self, command: &str) -> RequestDescriptor;
}

/// Parse with the default heuristic parser.
pub fn parse_command(command: &str) -> RequestDescriptor {
    CurlHeuristicParser.parse(command)
}
