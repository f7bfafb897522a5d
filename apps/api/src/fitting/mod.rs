// Text fitting engine: line breaking, block summaries and the font-size search.
// Everything here is synchronous and backend-agnostic; measurements come from a
// `ShapingOracle` supplied by the caller.

pub mod error;
pub mod line_breaker;
pub mod oracle;
pub mod solver;
pub mod summarizer;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the public API consumed by the renderer and the HTTP handlers.
pub use error::FitError;
pub use oracle::{measure_line, FontBlob, ShapedBlock, ShapingOracle};
pub use solver::{fit, FitRequest, FitResult};
pub use summarizer::{longest_line_width, total_lines_height};
