use thiserror::Error;

/// Failure modes of a single fit request. No partial results are ever produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// The shaping backend could not be built from the supplied font data.
    #[error("Shaping oracle unavailable: {0}")]
    InvalidOracleState(String),

    /// Stepping the font size down reached zero without the text fitting the box.
    #[error("No font size fits the box (smallest size tried: {last_tried})")]
    SizeUnsatisfiable { last_tried: f32 },

    /// Empty text, or a non-positive box or font size.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),
}
