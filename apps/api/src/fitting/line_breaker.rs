//! Line Breaker: splits text into display lines under a width limit.
//!
//! # Rules, in priority order
//! 1. Text containing `\n` is split on it verbatim. Width and `no_wrap` are ignored.
//! 2. `no_wrap` keeps the whole text on one line.
//! 3. Text that already fits on one line is returned unchanged.
//! 4. Otherwise greedy word wrap on single spaces. A word wider than the limit
//!    sits alone on its own line and overflows.

use crate::fitting::error::FitError;
use crate::fitting::oracle::{measure_line, FontBlob, ShapingOracle};

/// Breaks `text` into lines measured at `font_size`.
///
/// Stateless: every width check goes through the oracle at the size the caller
/// is currently testing. The result always holds at least one line.
pub fn break_text<O: ShapingOracle + ?Sized>(
    oracle: &O,
    text: &str,
    font: &FontBlob,
    font_size: f32,
    max_width: f32,
    no_wrap: bool,
) -> Result<Vec<String>, FitError> {
    if text.contains('\n') {
        return Ok(text.split('\n').map(str::to_string).collect());
    }

    if no_wrap {
        return Ok(vec![text.to_string()]);
    }

    let measure = |candidate: &str| -> Result<f32, FitError> {
        Ok(measure_line(oracle, candidate, font, font_size)?.longest_line_width)
    };

    if measure(text)? <= max_width {
        return Ok(vec![text.to_string()]);
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in text.split(' ') {
        current.push(word);
        if current.len() == 1 {
            // First word on a line stays there even if it overflows.
            continue;
        }

        if measure(&current.join(" "))? > max_width {
            current.pop();
            lines.push(current.join(" "));
            current.clear();
            current.push(word);
        }
    }
    lines.push(current.join(" "));

    Ok(lines)
}
