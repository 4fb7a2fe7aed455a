//! Terminal color styles for user-facing output.

use console::Style;

/// Success (green)
pub fn success() -> Style {
    Style::new().green().bold()
}

/// Error (red)
pub fn error() -> Style {
    Style::new().red().bold()
}

/// Warning (yellow)
pub fn warning() -> Style {
    Style::new().yellow()
}

/// Numeric values (blue)
pub fn number() -> Style {
    Style::new().blue().bold()
}

/// De-emphasized text (grey)
pub fn dim() -> Style {
    Style::new().dim()
}
