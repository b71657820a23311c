use console::style;
use std::fmt::Display;

/// Cyan — persona one's turns
pub fn persona_one<D: Display>(text: D) -> String {
    style(text).cyan().to_string()
}

/// Yellow — persona two's turns
pub fn persona_two<D: Display>(text: D) -> String {
    style(text).yellow().to_string()
}

/// Magenta — separator lines between turns
pub fn separator<D: Display>(text: D) -> String {
    style(text).magenta().to_string()
}

/// Green — lifecycle confirmations (start, end, saved log path)
pub fn success<D: Display>(text: D) -> String {
    style(text).green().to_string()
}

/// Red — interrupt hints and stop notices
pub fn notice<D: Display>(text: D) -> String {
    style(text).red().to_string()
}

/// Dim — secondary text
pub fn dim<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}
