use std::io::{self, IsTerminal};

pub const CYAN: &str = "36";
pub const YELLOW: &str = "33";

pub fn colorize(value: &str, code: &str, enabled: bool) -> String {
    if enabled {
        format!("\u{1b}[{code}m{value}\u{1b}[0m")
    } else {
        value.to_string()
    }
}

/// Colour only when stdout is an interactive terminal.
pub fn stdout_supports_color() -> bool {
    io::stdout().is_terminal()
}
