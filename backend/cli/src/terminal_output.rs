//! Terminal output utilities: ANSI formatting and command listings.

use slashwire_commands::CommandSummary;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

/// Render the command listing, one `/path  description` row per leaf.
pub fn render_commands(commands: &[CommandSummary], color: bool) -> String {
    let width = commands.iter().map(|c| c.path.len() + 1).max().unwrap_or(0);
    commands
        .iter()
        .map(|c| {
            let path = format!("/{:<width$}", c.path, width = width.saturating_sub(1));
            if color {
                format!("{CYAN}{BOLD}{path}{RESET}  {DIM}{}{RESET}", c.description)
            } else {
                format!("{path}  {}", c.description)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
