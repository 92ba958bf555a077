use crate::cli::ColorChoice;
use std::io::IsTerminal;

/// Decide whether output is colorized, honoring the CLI choice and NO_COLOR.
///
/// Returns the decision so the log writer can follow it too.
pub fn init(choice: ColorChoice) -> bool {
    let should_color = match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            // Respect NO_COLOR standard (https://no-color.org/)
            if std::env::var("NO_COLOR").is_ok() {
                false
            } else {
                // Only colorize if stdout is a terminal
                std::io::stdout().is_terminal()
            }
        }
    };

    colored::control::set_override(should_color);
    should_color
}
