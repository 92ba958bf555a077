use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "duration-labeler",
    version,
    about = "Label issues by how long they have been open"
)]
pub struct Cli {
    /// Output format for the run summary
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a TOML config file
    #[arg(long, env = "DURATION_LABELER_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Repository to label, as owner/repo
    #[arg(long, short = 'r', env = "GITHUB_REPOSITORY", value_name = "OWNER/REPO")]
    pub repository: Option<String>,

    /// API token (overrides config file and GITHUB_TOKEN)
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub API base URL (for GitHub Enterprise)
    #[arg(long, env = "GITHUB_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    #[command(flatten)]
    pub inputs: LabelInputs,

    /// Log the label changes without sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Leave pull requests unlabeled
    #[arg(long)]
    pub skip_pull_requests: bool,

    /// Evaluate ages at this RFC 3339 instant instead of the current time
    #[arg(long, env = "DURATION_LABELER_NOW", hide = true)]
    pub now: Option<String>,
}

/// Labeling inputs, also read from the GitHub Actions `INPUT_*` variables.
///
/// Values are kept as raw strings; parsing and defaulting happen during
/// config resolution.
#[derive(Args, Debug, Default, Clone)]
pub struct LabelInputs {
    /// Upper bound (days, inclusive) of the short tier [default: 7]
    #[arg(long, env = "INPUT_SHORT_THRESHOLD", value_name = "DAYS")]
    pub short_threshold: Option<String>,

    /// Upper bound (days, inclusive) of the medium tier [default: 30]
    #[arg(long, env = "INPUT_MEDIUM_THRESHOLD", value_name = "DAYS")]
    pub medium_threshold: Option<String>,

    /// Label color of the short tier [default: 00FF00]
    #[arg(long, env = "INPUT_SHORT_COLOR", value_name = "HEX")]
    pub short_color: Option<String>,

    /// Label color of the medium tier [default: FFA500]
    #[arg(long, env = "INPUT_MEDIUM_COLOR", value_name = "HEX")]
    pub medium_color: Option<String>,

    /// Label color of the long tier [default: FF0000]
    #[arg(long, env = "INPUT_LONG_COLOR", value_name = "HEX")]
    pub long_color: Option<String>,

    /// Only update labels once a label was computed ("true" to enable)
    #[arg(long, env = "INPUT_THRESHOLDED_UPDATE", value_name = "BOOL")]
    pub thresholded_update: Option<String>,

    /// Only process issues carrying this label
    #[arg(long, env = "INPUT_FILTER_LABEL", value_name = "LABEL")]
    pub filter_label: Option<String>,

    /// Issue state to process: open, closed or all [default: all]
    #[arg(long, env = "INPUT_ISSUE_STATE", value_name = "STATE")]
    pub issue_state: Option<String>,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}
