use crate::cli::Cli;
use anyhow::{anyhow, Context, Result};
use directories::{BaseDirs, ProjectDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracker_core::{IssueFilter, IssueState};

pub const DEFAULT_SHORT_THRESHOLD: i64 = 7;
pub const DEFAULT_MEDIUM_THRESHOLD: i64 = 30;
pub const DEFAULT_SHORT_COLOR: &str = "00FF00";
pub const DEFAULT_MEDIUM_COLOR: &str = "FFA500";
pub const DEFAULT_LONG_COLOR: &str = "FF0000";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// A scalar from any configuration layer.
///
/// Figment parses environment values, so `"7"` arrives as an integer and
/// `"true"` as a boolean. Everything is turned back into text before the
/// lenient parsing below.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    fn as_text(&self) -> String {
        match self {
            RawValue::Bool(b) => b.to_string(),
            RawValue::Int(n) => n.to_string(),
            RawValue::Float(f) => f.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }

    /// Hex colors made of decimal digits only lose their leading zeros when
    /// parsed as integers
    fn as_color(&self) -> String {
        match self {
            RawValue::Int(n) if *n >= 0 => format!("{:06}", n),
            other => other.as_text(),
        }
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// Layered configuration as read from files, environment and flags
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    /// Repository as owner/repo
    pub repository: Option<String>,
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub short_threshold: Option<RawValue>,
    pub medium_threshold: Option<RawValue>,
    pub short_color: Option<RawValue>,
    pub medium_color: Option<RawValue>,
    pub long_color: Option<RawValue>,
    pub thresholded_update: Option<RawValue>,
    pub filter_label: Option<RawValue>,
    pub issue_state: Option<RawValue>,
    pub dry_run: Option<bool>,
    pub skip_pull_requests: Option<bool>,
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let explicit_path = config_path.as_deref();
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        for path in config_paths(explicit_path) {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment
            .merge(Env::raw().only(&["GITHUB_TOKEN"]).map(|_| "token".into()))
            .merge(Env::prefixed("DURATION_LABELER_"));

        figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    /// Apply command-line flags (and the `INPUT_*` variables clap reads) on top
    pub fn merge_with_cli(&mut self, cli: &Cli) {
        fn set<T: From<String>>(slot: &mut Option<T>, value: &Option<String>) {
            // Actions passes unset inputs as empty strings
            if let Some(v) = value.as_ref().filter(|v| !v.is_empty()) {
                *slot = Some(T::from(v.clone()));
            }
        }

        set(&mut self.repository, &cli.repository);
        set(&mut self.token, &cli.token);
        set(&mut self.api_url, &cli.api_url);

        let inputs = &cli.inputs;
        set(&mut self.short_threshold, &inputs.short_threshold);
        set(&mut self.medium_threshold, &inputs.medium_threshold);
        set(&mut self.short_color, &inputs.short_color);
        set(&mut self.medium_color, &inputs.medium_color);
        set(&mut self.long_color, &inputs.long_color);
        set(&mut self.thresholded_update, &inputs.thresholded_update);
        set(&mut self.filter_label, &inputs.filter_label);
        set(&mut self.issue_state, &inputs.issue_state);

        if cli.dry_run {
            self.dry_run = Some(true);
        }
        if cli.skip_pull_requests {
            self.skip_pull_requests = Some(true);
        }
    }

    /// Resolve the layered values into the immutable run settings
    pub fn resolve(&self) -> Result<Settings> {
        let repository = self
            .repository
            .as_deref()
            .filter(|r| !r.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "Repository not configured. Set via --repository, GITHUB_REPOSITORY env var, or config file"
                )
            })?;
        let repository: Repository = repository.parse()?;

        let token = self.token.clone().filter(|t| !t.is_empty()).ok_or_else(|| {
            anyhow!(
                "GitHub token not configured. Set via --token, INPUT_GITHUB-TOKEN or GITHUB_TOKEN env var, or config file"
            )
        })?;

        let api_url = self
            .api_url
            .clone()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Settings {
            github: GitHubSettings {
                repository,
                token,
                api_url,
            },
            labeler: self.labeler_config()?,
        })
    }

    fn labeler_config(&self) -> Result<LabelerConfig> {
        let issue_state = match text(&self.issue_state) {
            Some(state) => state
                .parse::<IssueState>()
                .context("Invalid issue_state")?,
            None => IssueState::All,
        };

        Ok(LabelerConfig {
            thresholds: Thresholds {
                short: threshold(&self.short_threshold, DEFAULT_SHORT_THRESHOLD),
                medium: threshold(&self.medium_threshold, DEFAULT_MEDIUM_THRESHOLD),
            },
            colors: TierColors {
                short: color(&self.short_color, DEFAULT_SHORT_COLOR),
                medium: color(&self.medium_color, DEFAULT_MEDIUM_COLOR),
                long: color(&self.long_color, DEFAULT_LONG_COLOR),
            },
            thresholded_update: text(&self.thresholded_update).as_deref() == Some("true"),
            filter_label: text(&self.filter_label),
            issue_state,
            dry_run: self.dry_run.unwrap_or(false),
            skip_pull_requests: self.skip_pull_requests.unwrap_or(false),
        })
    }
}

/// Non-empty text of a raw value
fn text(value: &Option<RawValue>) -> Option<String> {
    value.as_ref().map(RawValue::as_text).filter(|s| !s.is_empty())
}

/// Leading integer of the input; unparsable or zero input yields the default
fn threshold(value: &Option<RawValue>, default: i64) -> i64 {
    value
        .as_ref()
        .and_then(|v| match v {
            RawValue::Int(n) => Some(*n),
            other => parse_leading_int(&other.as_text()),
        })
        .filter(|n| *n != 0)
        .unwrap_or(default)
}

fn color(value: &Option<RawValue>, default: &str) -> String {
    value
        .as_ref()
        .map(RawValue::as_color)
        .map(|c| c.trim().trim_start_matches('#').to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parse an optional sign followed by digits at the start of `input`,
/// ignoring leading whitespace and anything after the digits.
fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let sign_len = trimmed
        .chars()
        .next()
        .filter(|c| *c == '-' || *c == '+')
        .map_or(0, |_| 1);
    let digits_len = trimmed[sign_len..]
        .chars()
        .take_while(char::is_ascii_digit)
        .count();

    if digits_len == 0 {
        return None;
    }
    trimmed[..sign_len + digits_len].parse().ok()
}

/// Resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub github: GitHubSettings,
    pub labeler: LabelerConfig,
}

/// Where and how to reach the tracker
#[derive(Clone)]
pub struct GitHubSettings {
    pub repository: Repository,
    pub token: String,
    pub api_url: String,
}

impl fmt::Debug for GitHubSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubSettings")
            .field("repository", &self.repository)
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// An `owner/repo` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl std::str::FromStr for Repository {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(anyhow!(
                "Invalid repository '{}'. Expected the form owner/repo",
                s
            )),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Inclusive upper bounds, in days, of the short and medium tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    pub short: i64,
    pub medium: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierColors {
    pub short: String,
    pub medium: String,
    pub long: String,
}

/// Immutable labeling configuration for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelerConfig {
    pub thresholds: Thresholds,
    pub colors: TierColors,
    /// Only touch labels when a label was computed; classification always
    /// computes one, so this never skips an issue
    pub thresholded_update: bool,
    pub filter_label: Option<String>,
    pub issue_state: IssueState,
    pub dry_run: bool,
    pub skip_pull_requests: bool,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds {
                short: DEFAULT_SHORT_THRESHOLD,
                medium: DEFAULT_MEDIUM_THRESHOLD,
            },
            colors: TierColors {
                short: DEFAULT_SHORT_COLOR.to_string(),
                medium: DEFAULT_MEDIUM_COLOR.to_string(),
                long: DEFAULT_LONG_COLOR.to_string(),
            },
            thresholded_update: false,
            filter_label: None,
            issue_state: IssueState::All,
            dry_run: false,
            skip_pull_requests: false,
        }
    }
}

impl LabelerConfig {
    pub fn issue_filter(&self) -> IssueFilter {
        IssueFilter::new(self.issue_state, self.filter_label.clone())
    }
}

fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_xdg_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_local_config_path() {
        push_unique(&mut paths, path);
    }

    paths
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "duration-labeler").map(|d| d.config_dir().join("config.toml"))
}

fn get_xdg_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join("duration-labeler").join("config.toml"));
    }

    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("duration-labeler")
            .join("config.toml")
    })
}

fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join("duration-labeler.toml"))
}
