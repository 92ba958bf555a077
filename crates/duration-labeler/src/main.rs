mod classify;
mod cli;
mod color;
mod config;
mod enumerate;
mod labeler;
mod output;
mod reconcile;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use cli::Cli;
use config::Config;
use github_backend::GitHubClient;
use labeler::{RunContext, RunSummary};
use output::{output_error, output_result};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let ansi = color::init(cli.color);
    init_logging(ansi);

    match run(&cli) {
        Ok(summary) => {
            output_result(&summary, cli.format);
            ExitCode::SUCCESS
        }
        Err(e) => {
            output_error(&e, cli.format);
            ExitCode::from(1)
        }
    }
}

/// Log to stderr so stdout only carries the run summary
fn init_logging(ansi: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(ansi)
        .init();
}

fn run(cli: &Cli) -> Result<RunSummary> {
    let mut config = Config::load(cli.config.clone())?;
    config.merge_with_cli(cli);
    let settings = config.resolve()?;

    let now = match cli.now.as_deref() {
        Some(raw) => parse_instant(raw)?,
        None => Utc::now(),
    };

    let github = &settings.github;
    let client = GitHubClient::with_base_url(
        &github.api_url,
        &github.repository.owner,
        &github.repository.name,
        &github.token,
    );

    let ctx = RunContext {
        repository: github.repository.clone(),
        now,
    };

    labeler::run(&client, &settings.labeler, &ctx)
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .with_context(|| format!("Invalid --now value '{}', expected an RFC 3339 timestamp", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_instants() {
        let instant = parse_instant("2024-01-05T02:00:00+02:00").unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-01-05T00:00:00+00:00");
    }

    #[test]
    fn rejects_other_formats() {
        let err = parse_instant("2024-01-05").unwrap_err();
        assert!(err.to_string().contains("Invalid --now value '2024-01-05'"));
    }
}
