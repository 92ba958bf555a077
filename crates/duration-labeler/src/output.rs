use crate::cli::OutputFormat;
use crate::labeler::RunSummary;
use crate::reconcile::{IssueOutcome, LabelDefinitionAction};
use colored::{ColoredString, Colorize};
use serde::Serialize;

pub fn output_result<T: Serialize + Displayable>(result: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            println!("{}", result.display());
        }
    }
}

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
}

pub fn output_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: "error".to_string(),
                message: format!("{:#}", err),
            };
            serde_json::to_string_pretty(&json_err).unwrap_or_else(|_| {
                format!(r#"{{"error": true, "message": "{}"}}"#, err)
            })
        }
        OutputFormat::Text => format!("{}: {:#}", "Error".red().bold(), err),
    };
    eprintln!("{}", message);
}

pub trait Displayable {
    fn display(&self) -> String;
}

impl Displayable for RunSummary {
    fn display(&self) -> String {
        let (verb, count) = if self.dry_run {
            ("Would label", self.outcomes.len())
        } else {
            ("Labeled", self.issues_labeled)
        };
        let mut output = format!(
            "{} {} of {} issues in {}",
            verb,
            count.to_string().bold(),
            self.issues_found,
            self.repository.to_string().cyan().bold()
        );

        if self.pull_requests_skipped > 0 {
            output.push_str(&format!(
                " ({} pull requests skipped)",
                self.pull_requests_skipped
            ));
        }

        output.push_str(&format!(
            "\n  {}: {}",
            "Evaluated at".dimmed(),
            self.evaluated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().dimmed()
        ));

        for outcome in &self.outcomes {
            output.push_str(&format!("\n  {}", outcome.display()));
        }

        if self.warnings > 0 {
            output.push_str(&format!(
                "\n{}",
                format!("{} warning(s), see log output", self.warnings).yellow()
            ));
        }

        output
    }
}

impl Displayable for IssueOutcome {
    fn display(&self) -> String {
        let mut line = format!(
            "{} {}",
            format!("#{}", self.number).cyan(),
            swatch(&self.label, &self.color)
        );

        if !self.removed.is_empty() {
            line.push_str(&format!(
                " {} {}",
                "replaced".dimmed(),
                self.removed.join(", ").dimmed()
            ));
        }

        if self.definition == LabelDefinitionAction::Failed || !self.warnings.is_empty() {
            line.push_str(&format!(" {}", "(incomplete)".yellow()));
        }

        line
    }
}

/// Render a label name in its own color when the hex value is valid
fn swatch(label: &str, color: &str) -> ColoredString {
    match parse_hex_color(color) {
        Some((r, g, b)) => label.truecolor(r, g, b).bold(),
        None => label.bold(),
    }
}

fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    if color.len() != 6 || !color.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&color[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
