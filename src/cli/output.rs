//! Output formatting for CLI

use crate::cli::error::CliError;
use crate::runner::RunReport;
use crate::scenarios::Scenario;

/// Report format selected with `--format`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One line per scenario, then the totals
pub fn format_text_report(report: &RunReport) -> String {
    let mut output = String::new();

    for result in &report.results {
        let mark = if result.passed { "PASS" } else { "FAIL" };
        output.push_str(&format!(
            "{} [{}] {} ({}ms)\n",
            mark, result.group, result.name, result.duration_ms
        ));
        if let Some(message) = &result.message {
            for line in message.lines() {
                output.push_str(&format!("       {}\n", line));
            }
        }
    }

    output.push_str(&format!(
        "\n{} passed, {} failed, {} total ({})\n",
        report.passed,
        report.failed,
        report.total,
        report.duration_formatted()
    ));
    output
}

/// Pretty-printed JSON report
pub fn format_json_report(report: &RunReport) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render `report` in `format`
pub fn format_report(report: &RunReport, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(format_text_report(report)),
        OutputFormat::Json => format_json_report(report),
    }
}

/// Scenario names grouped by area
pub fn format_scenario_list(scenarios: &[Box<dyn Scenario>], format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            for scenario in scenarios {
                output.push_str(&format!("{:<9} {}\n", scenario.group().as_str(), scenario.name()));
            }
            output.push_str(&format!("\n{} scenario(s)\n", scenarios.len()));
            Ok(output)
        }
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = scenarios
                .iter()
                .map(|s| serde_json::json!({ "name": s.name(), "group": s.group() }))
                .collect();
            Ok(serde_json::to_string_pretty(&entries)?)
        }
    }
}
