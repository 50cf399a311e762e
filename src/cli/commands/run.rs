//! Run command implementation

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::error::CliError;
use crate::cli::output::{OutputFormat, format_report};
use crate::config::SuiteConfig;
use crate::runner::{RunReport, Runner, ScenarioFilter};

/// Env file picked up when `--env-file` is not given
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Arguments for the `run` command
pub struct RunArgs {
    pub env_file: Option<PathBuf>,
    pub filter: ScenarioFilter,
    pub format: OutputFormat,
}

/// Load configuration for a run
///
/// An explicit env file must exist. Without one, `.env` in the working
/// directory is used when present, otherwise the process environment.
pub fn load_config(env_file: Option<&Path>) -> Result<SuiteConfig, CliError> {
    let config = match env_file {
        Some(path) => SuiteConfig::from_env_file(path)?,
        None if Path::new(DEFAULT_ENV_FILE).is_file() => SuiteConfig::from_env_file(DEFAULT_ENV_FILE)?,
        None => {
            debug!("No {} found, reading configuration from the environment", DEFAULT_ENV_FILE);
            SuiteConfig::from_env()?
        }
    };
    Ok(config)
}

/// Handle the `run` command
///
/// Prints the report and fails with [`CliError::ScenariosFailed`] when any
/// scenario failed.
pub async fn handle_run(args: &RunArgs) -> Result<RunReport, CliError> {
    let config = load_config(args.env_file.as_deref())?;
    let runner = Runner::http(config);
    let report = runner.run_catalog(&args.filter).await;

    print!("{}", format_report(&report, args.format)?);
    if needs_stderr_summary(&report, args.format) {
        report.print_summary();
    }

    if report.is_success() {
        Ok(report)
    } else {
        Err(CliError::ScenariosFailed {
            failed: report.failed,
            total: report.total,
        })
    }
}

/// Text reports already list failures on stdout; JSON runs repeat them on stderr
fn needs_stderr_summary(report: &RunReport, format: OutputFormat) -> bool {
    format == OutputFormat::Json && !report.is_success()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::runner::ScenarioResult;
    use crate::scenarios::ScenarioGroup;
    use std::io::Write;

    fn report(failed: usize) -> RunReport {
        let results = (0..failed)
            .map(|i| ScenarioResult {
                name: format!("scenario {}", i),
                group: ScenarioGroup::Read,
                passed: false,
                duration_ms: 5,
                message: Some("expected HTTP 404, got 200".to_string()),
            })
            .collect();
        RunReport {
            run_id: "run".to_string(),
            base_url: "http://localhost:3000".to_string(),
            total: failed,
            passed: 0,
            failed,
            duration_ms: 5,
            results,
        }
    }

    #[test]
    fn test_failures_print_once_per_format() {
        assert!(!needs_stderr_summary(&report(1), OutputFormat::Text));
        assert!(needs_stderr_summary(&report(1), OutputFormat::Json));
        assert!(!needs_stderr_summary(&report(0), OutputFormat::Json));
    }

    #[test]
    fn test_load_config_from_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "BASE_URL=http://127.0.0.1:3000/").unwrap();
        writeln!(file, "AUTH_USERNAME=admin").unwrap();
        writeln!(file, "AUTH_PASSWORD=admin123").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn test_load_config_missing_explicit_file() {
        let err = load_config(Some(Path::new("/no/such/dir/.env"))).unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::Io { .. })));
        assert!(err.user_message().contains("--env-file"));
    }
}
