//! Sequential scenario runner
//!
//! Scenarios run one after another. Each gets a fresh transport from the
//! runner's factory and a fresh [`ScenarioContext`], and its created books
//! are cleaned up whether it passed or not. A failing scenario never stops
//! the run.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::config::SuiteConfig;
use crate::scenarios::{Scenario, ScenarioContext, ScenarioGroup, catalog};
use crate::transport::{Transport, TransportError};

/// Builds the transport for one scenario
pub type TransportFactory = Arc<dyn Fn() -> Result<Arc<dyn Transport>, TransportError> + Send + Sync>;

/// Selects which scenarios to run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioFilter {
    /// Case-insensitive substring of the scenario name
    pub name: Option<String>,
    pub group: Option<ScenarioGroup>,
}

impl ScenarioFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, needle: impl Into<String>) -> Self {
        self.name = Some(needle.into());
        self
    }

    pub fn with_group(mut self, group: ScenarioGroup) -> Self {
        self.group = Some(group);
        self
    }

    pub fn matches(&self, scenario: &dyn Scenario) -> bool {
        let name_ok = self
            .name
            .as_ref()
            .is_none_or(|needle| scenario.name().to_lowercase().contains(&needle.to_lowercase()));
        let group_ok = self.group.is_none_or(|group| scenario.group() == group);
        name_ok && group_ok
    }
}

/// Outcome of one scenario
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScenarioResult {
    pub name: String,
    pub group: ScenarioGroup,
    pub passed: bool,
    pub duration_ms: u64,
    /// Failure report; `None` when the scenario passed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Report from a suite run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: String,
    pub base_url: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

impl RunReport {
    /// Check if every scenario passed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Results of the scenarios that failed
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// Get formatted duration
    pub fn duration_formatted(&self) -> String {
        let secs = self.duration_ms / 1000;
        let mins = secs / 60;
        let remaining_secs = secs % 60;

        if mins > 0 {
            format!("{}m {}s", mins, remaining_secs)
        } else if secs > 0 {
            format!("{}s", secs)
        } else {
            format!("{}ms", self.duration_ms)
        }
    }

    /// Print summary to stderr
    pub fn print_summary(&self) {
        eprintln!();
        eprintln!("Run {} against {}", self.run_id, self.base_url);
        eprintln!(
            "{} passed, {} failed, {} total in {}",
            self.passed,
            self.failed,
            self.total,
            self.duration_formatted()
        );

        for result in self.failures() {
            eprintln!("  - [{}] {}", result.group, result.name);
            if let Some(message) = &result.message {
                for line in message.lines() {
                    eprintln!("      {}", line);
                }
            }
        }
    }
}

/// Runs scenarios against one configured service
pub struct Runner {
    config: SuiteConfig,
    transport_factory: TransportFactory,
}

impl Runner {
    pub fn new(config: SuiteConfig, transport_factory: TransportFactory) -> Self {
        Self {
            config,
            transport_factory,
        }
    }

    /// Runner that opens a new HTTP transport for every scenario
    #[cfg(feature = "http-backend")]
    pub fn http(config: SuiteConfig) -> Self {
        let factory_config = config.clone();
        let factory: TransportFactory = Arc::new(move || -> Result<Arc<dyn Transport>, TransportError> {
            let transport = crate::transport::http::HttpTransport::from_config(&factory_config)?;
            Ok(Arc::new(transport) as Arc<dyn Transport>)
        });
        Self::new(config, factory)
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Run the catalog scenarios selected by `filter`
    pub async fn run_catalog(&self, filter: &ScenarioFilter) -> RunReport {
        let selected: Vec<Box<dyn Scenario>> = catalog()
            .into_iter()
            .filter(|s| filter.matches(s.as_ref()))
            .collect();
        self.run(&selected).await
    }

    /// Run `scenarios` in order
    pub async fn run(&self, scenarios: &[Box<dyn Scenario>]) -> RunReport {
        let run_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        info!(
            run_id = %run_id,
            base_url = %self.config.base_url,
            scenarios = scenarios.len(),
            "Starting suite run"
        );

        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            let span = info_span!("scenario", name = scenario.name(), group = %scenario.group());
            let result = self.run_one(scenario.as_ref()).instrument(span).await;
            results.push(result);
        }

        let passed = results.iter().filter(|r| r.passed).count();
        let report = RunReport {
            run_id,
            base_url: self.config.base_url.clone(),
            total: results.len(),
            passed,
            failed: results.len() - passed,
            duration_ms: start.elapsed().as_millis() as u64,
            results,
        };

        info!(
            run_id = %report.run_id,
            passed = report.passed,
            failed = report.failed,
            duration_ms = report.duration_ms,
            "Suite run completed"
        );
        report
    }

    async fn run_one(&self, scenario: &dyn Scenario) -> ScenarioResult {
        let start = Instant::now();
        info!("Starting scenario");

        let outcome = match (self.transport_factory)() {
            Ok(transport) => {
                let mut ctx = ScenarioContext::new(self.config.clone(), transport);
                let outcome = scenario.run(&mut ctx).await;
                ctx.cleanup().await;
                outcome.map_err(|e| e.to_string())
            }
            Err(e) => Err(format!("Could not open transport: {}", e)),
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        match outcome {
            Ok(()) => {
                info!(duration_ms, "Scenario passed");
                ScenarioResult {
                    name: scenario.name().to_string(),
                    group: scenario.group(),
                    passed: true,
                    duration_ms,
                    message: None,
                }
            }
            Err(message) => {
                error!(duration_ms, error = %message, "Scenario failed");
                ScenarioResult {
                    name: scenario.name().to_string(),
                    group: scenario.group(),
                    passed: false,
                    duration_ms,
                    message: Some(message),
                }
            }
        }
    }
}
