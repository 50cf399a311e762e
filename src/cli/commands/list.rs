//! List command implementation

use crate::cli::error::CliError;
use crate::cli::output::{OutputFormat, format_scenario_list};
use crate::runner::ScenarioFilter;
use crate::scenarios::{Scenario, catalog};

/// Handle the `list` command
pub fn handle_list(filter: &ScenarioFilter, format: OutputFormat) -> Result<(), CliError> {
    let scenarios: Vec<Box<dyn Scenario>> = catalog()
        .into_iter()
        .filter(|s| filter.matches(s.as_ref()))
        .collect();

    print!("{}", format_scenario_list(&scenarios, format)?);
    Ok(())
}
