//! book-library-suite binary

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt};

use book_library_suite::ScenarioFilter;
use book_library_suite::cli::CliError;
use book_library_suite::cli::commands::list::handle_list;
use book_library_suite::cli::commands::run::{RunArgs, handle_run};
use book_library_suite::cli::output::OutputFormat;
use book_library_suite::scenarios::ScenarioGroup;

#[derive(Parser)]
#[command(
    name = "book-library-suite",
    version,
    about = "Contract-validated end-to-end checks for the Book Library API"
)]
struct Cli {
    /// Log every request and response status
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run scenarios against the configured server
    Run {
        /// Env file with BASE_URL, AUTH_USERNAME and AUTH_PASSWORD (default: ./.env)
        #[arg(long)]
        env_file: Option<PathBuf>,

        /// Only run scenarios whose name contains this text
        #[arg(long)]
        filter: Option<String>,

        /// Only run scenarios in this group
        #[arg(long, value_enum)]
        group: Option<GroupArg>,

        /// Report format
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
    },
    /// List the available scenarios
    List {
        /// Only list scenarios in this group
        #[arg(long, value_enum)]
        group: Option<GroupArg>,

        /// Output format
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum GroupArg {
    Auth,
    Create,
    Read,
    Update,
    Delete,
    Security,
    Routing,
}

impl From<GroupArg> for ScenarioGroup {
    fn from(arg: GroupArg) -> Self {
        match arg {
            GroupArg::Auth => ScenarioGroup::Auth,
            GroupArg::Create => ScenarioGroup::Create,
            GroupArg::Read => ScenarioGroup::Read,
            GroupArg::Update => ScenarioGroup::Update,
            GroupArg::Delete => ScenarioGroup::Delete,
            GroupArg::Security => ScenarioGroup::Security,
            GroupArg::Routing => ScenarioGroup::Routing,
        }
    }
}

fn build_filter(name: Option<String>, group: Option<GroupArg>) -> ScenarioFilter {
    let mut filter = ScenarioFilter::all();
    if let Some(name) = name {
        filter = filter.with_name(name);
    }
    if let Some(group) = group {
        filter = filter.with_group(group.into());
    }
    filter
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            env_file,
            filter,
            group,
            format,
        } => {
            let args = RunArgs {
                env_file,
                filter: build_filter(filter, group),
                format: format.into(),
            };
            handle_run(&args).await?;
        }
        Commands::List { group, format } => {
            handle_list(&build_filter(None, group), format.into())?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CliError>() {
                Some(cli_err) => eprintln!("Error: {}", cli_err.user_message()),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}
