//! Banker CLI
//!
//! Loads an initial state (scenario file, built-in demo, or interactive
//! prompts) and then checks it, submits one request, or runs the request
//! menu.
//!
//! Usage:
//!   banker-cli --demo check
//!   banker-cli --scenario state.json request 1 1 0 2
//!   banker-cli                    # prompt for the state, then the menu

mod console;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use banker::{scenario, LedgerConfig, Limits, ProcessId, System, Units};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use console::Console;

#[derive(Parser)]
#[command(name = "banker-cli")]
#[command(about = "Banker's algorithm deadlock-avoidance simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON scenario with the initial state
    #[arg(short, long, global = true, conflicts_with = "demo")]
    scenario: Option<PathBuf>,

    /// Use the built-in five-process textbook state
    #[arg(long, global = true)]
    demo: bool,

    /// Upper bound on the number of processes [default: scenario's, else 10]
    #[arg(long, global = true)]
    max_processes: Option<usize>,

    /// Upper bound on the number of resource classes [default: scenario's, else 10]
    #[arg(long, global = true)]
    max_resources: Option<usize>,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the state and whether it is safe
    Check,

    /// Submit one request and print the outcome
    Request {
        /// Requesting process index
        pid: usize,

        /// Units requested of each resource class
        #[arg(required = true)]
        units: Vec<Units>,
    },

    /// Run the request menu (default)
    Interactive,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

impl Cli {
    /// Explicit limit flags override `base` field by field.
    fn limits_over(&self, base: Limits) -> Limits {
        Limits {
            max_processes: self.max_processes.unwrap_or(base.max_processes),
            max_resources: self.max_resources.unwrap_or(base.max_resources),
        }
    }
}

/// Resolve the initial state from the flags, prompting when none is given.
fn load_config<R: BufRead, W: Write>(
    cli: &Cli,
    console: &mut Console<R, W>,
) -> Result<LedgerConfig> {
    if let Some(path) = &cli.scenario {
        let config = scenario::load(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?;
        info!(path = %path.display(), "scenario loaded");
        let limits = cli.limits_over(config.limits);
        return Ok(config.with_limits(limits));
    }

    let limits = cli.limits_over(Limits::default());
    if cli.demo {
        return Ok(scenario::textbook().with_limits(limits));
    }
    console.read_config(limits)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());

    let config = load_config(&cli, &mut console)?;
    let mut system = System::initialize(config).context("invalid initial state")?;

    console.print_state(&system)?;
    let safe = console.print_safety(&system, "Initial state")?;

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Check => {
            if !safe {
                std::process::exit(2);
            }
        }
        Commands::Request { pid, units } => {
            let outcome = system.request(ProcessId(pid), &units);
            console.print_outcome(&system, &outcome)?;
            if !outcome.is_granted() {
                std::process::exit(1);
            }
        }
        Commands::Interactive => console.run_menu(&mut system)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use banker::ConfigError;
    use std::io::Cursor;

    fn load(args: &[&str]) -> Result<LedgerConfig> {
        let cli = Cli::try_parse_from(args)?;
        let mut console = Console::new(Cursor::new(""), Vec::new());
        load_config(&cli, &mut console)
    }

    /// Twelve single-class processes under a scenario limit of 20.
    fn wide_scenario() -> tempfile::NamedTempFile {
        let max: Vec<Vec<Units>> = vec![vec![1]; 12];
        let config = LedgerConfig::new(vec![12], max).with_limits(Limits {
            max_processes: 20,
            max_resources: 1,
        });

        let mut file = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer(&mut file, &config).unwrap();
        file
    }

    #[test]
    fn test_scenario_limits_are_kept() {
        let file = wide_scenario();
        let path = file.path().to_str().unwrap();

        let config = load(&["banker-cli", "--scenario", path, "check"]).unwrap();
        assert_eq!(config.limits.max_processes, 20);
        assert_eq!(config.limits.max_resources, 1);

        let system = System::initialize(config).unwrap();
        assert_eq!(system.ledger().processes(), 12);
    }

    #[test]
    fn test_limit_flag_overrides_scenario() {
        let file = wide_scenario();
        let path = file.path().to_str().unwrap();

        let config = load(&["banker-cli", "--scenario", path, "--max-processes", "8"]).unwrap();
        assert_eq!(config.limits.max_processes, 8);
        assert_eq!(config.limits.max_resources, 1);
        assert!(matches!(
            System::initialize(config),
            Err(ConfigError::TooManyProcesses { count: 12, limit: 8 })
        ));
    }

    #[test]
    fn test_demo_uses_default_limits() {
        let config = load(&["banker-cli", "--demo"]).unwrap();
        assert_eq!(config.limits, Limits::default());
    }

    #[test]
    fn test_limit_flags_after_subcommand() {
        let config = load(&["banker-cli", "--demo", "check", "--max-processes", "4"]).unwrap();
        assert_eq!(config.limits.max_processes, 4);
        assert!(System::initialize(config).is_err());

        assert!(Cli::try_parse_from(["banker-cli", "request", "1", "0", "--max-resources", "3"]).is_ok());
    }
}
