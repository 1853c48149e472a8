//! CLI entry and dispatch.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use resolver_core::ResolverConfig;
use resolver_core::config::paths;
use resolver_tui::DemoOptions;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "resolver")]
#[command(version)]
#[command(about = "Resolve deferred values with a debounced loading state")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file to use instead of $RESOLVER_HOME/config.toml
    #[arg(long, global = true, value_name = "PATH", env = "RESOLVER_CONFIG")]
    config: Option<PathBuf>,
}

/// Timing overrides shared by `demo` and `trace`.
#[derive(clap::Args, Debug, Clone, Default)]
struct TimingArgs {
    /// Delay before the loading indicator shows (ms; zero or negative: immediately)
    #[arg(long, value_name = "MS", allow_negative_numbers = true)]
    delay: Option<i64>,

    /// Simulated latency of the fake computation (ms)
    #[arg(long, value_name = "MS")]
    latency: Option<u64>,
}

impl TimingArgs {
    /// Config values with command-line flags applied on top.
    fn options(&self, config: &ResolverConfig) -> DemoOptions {
        let mut options = DemoOptions::from(config);
        if let Some(delay) = self.delay {
            options.delay = Some(delay);
        }
        if let Some(latency) = self.latency {
            options.latency = Duration::from_millis(latency);
        }
        options
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the interactive terminal demo
    Demo {
        #[command(flatten)]
        timing: TimingArgs,
    },
    /// Print every state transition of a headless run
    Trace {
        #[command(flatten)]
        timing: TimingArgs,

        /// Make the computation fail instead of succeed
        #[arg(long)]
        fail: bool,

        /// Supply a second computation after this many ms
        #[arg(long, value_name = "MS")]
        supersede_after: Option<u64>,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Print the effective configuration as TOML
    Show,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to a file while the alternate screen is up.
    let _guard = match &cli.command {
        Commands::Demo { .. } => Some(logging::init_file(&paths::resolver_home()?.join("logs"))?),
        _ => {
            logging::init_stderr()?;
            None
        }
    };

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

fn config_path(cli_path: Option<PathBuf>) -> Result<PathBuf> {
    match cli_path {
        Some(path) => Ok(path),
        None => paths::config_path(),
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, config } = cli;
    let config_path = config_path(config)?;

    match command {
        Commands::Demo { timing } => {
            let config = ResolverConfig::load_from(&config_path).context("load config")?;
            commands::demo::run(timing.options(&config))
        }
        Commands::Trace {
            timing,
            fail,
            supersede_after,
        } => {
            let config = ResolverConfig::load_from(&config_path).context("load config")?;
            commands::trace::run(commands::trace::TraceOptions {
                timing: timing.options(&config),
                fail,
                supersede_after: supersede_after.map(Duration::from_millis),
            })
            .await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path(&config_path);
                Ok(())
            }
            ConfigCommands::Show => commands::config::show(&config_path),
        },
    }
}
