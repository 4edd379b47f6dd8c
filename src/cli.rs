/// CLI argument parsing

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::utils::AppConfig;

// Build timestamp injected at compile time
pub const VERSION_WITH_BUILD: &str = concat!(env!("CARGO_PKG_VERSION"), " (built: ", env!("BUILD_TIMESTAMP"), ")");

#[derive(Parser, Debug)]
#[command(name = "pulsetop")]
#[command(author, version = VERSION_WITH_BUILD, about = "Terminal monitor for processes, containers and host metrics", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Display refresh rate, e.g. "500ms" or "2s"
    #[arg(short, long, global = true, value_parser = humantime::parse_duration)]
    pub refresh: Option<Duration>,

    /// Cap on concurrent per-subject fetches (unbounded by default)
    #[arg(long, global = true)]
    pub max_concurrency: Option<usize>,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl GlobalArgs {
    /// Command line values take precedence over the config file
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(refresh) = self.refresh {
            config.refresh_ms = refresh.as_millis().min(u64::MAX as u128) as u64;
        }
        if self.max_concurrency.is_some() {
            config.max_concurrency = self.max_concurrency;
        }
        if self.log_file.is_some() {
            config.log_file = self.log_file.clone();
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive process table (default)
    Proc,

    /// Live dashboard of Docker containers
    Container {
        /// Include stopped containers
        #[arg(short, long)]
        all: bool,
    },

    /// Host-wide CPU, memory, network and disk metrics
    System {
        /// Show per-core CPU usage and frequency instead
        #[arg(long)]
        cpuinfo: bool,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the config file location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["pulsetop"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.global.refresh.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pulsetop", "container", "--all", "--refresh", "250ms", "--max-concurrency", "8"])
            .unwrap();
        assert_eq!(cli.command, Some(Commands::Container { all: true }));
        assert_eq!(cli.global.refresh, Some(Duration::from_millis(250)));

        let mut config = AppConfig::default();
        cli.global.apply(&mut config);
        assert_eq!(config.refresh_ms, 250);
        assert_eq!(config.max_concurrency, Some(8));
    }

    #[test]
    fn test_bad_duration_rejected() {
        assert!(Cli::try_parse_from(["pulsetop", "--refresh", "soon"]).is_err());
    }

    #[test]
    fn test_system_subcommand() {
        let cli = Cli::try_parse_from(["pulsetop", "system", "--cpuinfo"]).unwrap();
        assert_eq!(cli.command, Some(Commands::System { cpuinfo: true }));

        let cli = Cli::try_parse_from(["pulsetop", "system", "-r", "2s"]).unwrap();
        assert_eq!(cli.command, Some(Commands::System { cpuinfo: false }));
        assert_eq!(cli.global.refresh, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::try_parse_from(["pulsetop", "config", "init", "--force"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Config { command: ConfigCommands::Init { force: true } }));
    }
}
