//! Command-line interface

pub mod output;
pub mod prompt;

use crate::error::UpgradeError;
use crate::execution::SchedulingStrategy;
use clap::Parser;
use std::ffi::OsString;
use std::str::FromStr;
use tracing::Level;

/// Charmed OpenStack upgrader
#[derive(Debug, Parser, Clone)]
#[command(name = "cou")]
#[command(version)]
#[command(about = "Upgrade a Charmed OpenStack cloud one release at a time", long_about = None)]
pub struct Cli {
    /// Do not run the upgrade, just print out the steps
    #[arg(long)]
    pub dry_run: bool,

    /// Set the logging level (DEBUG, INFO, WARNING, ERROR, CRITICAL)
    #[arg(long, default_value = "INFO")]
    pub log_level: String,

    /// Prompt before each step
    #[arg(
        long,
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = clap::ArgAction::Set
    )]
    pub interactive: bool,

    /// Path to a YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Juju model to upgrade (overrides the configuration file)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Scheduling strategy for steps marked parallel
    #[arg(long, value_enum, default_value_t = SchedulingStrategyArg::Sequential)]
    pub strategy: SchedulingStrategyArg,
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

/// Scheduling strategy argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SchedulingStrategyArg {
    Sequential,
    Parallel,
}

impl From<SchedulingStrategyArg> for SchedulingStrategy {
    fn from(arg: SchedulingStrategyArg) -> Self {
        match arg {
            SchedulingStrategyArg::Sequential => SchedulingStrategy::Sequential,
            SchedulingStrategyArg::Parallel => SchedulingStrategy::Parallel,
        }
    }
}

/// Log levels accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl FromStr for LogLevel {
    type Err = UpgradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            _ => Err(UpgradeError::Configuration(format!(
                "Invalid log level: \"{}\"",
                s
            ))),
        }
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warning => Level::WARN,
            LogLevel::Error | LogLevel::Critical => Level::ERROR,
        }
    }
}
