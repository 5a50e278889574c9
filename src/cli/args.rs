//! CLI argument definitions for `Greenmove`

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use greenmove_analytics::config::{Config, ConfigOverrides};
use greenmove_analytics::core::report::OutputFormat;
use logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `host`, `port`, `reports_dir`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
}

/// What a report run produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Global, analysis, text and the most active users
    All,
    /// Global report only
    Global,
    /// Reports for the N most active users
    Users(usize),
    /// Report for one user
    User(String),
    /// Plain-text narrative only
    Text,
    /// Strategic analysis only
    Analyse,
    /// Console statistics, no file
    Stats,
}

#[derive(Parser, Debug)]
#[command(
    name = "greenmove",
    about = "Greenmove mobility and CO2 emission reports",
    version = env!("CARGO_PKG_VERSION"),
    subcommand_negates_reqs = true,
    group(
        ArgGroup::new("scope")
            .required(true)
            .args(["all", "global", "users", "user_id", "text", "analyse", "stats"])
    )
)]
pub struct Cli {
    // --- Scope (exactly one) ---
    /// Generate every report: global, analysis, text and the most active users
    #[arg(long)]
    pub all: bool,

    /// Generate the global report only
    #[arg(long)]
    pub global: bool,

    /// Generate reports for the N most active users
    #[arg(long, value_name = "N")]
    pub users: Option<usize>,

    /// Generate the report of one user
    #[arg(long = "user-id", value_name = "ID")]
    pub user_id: Option<String>,

    /// Generate the plain-text analysis only
    #[arg(long)]
    pub text: bool,

    /// Generate the illustrated strategic analysis only
    #[arg(long, visible_alias = "analysis")]
    pub analyse: bool,

    /// Print statistics to the console without writing any file
    #[arg(long)]
    pub stats: bool,

    // --- Output ---
    /// Output format: pdf, html or both
    #[arg(short = 'f', long, value_name = "FORMAT", default_value = "pdf")]
    pub format: OutputFormat,

    /// Output file (a directory when several users are reported)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress progress messages
    #[arg(short, long)]
    pub quiet: bool,

    /// Override config reports directory
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    // --- Connection ---
    /// PostgreSQL host
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Database name
    #[arg(long = "db", visible_alias = "database", value_name = "NAME")]
    pub db: Option<String>,

    /// Database user
    #[arg(long, value_name = "USER")]
    pub user: Option<String>,

    /// Database password
    #[arg(
        long,
        value_name = "PASSWORD",
        env = "GREENMOVE_DB_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Database port (default 5432)
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    // --- Logging ---
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Optional subcommand; without one a report scope flag is required.
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The requested report scope, if any
    pub fn scope(&self) -> Option<Scope> {
        if self.all {
            Some(Scope::All)
        } else if self.global {
            Some(Scope::Global)
        } else if let Some(n) = self.users {
            Some(Scope::Users(n))
        } else if let Some(user) = &self.user_id {
            Some(Scope::User(user.clone()))
        } else if self.text {
            Some(Scope::Text)
        } else if self.analyse {
            Some(Scope::Analyse)
        } else if self.stats {
            Some(Scope::Stats)
        } else {
            None
        }
    }

    /// Copy of `stored` with the command-line overrides applied
    ///
    /// The copy is for this run only; `stored` is what `config` subcommands save.
    #[must_use]
    pub fn runtime_config(&self, stored: &Config) -> Config {
        let mut config = stored.clone();
        config.apply_overrides(&self.to_config_overrides());
        config
    }

    /// Convert CLI flags into config overrides
    ///
    /// Transforms CLI arguments into a `ConfigOverrides` struct that can be applied to
    /// the loaded configuration. `--quiet` only overrides when set.
    ///
    /// # Examples
    /// ```ignore
    /// let args = Cli::parse();
    /// let overrides = args.to_config_overrides();
    /// config.apply_overrides(&overrides);
    /// ```
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.log_level.map(|lvl| lvl.to_string()),
            file: self
                .log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            quiet: self.quiet.then_some(true),
            db_host: self.host.clone(),
            db_name: self.db.clone(),
            db_user: self.user.clone(),
            db_password: self.password.clone(),
            db_port: self.port,
            reports_dir: self
                .reports_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}
