//! Command-line interface entry point for `Greenmove`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use commands::report::ReportOptions;
use greenmove_analytics::config::Config;
use logger::{close_file_logging, enable_debug, failure, info, init_file_logging, set_level, set_quiet, Level};

fn main() {
    let mut args = Cli::parse();

    // Stored configuration is what `config` edits; CLI overrides only reach the runtime copy
    let mut stored = Config::load();
    let defaults = Config::from_defaults();
    let config = args.runtime_config(&stored);

    // Effective runtime log level: CLI flag overrides config; fallback warn
    let mut level = args
        .log_level
        .map(std::convert::Into::into)
        .or_else(|| Level::parse(&config.logging.level))
        .unwrap_or(Level::Warn);
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }
    set_level(level);
    set_quiet(config.logging.quiet);

    // File logging: CLI flag wins, otherwise config logging.file if set
    let config_log_path: Option<std::path::PathBuf> = if config.logging.file.is_empty() {
        None
    } else {
        Some(std::path::PathBuf::from(&config.logging.file))
    };
    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            info!("File logging initialized at: {display_path}");
        } else {
            failure!("Failed to initialize file logging at: {display_path}");
        }
    }

    let code = if let Some(Command::Config { subcommand }) = args.command.take() {
        commands::config::run(subcommand, &mut stored, &defaults)
    } else if let Some(scope) = args.scope() {
        let options = ReportOptions {
            format: args.format,
            output: args.output.clone(),
        };
        match commands::report::run(&scope, &options, &config) {
            Ok(code) => code,
            Err(e) => {
                failure!("{e}");
                e.exit_code()
            }
        }
    } else {
        // clap enforces a scope when no subcommand is given
        2
    };

    close_file_logging();
    std::process::exit(code);
}
