//! Config command handler

use crate::args::ConfigSubcommand;
use greenmove_analytics::config::{Config, CONFIG_KEYS};
use logger::{failure, success};
use std::io::{self, Write};

/// Dispatch config subcommands and return the process exit code
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) -> i32 {
    match subcommand {
        None => handle_config_get(config, None),
        Some(ConfigSubcommand::Get { key }) => handle_config_get(config, key),
        Some(ConfigSubcommand::Set { key, value }) => handle_config_set(config, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => handle_config_unset(config, defaults, &key),
        Some(ConfigSubcommand::Reset) => handle_config_reset(),
    }
}

/// Handle the config get subcommand
pub fn handle_config_get(config: &Config, key: Option<String>) -> i32 {
    if let Some(k) = key {
        match config.get(&k) {
            Some(value) => {
                println!("{value}");
                0
            }
            None => {
                failure!("Unknown config key: '{k}' (known keys: {})", CONFIG_KEYS.join(", "));
                2
            }
        }
    } else {
        println!("\n=== Configuration ===\n");
        print!("{config}");
        0
    }
}

/// Handle the config set subcommand
pub fn handle_config_set(config: &mut Config, key: &str, value: &str) -> i32 {
    if let Err(e) = config.set(key, value) {
        failure!("{e}");
        return 2;
    }

    if let Err(e) = config.save() {
        failure!("Failed to save config: {e}");
        return 1;
    }

    if key == "password" {
        success!("Set {key}");
    } else {
        success!("Set {key} = {value}");
    }
    0
}

/// Handle the config unset subcommand
pub fn handle_config_unset(config: &mut Config, defaults: &Config, key: &str) -> i32 {
    if let Err(e) = config.unset(key, defaults) {
        failure!("{e}");
        return 2;
    }

    if let Err(e) = config.save() {
        failure!("Failed to save config: {e}");
        return 1;
    }

    success!("Reset {key} to default");
    0
}

/// Handle the config reset subcommand
pub fn handle_config_reset() -> i32 {
    if !Config::get_config_file_path().exists() {
        success!("Config is already at defaults");
        return 0;
    }

    print!("Are you sure you want to reset config to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();

    if response.trim().eq_ignore_ascii_case("y") || response.trim().eq_ignore_ascii_case("yes") {
        if let Err(e) = Config::reset() {
            failure!("Failed to remove config file: {e}");
            return 1;
        }
        success!("Config reset to defaults");
    } else {
        failure!("Reset cancelled");
    }
    0
}
