//! Configuration CLI command handlers

use crate::cli::commands::{ConfigCommand, ConfigKey};
use crate::core::config::Config;
use crate::error::Result;

/// Handle configuration commands
pub fn handle_config(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Set { key, value } => handle_set(key, value),
        ConfigCommand::Get { key } => handle_get(key),
        ConfigCommand::Remove { key } => handle_remove(key),
        ConfigCommand::Path => {
            println!("{}", Config::config_path()?.display());
            Ok(())
        }
    }
}

/// Handle setting a configuration value
fn handle_set(key: ConfigKey, value: String) -> Result<()> {
    let mut config = Config::load()?;
    match key {
        ConfigKey::Endpoint => {
            config.set_endpoint(&value)?;
            config.save()?;
            println!("Endpoint set to: {}", config.endpoint);
        }
        ConfigKey::Timeout => {
            config.set_timeout(&value)?;
            config.save()?;
            println!("Request timeout set to: {}s", config.request_timeout_secs);
        }
    }
    Ok(())
}

/// Handle getting a configuration value
fn handle_get(key: ConfigKey) -> Result<()> {
    let config = Config::load()?;
    match key {
        ConfigKey::Endpoint => println!("Endpoint: {}", config.endpoint),
        ConfigKey::Timeout => println!("Request timeout: {}s", config.request_timeout_secs),
    }
    Ok(())
}

/// Handle removing a configuration value
fn handle_remove(key: ConfigKey) -> Result<()> {
    let mut config = Config::load()?;
    let defaults = Config::default();
    match key {
        ConfigKey::Endpoint => {
            config.endpoint = defaults.endpoint;
            config.save()?;
            println!("Endpoint reset to default: {}", config.endpoint);
        }
        ConfigKey::Timeout => {
            config.request_timeout_secs = defaults.request_timeout_secs;
            config.save()?;
            println!(
                "Request timeout reset to default: {}s",
                config.request_timeout_secs
            );
        }
    }
    Ok(())
}
