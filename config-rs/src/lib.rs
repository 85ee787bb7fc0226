//! config-rs/lib.rs
//! Shared configuration utilities for consistent service configuration
//! Provides standardized functions for port/address management and typed
//! environment lookups

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

/// Errors raised while resolving configuration from the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    MissingVar(String),

    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: String, value: String },
}

/// Load a `.env` file from the working directory if one exists
pub fn load_dotenv() {
    match dotenv::dotenv() {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(err) => log::debug!("No .env file loaded: {}", err),
    }
}

/// Normalize a service name into its environment variable prefix
///
/// "prompt-refiner" becomes "PROMPT_REFINER".
pub fn env_prefix(service_name: &str) -> String {
    service_name.to_uppercase().replace('-', "_")
}

/// Get service port from environment variables with proper fallback
///
/// # Arguments
/// * `service_name` - The name of the service (e.g., "PROMPT_REFINER")
/// * `default_port` - The default port to use if not specified in environment
///
/// # Returns
/// The port number to use for the service
pub fn get_service_port(service_name: &str, default_port: u16) -> u16 {
    let var_name = format!("{}_SERVICE_PORT", env_prefix(service_name));
    get_env_or(&var_name, default_port)
}

/// Create a SocketAddr for binding a service
///
/// `<NAME>_SERVICE_ADDR` wins when it holds a valid `host:port` or
/// `http://host:port`; otherwise the service listens on all interfaces at the
/// port from [`get_service_port`].
pub fn get_bind_address(service_name: &str, default_port: u16) -> SocketAddr {
    let var_name = format!("{}_SERVICE_ADDR", env_prefix(service_name));

    if let Ok(addr_str) = env::var(&var_name) {
        let trimmed = addr_str
            .strip_prefix("http://")
            .or_else(|| addr_str.strip_prefix("https://"))
            .unwrap_or(&addr_str);

        match trimmed.parse::<SocketAddr>() {
            Ok(addr) => return addr,
            Err(_) => log::warn!("Invalid address format in {}, using default", var_name),
        }
    }

    let port = get_service_port(service_name, default_port);
    SocketAddr::from(([0, 0, 0, 0], port))
}

/// Read and parse an environment variable, falling back to `default` when it
/// is unset or cannot be parsed
pub fn get_env_or<T>(var_name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(var_name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Invalid value in {}, using default {}", var_name, default);
                default
            }
        },
        Err(_) => default,
    }
}

/// Read an optional environment variable
///
/// Unset or blank yields `Ok(None)`; a value that does not parse is an error.
pub fn get_optional_env<T: FromStr>(var_name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(var_name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                value: raw,
            }),
        _ => Ok(None),
    }
}

/// Read a required environment variable; empty counts as missing
pub fn require_env(var_name: &str) -> Result<String, ConfigError> {
    match env::var(var_name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(var_name.to_string())),
    }
}
