//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `SLUGTREE_*` environment variables that
//! override configuration file values.

use crate::chain::ManyValuedPolicy;
use crate::config::schema::Config;
use crate::error::{Error, Result};
use std::env;
use std::str::FromStr;

/// Overrides [`Config::many_valued`].
pub const MANY_VALUED_ENV: &str = "SLUGTREE_MANY_VALUED";
/// Overrides [`Config::max_depth`].
pub const MAX_DEPTH_ENV: &str = "SLUGTREE_MAX_DEPTH";
/// Overrides [`crate::config::UrlConfig::prefix`].
pub const URL_PREFIX_ENV: &str = "SLUGTREE_URL_PREFIX";
/// Overrides [`crate::config::UrlConfig::trailing_slash`].
pub const TRAILING_SLASH_ENV: &str = "SLUGTREE_TRAILING_SLASH";
/// Overrides [`Config::verify_scope`].
pub const VERIFY_SCOPE_ENV: &str = "SLUGTREE_VERIFY_SCOPE";
/// Overrides [`Config::maximum_lock_wait_seconds`].
pub const LOCK_WAIT_ENV: &str = "SLUGTREE_MAXIMUM_LOCK_WAIT_SECONDS";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use slugtree::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// Reads all `SLUGTREE_*` environment variables and applies them to the
    /// configuration with higher precedence than file-based configs.
    /// Levels cannot be set from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable value is invalid
    /// (e.g., non-numeric depth, invalid boolean).
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(val) = env::var(MANY_VALUED_ENV) {
            let policy = ManyValuedPolicy::parse(&val).map_err(|message| Error::Validation {
                field: MANY_VALUED_ENV.into(),
                message,
            })?;
            config.many_valued = Some(policy);
        }

        if let Ok(val) = env::var(MAX_DEPTH_ENV) {
            config.max_depth = Some(Self::parse_number(MAX_DEPTH_ENV, &val)?);
        }

        if let Ok(val) = env::var(VERIFY_SCOPE_ENV) {
            config.verify_scope = Some(Self::parse_bool(VERIFY_SCOPE_ENV, &val)?);
        }

        if let Ok(val) = env::var(LOCK_WAIT_ENV) {
            config.maximum_lock_wait_seconds = Some(Self::parse_number(LOCK_WAIT_ENV, &val)?);
        }

        Self::apply_url_overrides(config)
    }

    /// Apply URL overrides, keeping file-provided fields that are not set.
    fn apply_url_overrides(config: &mut Config) -> Result<()> {
        let mut url = config.url.clone().unwrap_or_default();
        let mut modified = false;

        if let Ok(prefix) = env::var(URL_PREFIX_ENV) {
            url.prefix = Some(prefix);
            modified = true;
        }

        if let Ok(val) = env::var(TRAILING_SLASH_ENV) {
            url.trailing_slash = Some(Self::parse_bool(TRAILING_SLASH_ENV, &val)?);
            modified = true;
        }

        if modified {
            config.url = Some(url);
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }

    fn parse_number<T: FromStr>(field: &str, s: &str) -> Result<T> {
        s.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("Invalid number: '{s}'"),
        })
    }
}
