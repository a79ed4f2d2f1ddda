//! Configuration merging and precedence handling.
//!
//! This module implements hierarchical merging of configuration sources.
//! Levels describe one chain and are replaced as a whole; URL settings are
//! merged field by field.

use crate::config::loader::ConfigSource;
use crate::config::schema::{Config, UrlConfig};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use slugtree::config::{Config, ConfigMerger};
///
/// let low = Config { max_depth: Some(8), ..Default::default() };
/// let high = Config { max_depth: Some(16), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.max_depth, Some(16));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into final config.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();

        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }

        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// # Merging Rules
    ///
    /// - Simple fields: source overwrites if Some
    /// - Levels: atomic replacement
    /// - URL config: field-by-field merge
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.levels.is_some() {
            target.levels.clone_from(&source.levels);
        }

        if source.many_valued.is_some() {
            target.many_valued = source.many_valued;
        }

        if source.max_depth.is_some() {
            target.max_depth = source.max_depth;
        }

        if source.verify_scope.is_some() {
            target.verify_scope = source.verify_scope;
        }

        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if let Some(ref source_url) = source.url {
            target.url = Some(match &target.url {
                Some(target_url) => Self::merge_url(target_url, source_url),
                None => source_url.clone(),
            });
        }
    }

    fn merge_url(target: &UrlConfig, source: &UrlConfig) -> UrlConfig {
        UrlConfig {
            prefix: source.prefix.clone().or_else(|| target.prefix.clone()),
            trailing_slash: source.trailing_slash.or(target.trailing_slash),
        }
    }
}
