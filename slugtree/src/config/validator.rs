//! Configuration validation.
//!
//! This module validates configuration fields, ensuring that values are
//! well-formed and that the configured levels describe a consistent chain.

use crate::config::schema::{Config, LevelConfig, UrlConfig};
use crate::error::{Error, Result};
use crate::path::UrlFormat;
use std::collections::HashSet;

/// Validates configuration.
///
/// Validation is syntactic and cross-referential only; whether each level
/// can reach its parent is decided when the chain is built.
///
/// # Examples
///
/// ```
/// use slugtree::config::{Config, ConfigValidator};
///
/// let config = Config::default();
/// ConfigValidator::validate(&config).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref levels) = config.levels {
            Self::validate_levels(levels)?;
        }

        if let Some(ref url) = config.url {
            Self::validate_url(url)?;
        }

        if config.max_depth == Some(0) {
            return Err(Error::Validation {
                field: "max_depth".into(),
                message: "Depth must be greater than 0".into(),
            });
        }

        if config.maximum_lock_wait_seconds == Some(0) {
            return Err(Error::Validation {
                field: "maximum_lock_wait_seconds".into(),
                message: "Timeout must be greater than 0".into(),
            });
        }

        Ok(())
    }

    /// Validate identifiers (level names, handlers, field names).
    ///
    /// Identifiers are non-empty, at most 255 characters, and made of ASCII
    /// letters, digits, `_` and `-`.
    fn validate_identifier(field: &str, value: &str) -> Result<()> {
        let message = if value.is_empty() {
            "Cannot be empty"
        } else if value.len() > 255 {
            "Cannot exceed 255 characters"
        } else if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            "May only contain ASCII letters, digits, '_' and '-'"
        } else {
            return Ok(());
        };

        Err(Error::Validation {
            field: field.into(),
            message: format!("'{value}': {message}"),
        })
    }

    fn validate_levels(levels: &[LevelConfig]) -> Result<()> {
        if levels.is_empty() {
            return Err(Error::Validation {
                field: "levels".into(),
                message: "At least one level is required".into(),
            });
        }

        let names: HashSet<&str> = levels.iter().map(|l| l.name.as_str()).collect();
        if names.len() != levels.len() {
            let mut seen = HashSet::new();
            let duplicate = levels
                .iter()
                .find(|l| !seen.insert(l.name.as_str()))
                .map_or("", |l| l.name.as_str());
            return Err(Error::Validation {
                field: "levels".into(),
                message: format!("Duplicate level name '{duplicate}'"),
            });
        }

        for (index, level) in levels.iter().enumerate() {
            let field = |name: &str| format!("levels[{index}].{name}");

            Self::validate_identifier(&field("name"), &level.name)?;
            Self::validate_identifier(&field("handler"), &level.handler)?;

            let mut fields = HashSet::new();
            for (position, reference) in level.references.iter().enumerate() {
                let at = |name: &str| field(&format!("references[{position}].{name}"));
                Self::validate_identifier(&at("field"), &reference.field)?;
                if !fields.insert(reference.field.as_str()) {
                    return Err(Error::Validation {
                        field: at("field"),
                        message: format!("Duplicate reference field '{}'", reference.field),
                    });
                }
                if !names.contains(reference.target.as_str()) {
                    return Err(Error::Validation {
                        field: at("target"),
                        message: format!("Unknown node type '{}'", reference.target),
                    });
                }
            }

            if let Some(ref parent) = level.parent {
                Self::validate_parent(index, levels, parent)?;
            }
        }

        Ok(())
    }

    /// An explicit parent field must be declared and must point at the
    /// previous level.
    fn validate_parent(index: usize, levels: &[LevelConfig], parent: &str) -> Result<()> {
        let field = format!("levels[{index}].parent");
        let Some(previous) = index.checked_sub(1).map(|i| &levels[i]) else {
            return Err(Error::Validation {
                field,
                message: "The first level has no parent".into(),
            });
        };

        match levels[index].references.iter().find(|r| r.field == parent) {
            None => Err(Error::Validation {
                field,
                message: format!("'{parent}' is not a declared reference"),
            }),
            Some(reference) if reference.target != previous.name => Err(Error::Validation {
                field,
                message: format!(
                    "'{parent}' points at '{}', not the previous level '{}'",
                    reference.target, previous.name
                ),
            }),
            Some(_) => Ok(()),
        }
    }

    fn validate_url(url: &UrlConfig) -> Result<()> {
        if let Some(ref prefix) = url.prefix {
            UrlFormat::new(prefix)?;
        }
        Ok(())
    }
}
