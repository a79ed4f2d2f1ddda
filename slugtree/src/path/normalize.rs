//! Path text normalization.
//!
//! Request paths are slash-delimited segments with one optional leading and
//! one optional trailing `/`. Matching is case-sensitive and no other
//! rewriting (percent-decoding, dot segments) is applied.

use crate::error::{Error, Result};
use crate::node::{validate_slug, SEPARATOR};

/// Strip one leading and one trailing separator.
///
/// # Examples
///
/// ```
/// use slugtree::path::normalize::trim_separators;
///
/// assert_eq!(trim_separators("/jane/nature/"), "jane/nature");
/// assert_eq!(trim_separators("jane"), "jane");
/// assert_eq!(trim_separators("//jane"), "/jane");
/// assert_eq!(trim_separators("/"), "");
/// ```
#[must_use]
pub fn trim_separators(text: &str) -> &str {
    let text = text.strip_prefix(SEPARATOR).unwrap_or(text);
    text.strip_suffix(SEPARATOR).unwrap_or(text)
}

/// Split path text into its segments.
///
/// An empty path (or a lone `/`) yields no segments.
///
/// # Errors
///
/// Returns [`Error::InvalidSlug`] if a segment is empty or otherwise not a
/// valid slug.
///
/// # Examples
///
/// ```
/// use slugtree::path::normalize::split_segments;
///
/// assert_eq!(split_segments("/jane/nature/").unwrap(), vec!["jane", "nature"]);
/// assert!(split_segments("").unwrap().is_empty());
/// assert!(split_segments("jane//nature").is_err());
/// ```
pub fn split_segments(text: &str) -> Result<Vec<&str>> {
    let trimmed = trim_separators(text);
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    trimmed
        .split(SEPARATOR)
        .map(|segment| {
            validate_slug(segment).map_err(|err| match err {
                Error::InvalidSlug { reason, .. } => Error::InvalidSlug {
                    slug: text.to_string(),
                    reason: format!("segment '{segment}' {reason}"),
                },
                other => other,
            })?;
            Ok(segment)
        })
        .collect()
}

/// Whether `text` is a syntactically valid, non-empty path.
///
/// # Examples
///
/// ```
/// use slugtree::path::normalize::is_well_formed;
///
/// assert!(is_well_formed("jane/nature"));
/// assert!(!is_well_formed("/"));
/// assert!(!is_well_formed("a//b"));
/// ```
#[must_use]
pub fn is_well_formed(text: &str) -> bool {
    split_segments(text).is_ok_and(|segments| !segments.is_empty())
}
