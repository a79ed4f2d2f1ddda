//! Core path types.
//!
//! [`SlugPath`] is a validated sequence of slugs. [`UrlFormat`] renders such
//! paths as URLs below a mount prefix and strips the prefix from incoming
//! URLs.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::node::{validate_slug, SEPARATOR};
use crate::path::normalize;

/// An ordered sequence of valid slugs.
///
/// # Examples
///
/// ```
/// use slugtree::SlugPath;
///
/// let path = SlugPath::parse("/jane/nature/mountains/").unwrap();
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.to_string(), "jane/nature/mountains");
///
/// let deeper = path.join("sunset").unwrap();
/// assert!(deeper.starts_with(&path));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SlugPath {
    segments: Vec<String>,
}

impl SlugPath {
    /// The empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse path text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text contains an empty or invalid segment.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self {
            segments: normalize::split_segments(text)?
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
    }

    pub(crate) fn from_validated(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Build a path from individual slugs.
    ///
    /// # Errors
    ///
    /// Returns an error if any slug is invalid.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path = Self::new();
        for segment in segments {
            path.push(segment)?;
        }
        Ok(path)
    }

    /// Append a slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is invalid.
    pub fn push(&mut self, segment: impl Into<String>) -> Result<()> {
        let segment = segment.into();
        validate_slug(&segment)?;
        self.segments.push(segment);
        Ok(())
    }

    /// A copy of this path with one more slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is invalid.
    pub fn join(&self, segment: impl Into<String>) -> Result<Self> {
        let mut joined = self.clone();
        joined.push(segment)?;
        Ok(joined)
    }

    /// The segments, first to last.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether `prefix` is a leading part of this path (or equal to it).
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for SlugPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for SlugPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for SlugPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// How paths are rendered as URLs.
///
/// The prefix always starts and ends with `/`. With the default format
/// (`/` prefix, trailing slash) the path `jane/nature` renders as
/// `/jane/nature/`.
///
/// # Examples
///
/// ```
/// use slugtree::{SlugPath, UrlFormat};
///
/// let format = UrlFormat::new("/gallery").unwrap();
/// let path = SlugPath::parse("jane/nature").unwrap();
/// assert_eq!(format.render(&path), "/gallery/jane/nature/");
/// assert_eq!(format.strip("/gallery/jane/nature/"), Some("jane/nature/"));
/// assert_eq!(format.strip("/elsewhere/jane"), None);
///
/// let bare = UrlFormat::default().with_trailing_slash(false);
/// assert_eq!(bare.render(&path), "/jane/nature");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlFormat {
    prefix: String,
    trailing_slash: bool,
}

impl Default for UrlFormat {
    fn default() -> Self {
        Self {
            prefix: SEPARATOR.to_string(),
            trailing_slash: true,
        }
    }
}

impl UrlFormat {
    /// Mount paths below `prefix`.
    ///
    /// A missing trailing `/` is added to the prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the prefix does not start with `/`
    /// or contains an empty segment.
    pub fn new(prefix: &str) -> Result<Self> {
        let invalid = |message: &str| Error::Validation {
            field: "url.prefix".into(),
            message: format!("'{prefix}' {message}"),
        };

        if !prefix.starts_with(SEPARATOR) {
            return Err(invalid("must start with '/'"));
        }
        normalize::split_segments(prefix).map_err(|_| invalid("contains an invalid segment"))?;

        let mut prefix = prefix.to_string();
        if !prefix.ends_with(SEPARATOR) {
            prefix.push(SEPARATOR);
        }

        Ok(Self {
            prefix,
            trailing_slash: true,
        })
    }

    /// Whether rendered URLs end with `/`.
    #[must_use]
    pub fn with_trailing_slash(mut self, trailing_slash: bool) -> Self {
        self.trailing_slash = trailing_slash;
        self
    }

    /// The mount prefix, with leading and trailing `/`.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether rendered URLs end with `/`.
    #[must_use]
    pub const fn trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Render `path` as a URL.
    #[must_use]
    pub fn render(&self, path: &SlugPath) -> String {
        let mut url = self.prefix.clone();
        if !path.is_empty() {
            url.push_str(&path.to_string());
            if self.trailing_slash {
                url.push(SEPARATOR);
            }
        }
        url
    }

    /// Strip the prefix from `url`, returning the path text below it.
    ///
    /// Returns `None` if the URL is not below the prefix.
    #[must_use]
    pub fn strip<'a>(&self, url: &'a str) -> Option<&'a str> {
        if let Some(rest) = url.strip_prefix(self.prefix.as_str()) {
            return Some(rest);
        }
        // "/gallery" addresses the mount point itself.
        (url == self.prefix.trim_end_matches(SEPARATOR)).then_some("")
    }
}
