//! Validated text types shared by the CMS crates.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("text is blank")]
    Empty,

    /// The input was not a "/"-rooted page address
    #[error("invalid slug '{0}': {1}")]
    InvalidSlug(String, &'static str),
}

/// Trimmed text with at least one character. Used for commit author fields and messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// # Errors
    ///
    /// [`TextError::Empty`] when nothing is left after trimming.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        match input.as_ref().trim() {
            "" => Err(TextError::Empty),
            text => Ok(Self(text.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NonEmptyText {
    type Error = TextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyText> for String {
    fn from(text: NonEmptyText) -> Self {
        text.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A page's public address, such as `/` or `/about/team`.
///
/// Page documents store their slug as free text, so this type is used on the *lookup* side:
/// requested addresses are normalised into a `Slug` and then compared against the stored value.
///
/// Rules:
/// - starts with `/`
/// - no whitespace, no empty segments (`//`), no trailing `/` except for the root itself
/// - no `.` or `..` segments
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// The root page address.
    pub const ROOT: &'static str = "/";

    /// Validates a "/"-rooted slug. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] for blank input and [`TextError::InvalidSlug`] when any of
    /// the rules above is broken.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if !trimmed.starts_with('/') {
            return Err(TextError::InvalidSlug(
                trimmed.to_owned(),
                "must start with '/'",
            ));
        }
        if trimmed == Self::ROOT {
            return Ok(Self::root());
        }
        if trimmed.ends_with('/') {
            return Err(TextError::InvalidSlug(
                trimmed.to_owned(),
                "must not end with '/'",
            ));
        }

        for segment in trimmed[1..].split('/') {
            Self::check_segment(trimmed, segment)?;
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Builds a slug from path segments, as received from a catch-all route.
    ///
    /// Empty segments are skipped; no segments at all yields the root slug.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, TextError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = String::new();
        for segment in segments {
            let segment = segment.as_ref().trim();
            if segment.is_empty() {
                continue;
            }
            out.push('/');
            out.push_str(segment);
        }

        if out.is_empty() {
            return Ok(Self::root());
        }

        Self::new(out)
    }

    /// The root slug, `/`.
    pub fn root() -> Self {
        Self(Self::ROOT.to_owned())
    }

    /// Returns true for `/`.
    pub fn is_root(&self) -> bool {
        self.0 == Self::ROOT
    }

    /// Returns the path segments (`/about/team` → `["about", "team"]`; root → `[]`).
    pub fn segments(&self) -> Vec<&str> {
        self.0.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn check_segment(whole: &str, segment: &str) -> Result<(), TextError> {
        if segment.is_empty() {
            return Err(TextError::InvalidSlug(
                whole.to_owned(),
                "must not contain empty segments",
            ));
        }
        if segment == "." || segment == ".." {
            return Err(TextError::InvalidSlug(
                whole.to_owned(),
                "must not contain '.' or '..' segments",
            ));
        }
        if segment.chars().any(char::is_whitespace) {
            return Err(TextError::InvalidSlug(
                whole.to_owned(),
                "must not contain whitespace",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Slug {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slug::new(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = TextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}
