//! Station and line name types.

use std::fmt;

use serde::Serialize;

/// Longest accepted name, in characters.
const MAX_NAME_CHARS: usize = 128;

/// Error returned when parsing an invalid station or line name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid name {input:?}: {reason}")]
pub struct InvalidName {
    input: String,
    reason: &'static str,
}

impl InvalidName {
    /// Why the name was rejected.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

fn validate(s: &str) -> Result<&str, InvalidName> {
    let trimmed = s.trim();
    let reject = |reason| InvalidName {
        input: s.to_string(),
        reason,
    };

    if trimmed.is_empty() {
        return Err(reject("must not be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(reject("must be at most 128 characters"));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(reject("must not contain control characters"));
    }

    Ok(trimmed)
}

/// The name of a physical station, unique across the network.
///
/// A station served by several lines has one `StationName` but one
/// network node per line.
///
/// # Examples
///
/// ```
/// use metro_server::domain::StationName;
///
/// let name = StationName::parse("  Central ").unwrap();
/// assert_eq!(name.as_str(), "Central");
///
/// assert!(StationName::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct StationName(String);

impl StationName {
    /// Parse a station name, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidName> {
        validate(s).map(|name| Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationName({})", self.0)
    }
}

impl fmt::Display for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The name of a transit line.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LineName(String);

impl LineName {
    /// Parse a line name, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidName> {
        validate(s).map(|name| Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineName({})", self.0)
    }
}

impl fmt::Display for LineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Parsing is idempotent: re-parsing the stored name yields the same value
        #[test]
        fn reparse_is_identity(s in "[A-Za-z0-9 ]{1,40}") {
            if let Ok(name) = StationName::parse(&s) {
                let again = StationName::parse(name.as_str()).unwrap();
                prop_assert_eq!(again, name);
            }
        }

        /// Surrounding whitespace never changes the parsed name
        #[test]
        fn padding_is_ignored(s in "[A-Za-z]{1,20}", left in " {0,4}", right in " {0,4}") {
            let padded = format!("{left}{s}{right}");
            prop_assert_eq!(StationName::parse(&padded).unwrap(), StationName::parse(&s).unwrap());
        }

        /// Whitespace-only input is always rejected
        #[test]
        fn blank_rejected(s in "[ \t]{0,10}") {
            prop_assert!(LineName::parse(&s).is_err());
        }
    }
}
