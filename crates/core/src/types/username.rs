//! Username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// The input string is empty.
    #[error("A username is required!")]
    Empty,
    /// The input is shorter or longer than allowed.
    #[error("Must be between {min} to {max} characters!")]
    Length {
        /// Minimum length.
        min: usize,
        /// Maximum length.
        max: usize,
    },
}

/// A public display name, shown next to reviews.
///
/// Between 5 and 15 characters after trimming.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Minimum length in characters.
    pub const MIN_LENGTH: usize = 5;
    /// Maximum length in characters (the `users.username` column width).
    pub const MAX_LENGTH: usize = 15;

    /// Parse a `Username` from user input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`UsernameError::Empty`] for blank input and
    /// [`UsernameError::Length`] outside 5-15 characters.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(UsernameError::Empty);
        }

        let len = s.chars().count();
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&len) {
            return Err(UsernameError::Length {
                min: Self::MIN_LENGTH,
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Wrap a value read back from the database without re-validating it.
    #[must_use]
    pub const fn from_trusted(s: String) -> Self {
        Self(s)
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_bounds() {
        assert!(Username::parse("abcde").is_ok());
        assert!(Username::parse("abcdefghijklmno").is_ok());
        assert!(matches!(
            Username::parse("abcd"),
            Err(UsernameError::Length { min: 5, max: 15 })
        ));
        assert!(matches!(
            Username::parse("abcdefghijklmnop"),
            Err(UsernameError::Length { .. })
        ));
    }

    #[test]
    fn test_blank_is_empty() {
        assert_eq!(Username::parse("  "), Err(UsernameError::Empty));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert!(Username::parse("łódźł").is_ok());
    }
}
