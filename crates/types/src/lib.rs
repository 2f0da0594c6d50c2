//! Validated text primitives shared by the Carepoint crates.
//!
//! These types carry their invariant in the type system so that callers further in (letterhead
//! rendering, chat transcripts) never have to re-check for blank strings.

/// Upper bound on the number of characters accepted by [`NonEmptyText`].
///
/// Chat input and letterhead lines are short prose; anything longer than this is almost
/// certainly a paste accident.
pub const MAX_TEXT_CHARS: usize = 4_000;

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
    /// The trimmed input exceeded [`MAX_TEXT_CHARS`]
    #[error("text exceeds {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction, so
/// `"  hello "` is stored as `"hello"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if the trimmed input is empty and [`TextError::TooLong`]
    /// if it is longer than [`MAX_TEXT_CHARS`] characters.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }

        let actual = trimmed.chars().count();
        if actual > MAX_TEXT_CHARS {
            return Err(TextError::TooLong {
                max: MAX_TEXT_CHARS,
                actual,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the owned string.
    pub fn into_inner(self) -> String {
        self.0
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

impl std::str::FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let text = NonEmptyText::new("  Take with water \n").unwrap();
        assert_eq!(text.as_str(), "Take with water");
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(" \t\n"), Err(TextError::Empty));
    }

    #[test]
    fn rejects_overlong_input() {
        let long = "a".repeat(MAX_TEXT_CHARS + 1);
        assert_eq!(
            NonEmptyText::new(long),
            Err(TextError::TooLong {
                max: MAX_TEXT_CHARS,
                actual: MAX_TEXT_CHARS + 1
            })
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        let accented = "é".repeat(MAX_TEXT_CHARS);
        assert!(NonEmptyText::new(accented).is_ok());
    }

    #[test]
    fn deserialize_rejects_blank_string() {
        let err = serde_json::from_str::<NonEmptyText>("\"   \"").unwrap_err();
        assert!(err.to_string().contains("text cannot be empty"));
    }

    #[test]
    fn serialize_writes_plain_string() {
        let text: NonEmptyText = "Dr Smith".parse().unwrap();
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"Dr Smith\"");
    }
}
