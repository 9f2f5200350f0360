//! Display name validation shared by every entity

use super::ValidationError;

/// Maximum length for names (matches the VARCHAR(255) columns)
pub const MAX_NAME_LEN: usize = 255;

/// Validated, trimmed, non-empty name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(String);

impl Name {
    /// Create a name for `field`.
    ///
    /// # Rules
    /// - Non-empty after trimming whitespace
    /// - Max 255 characters
    ///
    /// # Example
    /// ```
    /// use catalog_server::models::Name;
    ///
    /// assert!(Name::new("name", "Books").is_ok());
    /// assert!(Name::new("name", "   ").is_err());
    /// ```
    pub fn new(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field });
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field,
                max: MAX_NAME_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
