//! User entity, email and password input validation

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Name, Role, ValidationError};

/// Maximum length for email addresses
const MAX_EMAIL_LEN: usize = 255;

/// Minimum length for plaintext passwords
const MIN_PASSWORD_LEN: usize = 6;

/// One `@`, no whitespace, a dot in the domain part
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

/// User with granted roles
///
/// `password_hash` is an argon2id PHC string and is never sent over the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    /// Ordered by role id
    pub roles: Vec<Role>,
}

/// Validated, lowercased email address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// # Example
    /// ```
    /// use catalog_server::models::Email;
    ///
    /// assert!(Email::new("maria@gmail.com").is_ok());
    /// assert!(Email::new("maria.gmail.com").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }

        if trimmed.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }

        if !EMAIL_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must be a valid email address",
            });
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plaintext password that passed the length rule; hash it before storing.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "password" });
        }
        if s.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::TooShort {
                field: "password",
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Mutable fields of a user
///
/// `password_hash: None` keeps the stored hash on update. Inserts always
/// carry a hash.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub first_name: Name,
    pub last_name: Name,
    pub email: Email,
    pub password_hash: Option<String>,
    pub role_ids: Vec<i64>,
}

impl UserDraft {
    pub fn new(
        first_name: &str,
        last_name: &str,
        email: &str,
        role_ids: impl IntoIterator<Item = i64>,
    ) -> Result<Self, ValidationError> {
        let mut role_ids: Vec<i64> = role_ids.into_iter().collect();
        role_ids.sort_unstable();
        role_ids.dedup();

        Ok(Self {
            first_name: Name::new("first_name", first_name)?,
            last_name: Name::new("last_name", last_name)?,
            email: Email::new(email)?,
            password_hash: None,
            role_ids,
        })
    }

    pub fn with_password_hash(mut self, hash: String) -> Self {
        self.password_hash = Some(hash);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rules() {
        assert_eq!(Email::new(" Alex@Gmail.com ").unwrap().as_str(), "alex@gmail.com");
        assert!(matches!(
            Email::new("alex@gmail").unwrap_err(),
            ValidationError::InvalidFormat { field: "email", .. }
        ));
        assert!(Email::new("al ex@gmail.com").is_err());
        assert!(matches!(
            Email::new("").unwrap_err(),
            ValidationError::Empty { field: "email" }
        ));
    }

    #[test]
    fn password_min_length() {
        assert!(Password::new("12345").is_err());
        assert!(Password::new("123456").is_ok());
    }

    #[test]
    fn password_debug_is_masked() {
        let password = Password::new("supersecret").unwrap();
        assert_eq!(format!("{:?}", password), "Password(***)");
    }

    #[test]
    fn draft_without_password() {
        let draft = UserDraft::new("Alex", "Brown", "alex@gmail.com", [2, 1, 2]).unwrap();
        assert!(draft.password_hash.is_none());
        assert_eq!(draft.role_ids, vec![1, 2]);
    }
}
