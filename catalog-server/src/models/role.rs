//! Role entity - permission tag granted to users

use sqlx::FromRow;

use super::{Name, ValidationError};

/// Role row
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Role {
    pub id: i64,
    pub authority: String,
}

/// Mutable fields of a role
#[derive(Debug, Clone, PartialEq)]
pub struct RoleDraft {
    pub authority: Name,
}

impl RoleDraft {
    pub fn new(authority: &str) -> Result<Self, ValidationError> {
        let authority = Name::new("authority", authority)?;
        if authority.as_str().contains(char::is_whitespace) {
            return Err(ValidationError::InvalidFormat {
                field: "authority",
                reason: "must not contain whitespace",
            });
        }
        Ok(Self { authority })
    }
}
