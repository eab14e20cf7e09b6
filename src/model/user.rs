use sqlx::FromRow;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::{Validate, ValidationError};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;

// Letters are general category L*; `\s` is Unicode White_Space.
static USER_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\s'\-]+$").expect("compile user name regex"));

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields the caller supplies when creating a user. Everything else is
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

// Payload for POST /users
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 1, message = "name is required"),
        custom(function = "is_valid_user_name")
    )]
    pub name: String,
    #[validate(
        length(min = 1, message = "email is required"),
        email(message = "email must be a valid email address")
    )]
    pub email: String,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
        }
    }
}

/// Name rule for users.
///
/// An empty value passes so that "missing" is reported by the required
/// check instead. Otherwise the trimmed value must hold between 2 and 50
/// characters, each a letter, whitespace, `-` or `'`.
pub fn is_valid_user_name(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }

    let trimmed = value.trim();
    let len = trimmed.chars().count();
    let allowed = USER_NAME_CHARS.is_match(trimmed);

    if (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) && allowed {
        return Ok(());
    }

    let mut error = ValidationError::new("valid_user_name");
    error.message = Some(
        format!(
            "name must be {}-{} characters of letters, spaces, hyphens or apostrophes",
            NAME_MIN_CHARS, NAME_MAX_CHARS
        )
        .into(),
    );
    Err(error)
}
