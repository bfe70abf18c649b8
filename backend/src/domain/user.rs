//! User accounts, roles, and the value types that make them up.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised while building user value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email did not have a `local@domain` shape.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Role name was not recognised.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id.as_ref().trim())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Public handle chosen at registration. Stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a username.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Email address normalised to trimmed lowercase.
///
/// Only the coarse `local@domain` shape is checked; deliverability is not.
///
/// # Examples
/// ```
/// use sweetshop::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Admin@Example.COM ").expect("valid email");
/// assert_eq!(email.as_ref(), "admin@example.com");
/// assert!(EmailAddress::new("no-at-sign").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate, normalise, and construct an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let Some((local, domain)) = normalised.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        let well_formed = !local.is_empty()
            && !domain.is_empty()
            && !domain.contains('@')
            && !normalised.chars().any(char::is_whitespace);
        if !well_formed {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Role assigned to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular shopper. Every registration starts here.
    #[default]
    User,
    /// Operator allowed to delete and restock sweets.
    Admin,
}

impl Role {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Opaque password hash in PHC string format.
///
/// `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap an already-computed PHC string.
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Borrow the PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    password: PasswordDigest,
    role: Role,
    created_at: DateTime<Utc>,
}

impl User {
    /// Assemble a user from validated parts.
    #[must_use]
    pub fn new(
        id: UserId,
        username: Username,
        email: EmailAddress,
        password: PasswordDigest,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password,
            role,
            created_at,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Registered username.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Normalised email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored password hash.
    #[must_use]
    pub fn password(&self) -> &PasswordDigest {
        &self.password
    }

    /// Assigned role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Registration time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
