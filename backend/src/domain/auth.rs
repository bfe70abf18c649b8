//! Authentication primitives: credentials, registration payloads, and tokens.
//!
//! Handlers pass raw strings in; constructors here decide whether they are
//! usable before a service touches a port. Missing and blank values are the
//! same failure.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::json;
use zeroize::Zeroizing;

use super::{EmailAddress, Error, Role, User, UserId, UserValidationError, Username};

/// Validation failures for account payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    /// Username, email, or password missing from a registration.
    #[error("Please provide username, email, and password")]
    MissingRegistrationFields,
    /// Email or password missing from a login.
    #[error("Please provide email and password")]
    MissingLoginFields,
    /// Email present but not shaped like an address.
    #[error("Please provide a valid email address")]
    InvalidEmail,
}

impl From<CredentialsError> for Error {
    fn from(value: CredentialsError) -> Self {
        let error = Self::invalid_request(value.to_string());
        match value {
            CredentialsError::InvalidEmail => {
                error.with_details(json!({ "field": "email", "code": "invalid_email" }))
            }
            CredentialsError::MissingRegistrationFields | CredentialsError::MissingLoginFields => {
                error.with_details(json!({ "code": "missing_fields" }))
            }
        }
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed, lowercased, and non-empty.
/// - `password` is non-empty and kept verbatim.
///
/// # Examples
/// ```
/// use sweetshop::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Admin@Example.com ", "admin123").unwrap();
/// assert_eq!(creds.email(), "admin@example.com");
/// assert_eq!(creds.password(), "admin123");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(CredentialsError::MissingLoginFields);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for lookup.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated registration request.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsError> {
        if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(CredentialsError::MissingRegistrationFields);
        }
        let username =
            Username::new(username).map_err(|_| CredentialsError::MissingRegistrationFields)?;
        let email = EmailAddress::new(email).map_err(|err| match err {
            UserValidationError::EmptyEmail => CredentialsError::MissingRegistrationFields,
            _ => CredentialsError::InvalidEmail,
        })?;
        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested username.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Normalised email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plain password awaiting hashing.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signed identity token handed to clients.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken(String);

impl IssuedToken {
    /// Wrap an encoded token.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IssuedToken(<redacted>)")
    }
}

/// Verified token contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject account.
    pub user_id: UserId,
    /// Email at issue time.
    pub email: String,
    /// Role at issue time.
    pub role: Role,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

/// Outcome of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AccountSession {
    /// Account the token belongs to.
    pub user: User,
    /// Freshly issued token.
    pub token: IssuedToken,
}
