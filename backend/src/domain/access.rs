//! Role capabilities and the authenticated identity attached to requests.
//!
//! Roles map to fixed permission sets. Handlers ask the [`Identity`] for the
//! permission an operation needs instead of comparing role names.

use serde::Serialize;

use super::ports::UserRepositoryError;
use super::{EmailAddress, Error, Role, UserId};

/// Capability that an operation may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// List and search sweets.
    ViewCatalog,
    /// Create and update sweets.
    EditCatalog,
    /// Buy stock.
    Purchase,
    /// Remove sweets from the catalogue.
    DeleteSweet,
    /// Add stock.
    Restock,
}

const USER_PERMISSIONS: &[Permission] = &[
    Permission::ViewCatalog,
    Permission::EditCatalog,
    Permission::Purchase,
];

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::ViewCatalog,
    Permission::EditCatalog,
    Permission::Purchase,
    Permission::DeleteSweet,
    Permission::Restock,
];

impl Role {
    /// Capabilities granted to this role.
    #[must_use]
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Self::User => USER_PERMISSIONS,
            Self::Admin => ADMIN_PERMISSIONS,
        }
    }

    /// Whether the role carries `permission`.
    #[must_use]
    pub fn grants(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

/// Reasons the access gate refuses a request.
///
/// The first three map to 401, [`AccessError::Forbidden`] to 403. A failed
/// credential-store lookup is not a refusal and maps to 503 or 500.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// No bearer token accompanied the request.
    #[error("Access denied. No token provided.")]
    MissingToken,
    /// The token failed signature, shape, or expiry checks.
    #[error("Invalid or expired token.")]
    InvalidToken,
    /// The token was valid but its subject no longer exists.
    #[error("Invalid token. User not found.")]
    StaleIdentity,
    /// The identity lacks the required permission.
    #[error("Access denied. Admin privileges required.")]
    Forbidden {
        /// Permission that was missing.
        required: Permission,
    },
    /// The credential store failed while resolving the token subject.
    #[error("identity lookup failed: {0}")]
    Store(UserRepositoryError),
}

impl From<AccessError> for Error {
    fn from(value: AccessError) -> Self {
        let message = value.to_string();
        match value {
            AccessError::Forbidden { required } => Self::forbidden(message)
                .with_details(serde_json::json!({ "required": required })),
            AccessError::MissingToken
            | AccessError::InvalidToken
            | AccessError::StaleIdentity => Self::unauthorized(message),
            AccessError::Store(UserRepositoryError::Connection { .. }) => {
                Self::service_unavailable(message)
            }
            AccessError::Store(_) => Self::internal(message),
        }
    }
}

/// Identity resolved from a verified token and the stored account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: UserId,
    email: EmailAddress,
    role: Role,
}

impl Identity {
    /// Build an identity from its parts.
    #[must_use]
    pub fn new(id: UserId, email: EmailAddress, role: Role) -> Self {
        Self { id, email, role }
    }

    /// Account identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Account email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Account role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Return `self` when the role grants `permission`.
    ///
    /// # Examples
    /// ```
    /// use sweetshop::domain::{AccessError, EmailAddress, Identity, Permission, Role, UserId};
    ///
    /// let email = EmailAddress::new("shopper@example.com").expect("valid email");
    /// let shopper = Identity::new(UserId::random(), email, Role::User);
    /// assert!(shopper.require(Permission::Purchase).is_ok());
    /// assert_eq!(
    ///     shopper.require(Permission::Restock),
    ///     Err(AccessError::Forbidden { required: Permission::Restock }),
    /// );
    /// ```
    pub fn require(&self, permission: Permission) -> Result<&Self, AccessError> {
        if self.role.grants(permission) {
            Ok(self)
        } else {
            Err(AccessError::Forbidden {
                required: permission,
            })
        }
    }
}

impl From<&super::User> for Identity {
    fn from(user: &super::User) -> Self {
        Self::new(*user.id(), user.email().clone(), user.role())
    }
}
