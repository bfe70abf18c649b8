//! Startup seeding of the admin account and sample catalogue.
//!
//! Seeding is idempotent: the admin is created only when no account holds
//! its email, and each sample sweet only when no sweet carries its name.

use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    PasswordHasher, PasswordHasherError, SweetRepository, SweetRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    EmailAddress, NewSweet, Role, Sweet, SweetId, SweetValidationError, User, UserId,
    UserValidationError, Username,
};

/// Username of the seeded administrator.
pub const ADMIN_USERNAME: &str = "admin";
/// Email of the seeded administrator.
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Sample catalogue as `(name, category, price, quantity)`.
pub const SAMPLE_SWEETS: [(&str, &str, f64, i64); 3] = [
    ("Chocolate Bar", "Chocolate", 2.5, 100),
    ("Gummy Bears", "Gummies", 1.75, 200),
    ("Lollipop", "Hard Candy", 0.5, 150),
];

/// Failures while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
    #[error(transparent)]
    Sweets(#[from] SweetRepositoryError),
    #[error(transparent)]
    Hashing(#[from] PasswordHasherError),
    #[error("seed account is invalid: {0}")]
    Account(#[from] UserValidationError),
    #[error("seed sweet is invalid: {0}")]
    Sweet(#[from] SweetValidationError),
}

/// What a seeding run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Whether the admin account was created by this run.
    pub admin_created: bool,
    /// Number of sample sweets inserted by this run.
    pub sweets_inserted: usize,
}

/// Stores and collaborators used by [`seed`].
pub struct SeedTargets<'a> {
    pub users: &'a dyn UserRepository,
    pub hasher: &'a dyn PasswordHasher,
    pub sweets: &'a dyn SweetRepository,
    pub clock: &'a dyn Clock,
}

/// Ensure the admin account and sample sweets exist.
///
/// # Errors
/// Propagates store and hashing failures.
pub async fn seed(targets: SeedTargets<'_>, admin_password: &str) -> Result<SeedReport, SeedError> {
    let admin_created = ensure_admin(&targets, admin_password).await?;
    let sweets_inserted = ensure_samples(&targets).await?;
    let report = SeedReport {
        admin_created,
        sweets_inserted,
    };
    info!(
        admin_created = report.admin_created,
        sweets_inserted = report.sweets_inserted,
        "seeding complete"
    );
    Ok(report)
}

async fn ensure_admin(targets: &SeedTargets<'_>, password: &str) -> Result<bool, SeedError> {
    let email = EmailAddress::new(ADMIN_EMAIL)?;
    if targets.users.find_by_email(email.as_ref()).await?.is_some() {
        debug!(email = ADMIN_EMAIL, "admin account already exists");
        return Ok(false);
    }

    let digest = targets.hasher.hash(password).await?;
    let admin = User::new(
        UserId::random(),
        Username::new(ADMIN_USERNAME)?,
        email,
        digest,
        Role::Admin,
        targets.clock.utc(),
    );
    match targets.users.insert(&admin).await {
        Ok(()) => {
            info!(user_id = %admin.id(), "created admin account");
            Ok(true)
        }
        // Another instance seeded concurrently.
        Err(UserRepositoryError::Duplicate { .. }) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

async fn ensure_samples(targets: &SeedTargets<'_>) -> Result<usize, SeedError> {
    let mut inserted = 0;
    for (name, category, price, quantity) in SAMPLE_SWEETS {
        if targets.sweets.exists_by_name(name).await? {
            continue;
        }
        let draft =
            NewSweet::try_from_parts(Some(name), Some(category), Some(price), Some(quantity))?;
        targets
            .sweets
            .insert(&Sweet::create(SweetId::random(), draft, targets.clock.utc()))
            .await?;
        info!(name, "added sample sweet");
        inserted += 1;
    }
    Ok(inserted)
}
