//! Shared helpers for unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{EmailAddress, Identity, NewSweet, Role, Sweet, SweetId, UserId};

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    /// Freeze the clock at `utc_now`.
    pub fn at(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Instant used by fixtures.
pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
        .single()
        .expect("fixture timestamp is valid")
}

/// Clock frozen at [`fixture_timestamp`].
pub fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock::at(fixture_timestamp()))
}

/// Identity with the given role.
pub fn identity(role: Role) -> Identity {
    let email = match role {
        Role::Admin => "admin@example.com",
        Role::User => "shopper@example.com",
    };
    Identity::new(
        UserId::random(),
        EmailAddress::new(email).expect("fixture email is valid"),
        role,
    )
}

/// Sweet created at [`fixture_timestamp`].
pub fn sample_sweet(name: &str, category: &str, price: f64, quantity: i64) -> Sweet {
    let draft = NewSweet::try_from_parts(Some(name), Some(category), Some(price), Some(quantity))
        .expect("fixture sweet is valid");
    Sweet::create(SweetId::random(), draft, fixture_timestamp())
}
