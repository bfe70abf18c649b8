//! Application configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `SWEETSHOP_*` environment variables, and
//! configuration files, in that order of precedence.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;
use crate::outbound::security::DEFAULT_TOKEN_TTL;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// Host and port do not form a socket address.
    #[error("invalid bind address {value}: {message}")]
    BindAddress { value: String, message: String },
    /// Seeding was requested without an admin password.
    #[error("seeding requires SWEETSHOP_ADMIN_PASSWORD")]
    MissingAdminPassword,
}

/// Runtime settings for the sweet shop server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SWEETSHOP")]
pub struct AppSettings {
    /// Interface to bind; defaults to all interfaces.
    pub host: Option<String>,
    /// Port to bind; defaults to 3000.
    pub port: Option<u16>,
    /// PostgreSQL URL. In-memory stores are used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// HMAC secret for identity tokens.
    pub jwt_secret: Option<String>,
    /// Token lifetime in hours; defaults to seven days.
    pub token_ttl_hours: Option<u64>,
    /// Permit a random signing secret when none is configured.
    #[ortho_config(default = false)]
    pub allow_ephemeral_secret: bool,
    /// Ensure the admin account and sample sweets exist on startup.
    #[ortho_config(default = false)]
    pub seed: bool,
    /// Password given to the seeded admin account.
    pub admin_password: Option<String>,
}

impl AppSettings {
    /// Socket address built from host and port.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddress`] when the pair does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let port = self.port.unwrap_or(DEFAULT_PORT);
        let value = if host.contains(':') {
            format!("[{host}]:{port}")
        } else {
            format!("{host}:{port}")
        };
        value
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::BindAddress {
                message: err.to_string(),
                value,
            })
    }

    /// Configured token lifetime.
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl_hours
            .map_or(DEFAULT_TOKEN_TTL, |hours| Duration::from_secs(hours * 60 * 60))
    }

    /// Pool configuration for `url`.
    pub fn pool_config(&self, url: &str) -> PoolConfig {
        let config = PoolConfig::new(url);
        match self.pool_max_size {
            Some(size) => config.with_max_size(size),
            None => config,
        }
    }

    /// Admin password for seeding, when seeding is enabled.
    ///
    /// # Errors
    /// Returns [`SettingsError::MissingAdminPassword`] when seeding is on but
    /// no non-blank password is configured.
    pub fn seed_admin_password(&self) -> Result<Option<&str>, SettingsError> {
        if !self.seed {
            return Ok(None);
        }
        self.admin_password
            .as_deref()
            .filter(|password| !password.trim().is_empty())
            .map(Some)
            .ok_or(SettingsError::MissingAdminPassword)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "SWEETSHOP_HOST",
        "SWEETSHOP_PORT",
        "SWEETSHOP_DATABASE_URL",
        "SWEETSHOP_POOL_MAX_SIZE",
        "SWEETSHOP_JWT_SECRET",
        "SWEETSHOP_TOKEN_TTL_HOURS",
        "SWEETSHOP_ALLOW_EPHEMERAL_SECRET",
        "SWEETSHOP_SEED",
        "SWEETSHOP_ADMIN_PASSWORD",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("sweetshop")]).expect("config should load")
    }

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(cleared());

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind address"),
            "0.0.0.0:3000".parse::<SocketAddr>().expect("socket address")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.token_ttl(), DEFAULT_TOKEN_TTL);
        assert!(!settings.seed);
        assert!(!settings.allow_ephemeral_secret);
        assert_eq!(settings.seed_admin_password(), Ok(None));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = cleared();
        vars.retain(|(name, _)| {
            !matches!(
                *name,
                "SWEETSHOP_PORT"
                    | "SWEETSHOP_DATABASE_URL"
                    | "SWEETSHOP_TOKEN_TTL_HOURS"
                    | "SWEETSHOP_SEED"
                    | "SWEETSHOP_ADMIN_PASSWORD"
            )
        });
        vars.extend([
            ("SWEETSHOP_PORT", Some("8080".to_owned())),
            (
                "SWEETSHOP_DATABASE_URL",
                Some("postgres://localhost/sweets".to_owned()),
            ),
            ("SWEETSHOP_TOKEN_TTL_HOURS", Some("2".to_owned())),
            ("SWEETSHOP_SEED", Some("true".to_owned())),
            ("SWEETSHOP_ADMIN_PASSWORD", Some("admin123".to_owned())),
        ]);
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr().expect("bind address").port(), 8080);
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/sweets")
        );
        assert_eq!(settings.token_ttl(), Duration::from_secs(7200));
        assert_eq!(settings.seed_admin_password(), Ok(Some("admin123")));
    }

    #[rstest]
    fn seeding_without_password_is_refused() {
        let mut vars = cleared();
        vars.retain(|(name, _)| *name != "SWEETSHOP_SEED");
        vars.push(("SWEETSHOP_SEED", Some("true".to_owned())));
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.seed_admin_password(),
            Err(SettingsError::MissingAdminPassword)
        );
    }

    #[rstest]
    #[case(Some("::1"), "[::1]:3000")]
    #[case(Some("127.0.0.1"), "127.0.0.1:3000")]
    fn bind_address_accepts_ipv4_and_ipv6(#[case] host: Option<&str>, #[case] expected: &str) {
        let _guard = lock_env(cleared());
        let mut settings = load_from_empty_args();
        settings.host = host.map(str::to_owned);
        assert_eq!(
            settings.bind_addr().expect("bind address"),
            expected.parse::<SocketAddr>().expect("socket address")
        );
    }

    #[rstest]
    fn unparsable_host_is_reported() {
        let _guard = lock_env(cleared());
        let mut settings = load_from_empty_args();
        settings.host = Some("not a host".to_owned());
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddress { .. })
        ));
    }
}
