//! HTTP server settings and the configuration object handed to `create_server`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use persona::domain::TokenIssuer;
use persona::outbound::memory::MemoryDatabase;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);

/// Process settings loaded from CLI arguments, `PERSONA_*` environment
/// variables and configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PERSONA")]
pub struct ServerSettings {
    /// Address the HTTP listener binds to.
    pub bind_addr: Option<SocketAddr>,
    /// Username of an administrator created at startup.
    pub admin_user_name: Option<String>,
    /// Password of the administrator created at startup.
    pub admin_password: Option<String>,
}

impl ServerSettings {
    /// Return the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Administrator credentials, present only when both halves are set.
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (&self.admin_user_name, &self.admin_password) {
            (Some(user_name), Some(password)) => Some((user_name.as_str(), password.as_str())),
            _ => None,
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: TokenIssuer,
    pub(crate) database: MemoryDatabase,
}

impl ServerConfig {
    /// Construct a server configuration backed by a fresh in-memory database.
    #[must_use]
    pub fn new(tokens: TokenIssuer, bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            tokens,
            database: MemoryDatabase::new(),
        }
    }

    /// Database the persistence adapters read and write.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "inspected by server tests")
    )]
    pub fn database(&self) -> &MemoryDatabase {
        &self.database
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("persona")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env([
            ("PERSONA_BIND_ADDR", None::<String>),
            ("PERSONA_ADMIN_USER_NAME", None::<String>),
            ("PERSONA_ADMIN_PASSWORD", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert!(settings.admin_credentials().is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("PERSONA_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            ("PERSONA_ADMIN_USER_NAME", Some("operator01".to_owned())),
            ("PERSONA_ADMIN_PASSWORD", Some("AbCdef12!!34".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), SocketAddr::from(([127, 0, 0, 1], 9090)));
        assert_eq!(
            settings.admin_credentials(),
            Some(("operator01", "AbCdef12!!34"))
        );
    }

    #[rstest]
    fn half_configured_admin_is_ignored() {
        let _guard = lock_env([
            ("PERSONA_BIND_ADDR", None::<String>),
            ("PERSONA_ADMIN_USER_NAME", Some("operator01".to_owned())),
            ("PERSONA_ADMIN_PASSWORD", None::<String>),
        ]);

        assert!(load_from_empty_args().admin_credentials().is_none());
    }
}
