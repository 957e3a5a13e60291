use std::fmt;
use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, Pool};
use tokio::sync::OnceCell;
use tracing::info;

use crate::error::{DtakoError, Result};

pub mod queries;
pub mod repository;
pub mod schema;

pub type DbPool = Pool<MySql>;

/// Named connection parameters for one MySQL database.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub charset: String,
}

impl DbConfig {
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .charset(&self.charset)
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"****")
            .field("database", &self.database)
            .field("charset", &self.charset)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreRole {
    Source,
    Destination,
}

impl fmt::Display for StoreRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("production"),
            Self::Destination => f.write_str("local"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

pub async fn init_pool(
    config: &DbConfig,
    settings: PoolSettings,
) -> std::result::Result<DbPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(config.connect_options())
        .await?;
    Ok(pool)
}

/// Owns the production and local pools for the lifetime of the process.
///
/// Each pool is opened on first use and then shared. Concurrent first callers
/// wait on the same initialisation. A failed attempt is reported to its caller
/// and leaves the slot empty, so the next call tries again.
pub struct ConnectionProvider {
    source_config: Option<DbConfig>,
    destination_config: DbConfig,
    settings: PoolSettings,
    source: OnceCell<DbPool>,
    destination: OnceCell<DbPool>,
}

impl ConnectionProvider {
    pub fn new(source: Option<DbConfig>, destination: DbConfig, settings: PoolSettings) -> Self {
        Self {
            source_config: source,
            destination_config: destination,
            settings,
            source: OnceCell::new(),
            destination: OnceCell::new(),
        }
    }

    pub fn has_source(&self) -> bool {
        self.source_config.is_some()
    }

    pub async fn source(&self) -> Result<&DbPool> {
        let config = self
            .source_config
            .as_ref()
            .ok_or(DtakoError::SourceUnavailable)?;
        self.source
            .get_or_try_init(|| Self::open(StoreRole::Source, config, self.settings))
            .await
    }

    pub async fn destination(&self) -> Result<&DbPool> {
        self.destination
            .get_or_try_init(|| {
                Self::open(StoreRole::Destination, &self.destination_config, self.settings)
            })
            .await
    }

    async fn open(role: StoreRole, config: &DbConfig, settings: PoolSettings) -> Result<DbPool> {
        info!(
            "Connecting to {} database at {}:{}/{}",
            role, config.host, config.port, config.database
        );
        let pool = init_pool(config, settings)
            .await
            .map_err(|source| DtakoError::Connection { role, source })?;
        info!("Connected to {} database", role);
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DbConfig {
        DbConfig {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: "secret".to_string(),
            database: "dtako_local".to_string(),
            charset: "utf8mb4".to_string(),
        }
    }

    #[test]
    fn test_debug_masks_password() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("dtako_local"));
    }

    #[tokio::test]
    async fn test_disabled_source_is_unavailable() {
        let provider = ConnectionProvider::new(None, config(), PoolSettings::default());
        assert!(!provider.has_source());
        assert!(matches!(
            provider.source().await,
            Err(DtakoError::SourceUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_a_connection_error() {
        let mut unreachable = config();
        unreachable.host = "127.0.0.1".to_string();
        unreachable.port = 1;
        let settings = PoolSettings {
            max_connections: 1,
            acquire_timeout: Duration::from_millis(500),
        };
        let provider = ConnectionProvider::new(None, unreachable, settings);
        let err = provider.destination().await.unwrap_err();
        assert!(matches!(
            err,
            DtakoError::Connection {
                role: StoreRole::Destination,
                ..
            }
        ));
    }
}
