use anyhow::Result;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use crate::db::schema::SchemaMapping;
use crate::db::DbConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` when the production connection is switched off with `PROD_DB_ENABLED=false`.
    pub source_db: Option<DbConfig>,
    pub destination_db: DbConfig,
    pub source_schema: SchemaMapping,
    pub db_max_connections: u32,
    pub fetch_timeout: Duration,
    /// Zone used to resolve "today" when list queries omit their dates.
    pub filter_utc_offset_hours: i32,
    pub server_host: String,
    pub server_port: u16,
    pub log_level: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let with_fallback = |primary: &str, fallback: &str, default: &str| {
            var(primary)
                .or_else(|| var(fallback))
                .unwrap_or_else(|| default.to_string())
        };
        let or_default = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let source_enabled = var("PROD_DB_ENABLED")
            .map(|v| !v.eq_ignore_ascii_case("false") && v != "0")
            .unwrap_or(true);

        let source_db = source_enabled.then(|| DbConfig {
            host: or_default("PROD_DB_HOST", "localhost"),
            port: or_default("PROD_DB_PORT", "3306").parse().unwrap_or(3306),
            user: or_default("PROD_DB_USER", "root"),
            password: or_default("PROD_DB_PASSWORD", ""),
            database: or_default("PROD_DB_NAME", "production"),
            charset: or_default("PROD_DB_CHARSET", "utf8mb4"),
        });

        let destination_db = DbConfig {
            host: with_fallback("DB_HOST", "LOCAL_DB_HOST", "localhost"),
            port: with_fallback("DB_PORT", "LOCAL_DB_PORT", "3306")
                .parse()
                .unwrap_or(3306),
            user: with_fallback("DB_USER", "LOCAL_DB_USER", "root"),
            password: with_fallback("DB_PASSWORD", "LOCAL_DB_PASSWORD", ""),
            database: with_fallback("DB_NAME", "LOCAL_DB_NAME", "dtako_local"),
            charset: with_fallback("DB_CHARSET", "LOCAL_DB_CHARSET", "utf8mb4"),
        };

        let source_schema = match var("SOURCE_SCHEMA") {
            Some(name) => name.parse()?,
            None if var("PROD_DB_NAME").as_deref() == Some("dtako_test_prod") => {
                SchemaMapping::Test
            }
            None => SchemaMapping::Production,
        };

        let db_max_connections = or_default("DB_MAX_CONNECTIONS", "10").parse().unwrap_or(10);
        let fetch_timeout = Duration::from_secs(
            or_default("FETCH_TIMEOUT_SECS", "30").parse().unwrap_or(30),
        );
        let filter_utc_offset_hours = or_default("FILTER_UTC_OFFSET_HOURS", "9")
            .parse()
            .ok()
            .filter(|h: &i32| (-23..=23).contains(h))
            .unwrap_or(9);

        let server_host = or_default("SERVER_HOST", "0.0.0.0");
        let server_port = or_default("SERVER_PORT", "8080").parse().unwrap_or(8080);
        let log_level = or_default("LOG_LEVEL", "info");

        Ok(Self {
            source_db,
            destination_db,
            source_schema,
            db_max_connections,
            fetch_timeout,
            filter_utc_offset_hours,
            server_host,
            server_port,
            log_level,
        })
    }
}
