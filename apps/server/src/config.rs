//! Layered configuration for the clinic server.
//!
//! Values resolve in order: built-in defaults, `config/default.toml`,
//! then `MOLAR_*` environment variables (`MOLAR_SERVER__PORT=8080`).
//! A `.env` file is honored via dotenvy, and `DATABASE_URL` always wins
//! for the database connection string.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub clinic: ClinicConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            clinic: ClinicConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body size limit in bytes.
    pub max_request_body_size: usize,
    /// Allowed CORS origins. Empty means no CORS headers are emitted.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_request_body_size: 1024 * 1024,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_min_size: u32,
    pub pool_max_size: u32,
    pub pool_timeout_seconds: u64,
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/molar".to_string(),
            pool_min_size: 1,
            pool_max_size: 10,
            pool_timeout_seconds: 30,
            run_migrations: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    /// One of: daily, hourly, minutely, never.
    pub file_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_enabled: false,
            file_directory: "logs".to_string(),
            file_prefix: "molar".to_string(),
            file_rotation: "daily".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClinicConfig {
    /// Default price of a clinic card when none is given at issue time.
    pub card_price: Decimal,
    /// Certificate numbers never go below this floor.
    pub certificate_number_floor: i64,
    /// Window for the "recently registered patients" listing, in months.
    pub recent_registration_months: u32,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            card_price: Decimal::new(100, 0),
            certificate_number_floor: 100_000,
            recent_registration_months: 3,
        }
    }
}

const ROTATIONS: &[&str] = &["daily", "hourly", "minutely", "never"];

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        // Load .env before reading the environment source
        dotenvy::dotenv().ok();

        let source = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("MOLAR")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            )
            .build()?;

        let mut config: Config = source.try_deserialize()?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be non-zero".to_string());
        }
        if self.server.max_request_body_size == 0 {
            return Err("server.max_request_body_size must be non-zero".to_string());
        }
        if self.database.pool_max_size == 0 {
            return Err("database.pool_max_size must be non-zero".to_string());
        }
        if self.database.pool_min_size > self.database.pool_max_size {
            return Err("database.pool_min_size must not exceed pool_max_size".to_string());
        }
        if !ROTATIONS.contains(&self.logging.file_rotation.as_str()) {
            return Err(format!(
                "logging.file_rotation must be one of {ROTATIONS:?}, got '{}'",
                self.logging.file_rotation
            ));
        }
        if self.clinic.card_price < Decimal::ZERO {
            return Err("clinic.card_price must not be negative".to_string());
        }
        if self.clinic.recent_registration_months == 0 {
            return Err("clinic.recent_registration_months must be non-zero".to_string());
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid listen address: {e}"))
    }
}
