//! Configuration management

use clap::Parser;
use config::builder::DefaultState;
use config::{Config as ConfigSource, ConfigBuilder, ConfigError as BuilderError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Minimum signing secret length in bytes (HS256 key size)
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid server configuration: {0}")]
    InvalidServer(String),

    #[error("Invalid database configuration: {0}")]
    InvalidDatabase(String),

    #[error("Invalid auth configuration: {0}")]
    InvalidAuth(String),

    #[error("Invalid pokedex configuration: {0}")]
    InvalidPokedex(String),

    #[error("Invalid logging configuration: {0}")]
    InvalidLogging(String),

    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

impl From<BuilderError> for ConfigError {
    fn from(err: BuilderError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub pokedex: PokedexConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration with precedence: CLI args > Environment variables > Config file > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(CliArgs::parse())
    }

    /// Load configuration from already-parsed command-line arguments
    pub fn load_with(cli_args: CliArgs) -> Result<Self, ConfigError> {
        // 1. Defaults (lowest priority)
        let mut builder = with_defaults(ConfigSource::builder())?;

        // 2. Config file if specified
        if let Some(config_path) = &cli_args.config {
            if !config_path.exists() {
                return Err(ConfigError::FileNotFound(
                    config_path.display().to_string(),
                ));
            }
            builder = builder.add_source(File::from(config_path.as_path()));
        }

        // 3. Environment variables, e.g. POKEDEX__AUTH__JWT_SECRET=...
        builder = builder.add_source(
            Environment::with_prefix("POKEDEX")
                .separator("__")
                .try_parsing(true),
        );

        // Hosting platforms hand the port over as a bare PORT variable
        if let Ok(port) = std::env::var("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|_| ConfigError::InvalidServer(format!("PORT is not a valid port: {}", port)))?;
            builder = builder.set_override("server.port", port)?;
        }

        // 4. CLI arguments (highest priority)
        if let Some(host) = &cli_args.host {
            builder = builder.set_override("server.host", host.clone())?;
        }
        if let Some(port) = cli_args.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(db_path) = &cli_args.database {
            builder = builder.set_override("database.path", db_path.display().to_string())?;
        }
        if let Some(log_level) = &cli_args.log_level {
            builder = builder.set_override("logging.level", log_level.clone())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file path (defaults fill the gaps)
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let config: Config = with_defaults(ConfigSource::builder())?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.pokedex.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Apply default values for every key except the signing secret
fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 3000)?
        .set_default("server.request_timeout", 30)?
        .set_default("server.static_dir", "public")?
        .set_default("server.allowed_origins", vec!["*"])?
        .set_default("database.path", "./data/pokedex.db")?
        .set_default("database.connection_pool_size", 10)?
        .set_default("database.busy_timeout", 5000)?
        .set_default("auth.bcrypt_cost", bcrypt::DEFAULT_COST)?
        .set_default("auth.token_ttl_secs", 7 * 24 * 60 * 60)?
        .set_default("auth.operation_timeout_ms", 10_000)?
        .set_default("pokedex.base_url", "https://alchemy-pokedex.herokuapp.com")?
        .set_default("pokedex.timeout_secs", 10)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stdout")?)
}

/// Command-line arguments for configuration override
#[derive(Debug, Default, Parser)]
#[command(name = "pokedex-backend")]
#[command(about = "Pokédex favorites backend server", long_about = None)]
pub struct CliArgs {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Server host address
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Database file path
    #[arg(short, long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: u64, // seconds
    pub static_dir: PathBuf,
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::InvalidServer("host cannot be empty".to_string()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidServer("port must be greater than 0".to_string()));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::InvalidServer("request_timeout must be greater than 0".to_string()));
        }

        if self.allowed_origins.is_empty() {
            return Err(ConfigError::InvalidServer("allowed_origins cannot be empty".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub connection_pool_size: u32,
    pub busy_timeout: u64, // milliseconds
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidDatabase("path cannot be empty".to_string()));
        }

        if self.connection_pool_size == 0 {
            return Err(ConfigError::InvalidDatabase("connection_pool_size must be greater than 0".to_string()));
        }

        if self.busy_timeout == 0 {
            return Err(ConfigError::InvalidDatabase("busy_timeout must be greater than 0".to_string()));
        }

        Ok(())
    }
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC key for session tokens. Has no default.
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    /// Token lifetime; 0 disables expiry
    pub token_ttl_secs: u64,
    /// Upper bound for one repository call or hash computation
    pub operation_timeout_ms: u64,
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidAuth(format!(
                "jwt_secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidAuth("bcrypt_cost must be between 4 and 31".to_string()));
        }

        if self.operation_timeout_ms == 0 {
            return Err(ConfigError::InvalidAuth("operation_timeout_ms must be greater than 0".to_string()));
        }

        Ok(())
    }

    pub fn token_ttl(&self) -> Option<Duration> {
        match self.token_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("operation_timeout_ms", &self.operation_timeout_ms)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokedexConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl PokedexConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidPokedex(format!("base_url is not a valid URL: {}", e)))?;

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidPokedex("timeout_secs must be greater than 0".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub log_file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(ConfigError::InvalidLogging(
                format!("level must be one of: {:?}", valid_levels)
            ));
        }

        let valid_formats = ["json", "text"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(ConfigError::InvalidLogging(
                format!("format must be one of: {:?}", valid_formats)
            ));
        }

        let valid_outputs = ["stdout", "file"];
        if !valid_outputs.contains(&self.output.as_str()) {
            return Err(ConfigError::InvalidLogging(
                format!("output must be one of: {:?}", valid_outputs)
            ));
        }

        if self.output == "file" && self.log_file.is_none() {
            return Err(ConfigError::InvalidLogging(
                "log_file must be specified when output is 'file'".to_string()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    pub(crate) const TEST_SECRET: &str = "test-secret-that-is-at-least-32-bytes-long";

    /// Fully populated configuration for tests, cheap bcrypt cost
    pub(crate) fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                request_timeout: 30,
                static_dir: PathBuf::from("public"),
                allowed_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                path: PathBuf::from(":memory:"),
                connection_pool_size: 1,
                busy_timeout: 5000,
            },
            auth: AuthConfig {
                jwt_secret: TEST_SECRET.to_string(),
                bcrypt_cost: 4,
                token_ttl_secs: 3600,
                operation_timeout_ms: 10_000,
            },
            pokedex: PokedexConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                timeout_secs: 1,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "text".to_string(),
                output: "stdout".to_string(),
                log_file: None,
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut config = test_config();
        config.auth.jwt_secret = "too-short".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidAuth(_))));
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        let mut config = test_config();
        config.auth.bcrypt_cost = 3;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidAuth(_))));
        config.auth.bcrypt_cost = 32;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidAuth(_))));
        config.auth.bcrypt_cost = 12;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_ttl_disables_expiry() {
        let mut config = test_config();
        config.auth.token_ttl_secs = 0;
        assert!(config.auth.token_ttl().is_none());
        config.auth.token_ttl_secs = 60;
        assert_eq!(config.auth.token_ttl(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", test_config().auth);
        assert!(!rendered.contains(TEST_SECRET));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_invalid_pokedex_url_rejected() {
        let mut config = test_config();
        config.pokedex.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPokedex(_))));
    }

    #[test]
    fn test_file_output_requires_log_file() {
        let mut config = test_config();
        config.logging.output = "file".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLogging(_))));
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 8080\n\n[auth]\njwt_secret = \"{}\"\nbcrypt_cost = 5\n",
            TEST_SECRET
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.auth.bcrypt_cost, 5);
        assert_eq!(config.auth.token_ttl_secs, 7 * 24 * 60 * 60);
        assert_eq!(config.pokedex.base_url, "https://alchemy-pokedex.herokuapp.com");
    }

    #[test]
    fn test_from_file_without_secret_fails() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nport = 8080\n").unwrap();

        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::LoadError(_))
        ));
    }

    #[test]
    fn test_pool_size_out_of_range_fails_to_load() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[database]\nconnection_pool_size = 4294967297\n\n[auth]\njwt_secret = \"{}\"\n",
            TEST_SECRET
        )
        .unwrap();

        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::LoadError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
