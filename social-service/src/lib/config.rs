use std::env;
use std::fmt;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgSslMode;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

/// Either `url` or the discrete `host`/`port`/`user`/`name` fields must be set.
#[derive(Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub sslmode: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

/// Upper bound on `jwt.expiration_hours` (ten years).
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365 * 10;

fn default_max_connections() -> u32 {
    5
}

fn default_expiration_hours() -> i64 {
    auth::DEFAULT_SESSION_TTL_HOURS
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, DATABASE__URL, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// There are no in-code fallbacks for the secret, the port or the database.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .build()?;

        Self::from_configuration(configuration)
    }

    /// Deserialize and validate an already assembled configuration.
    pub fn from_configuration(configuration: ConfigBuilder) -> Result<Self, ConfigError> {
        let config: Config = configuration.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret is required (env JWT__SECRET)".to_string(),
            ));
        }
        if !(1..=MAX_EXPIRATION_HOURS).contains(&self.jwt.expiration_hours) {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be between 1 and {}",
                MAX_EXPIRATION_HOURS
            )));
        }
        if self.server.http_port == 0 {
            return Err(ConfigError::Message(
                "server.http_port is required (env SERVER__HTTP_PORT)".to_string(),
            ));
        }
        self.database.connect_options().map(|_| ())
    }
}

impl DatabaseConfig {
    /// Build connection options from `url`, or from the discrete fields when no
    /// url is given.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = self.url.as_deref().filter(|url| !url.is_empty()) {
            return url
                .parse::<PgConnectOptions>()
                .map_err(|e| ConfigError::Message(format!("invalid database.url: {}", e)));
        }

        let (Some(host), Some(port), Some(user), Some(name)) =
            (&self.host, self.port, &self.user, &self.name)
        else {
            return Err(ConfigError::Message(
                "database configuration is required (set DATABASE__URL or all of \
                 DATABASE__HOST, DATABASE__PORT, DATABASE__USER, DATABASE__NAME)"
                    .to_string(),
            ));
        };

        let mut options = PgConnectOptions::new()
            .host(host)
            .port(port)
            .username(user)
            .database(name);

        if let Some(password) = &self.password {
            options = options.password(password);
        }
        if let Some(sslmode) = &self.sslmode {
            let ssl_mode = sslmode
                .parse::<PgSslMode>()
                .map_err(|e| ConfigError::Message(format!("invalid database.sslmode: {}", e)))?;
            options = options.ssl_mode(ssl_mode);
        }

        Ok(options)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .field("sslmode", &self.sslmode)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}
