//! Process configuration
//!
//! Everything comes from environment variables; a `.env` file in the working
//! directory is loaded first for local runs. Required variables fail loudly,
//! optional ones fall back to their defaults when unset or unparsable.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use realm_core::SnowflakeGenerator;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub gateway: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
    pub hub: HubConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

impl AppSettings {
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.env.is_production()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment `{other}`")),
        }
    }
}

/// Listen address for one of the two processes
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Tokens are minted by the identity provider; only the shared secret lives here
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime in seconds of tokens issued by `JwtService` (tests and tooling)
    pub access_token_expiry: i64,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

/// An empty list means "any origin" outside production
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SnowflakeConfig {
    pub worker_id: u16,
}

/// Channel subscription hub tuning
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Outbound queue capacity per connection; the oldest event is dropped on overflow
    pub queue_capacity: usize,
    /// Trailing window that coalesces channel list changes into one refresh
    pub control_debounce_ms: u64,
}

impl HubConfig {
    #[must_use]
    pub fn control_debounce(&self) -> Duration {
        Duration::from_millis(self.control_debounce_ms)
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            control_debounce_ms: 300,
        }
    }
}

/// Startup tasks
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Apply pending migrations from `./migrations` on start
    pub run_migrations: bool,
    /// Upsert the public General channel on start
    pub general_channel: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Variable lookup, abstracted so tests can feed a fixed map
trait Source {
    fn get(&self, name: &str) -> Option<String>;

    fn required<T: FromStr>(&self, name: &'static str) -> Result<T, ConfigError> {
        let raw = self.get(name).ok_or(ConfigError::MissingVar(name))?;
        raw.trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw))
    }

    fn or<T: FromStr>(&self, name: &str, default: T) -> T {
        self.get(name)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(default)
    }

    fn text(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_owned())
    }

    /// Accepts `true/false/1/0/yes/no`, any case
    fn flag(&self, name: &str, default: bool) -> bool {
        match self.get(name).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("true" | "1" | "yes") => true,
            Some("false" | "0" | "no") => false,
            _ => default,
        }
    }

    fn list(&self, name: &str) -> Vec<String> {
        self.get(name)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

struct ProcessEnv;

impl Source for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

const DEFAULT_HOST: &str = "127.0.0.1";

/// `WORKER_ID` must fit the generator's 10-bit field; a bad value is fatal
fn worker_id(src: &impl Source) -> Result<u16, ConfigError> {
    let Some(raw) = src.get("WORKER_ID") else {
        return Ok(0);
    };
    raw.trim()
        .parse::<u16>()
        .ok()
        .filter(|id| *id <= SnowflakeGenerator::MAX_WORKER_ID)
        .ok_or(ConfigError::InvalidValue("WORKER_ID", raw))
}

impl AppConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or unparsable
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is normal outside local development
        let _ = dotenvy::dotenv();
        Self::load(&ProcessEnv)
    }

    fn load(src: &impl Source) -> Result<Self, ConfigError> {
        let hub_defaults = HubConfig::default();

        Ok(Self {
            app: AppSettings {
                name: src.text("APP_NAME", "neon-realm"),
                env: src.or("APP_ENV", Environment::default()),
            },
            api: ServerConfig {
                host: src.text("API_HOST", DEFAULT_HOST),
                port: src.required("API_PORT")?,
            },
            gateway: ServerConfig {
                host: src.text("GATEWAY_HOST", DEFAULT_HOST),
                port: src.required("GATEWAY_PORT")?,
            },
            database: DatabaseConfig {
                url: src.required("DATABASE_URL")?,
                max_connections: src.or("DATABASE_MAX_CONNECTIONS", 20),
                min_connections: src.or("DATABASE_MIN_CONNECTIONS", 5),
            },
            redis: RedisConfig {
                url: src.required("REDIS_URL")?,
                max_connections: src.or("REDIS_MAX_CONNECTIONS", 10),
            },
            jwt: JwtConfig {
                secret: src.required("JWT_SECRET")?,
                access_token_expiry: src.or("JWT_ACCESS_TOKEN_EXPIRY", 900),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: src.or("RATE_LIMIT_REQUESTS_PER_SECOND", 10),
                burst: src.or("RATE_LIMIT_BURST", 50),
            },
            cors: CorsConfig {
                allowed_origins: src.list("CORS_ALLOWED_ORIGINS"),
            },
            snowflake: SnowflakeConfig {
                worker_id: worker_id(src)?,
            },
            hub: HubConfig {
                queue_capacity: src
                    .or("HUB_QUEUE_CAPACITY", hub_defaults.queue_capacity)
                    .max(1),
                control_debounce_ms: src
                    .or("HUB_CONTROL_DEBOUNCE_MS", hub_defaults.control_debounce_ms),
            },
            bootstrap: BootstrapConfig {
                run_migrations: src.flag("RUN_MIGRATIONS", true),
                general_channel: src.flag("BOOTSTRAP_GENERAL_CHANNEL", true),
            },
        })
    }
}
