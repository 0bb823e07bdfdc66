use crate::{Error, Result};
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_ADVICE_API_URL: &str = "https://api.adviceslip.com/advice";
pub const DEFAULT_QUOTE_API_URL: &str = "https://zenquotes.io/api/random";
pub const DEFAULT_BORED_API_URL: &str = "https://www.boredapi.com/api/activity";
pub const DEFAULT_DOG_API_URL: &str = "https://dog.ceo/api/breeds/image/random";

#[derive(Clone, Serialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// 0 opens a fresh connection per statement; anything else uses a pool of that size.
    pub pool_size: u32,
    /// Pool acquire timeout; per-call connections have no deadline.
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &"***")
            .field("pool_size", &self.pool_size)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl DatabaseConfig {
    /// libpq-style key/value connection string.
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.dbname, self.user, self.password
        )
    }

    /// Same as `connection_string` with the password masked, for logs.
    pub fn redacted_connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password=***",
            self.host, self.port, self.dbname, self.user
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySource {
    Quotes,
    Bored,
}

impl ActivitySource {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quotes" | "quote" | "zenquotes" => Some(Self::Quotes),
            "bored" | "boredapi" => Some(Self::Bored),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourcesConfig {
    pub advice_url: String,
    pub quote_url: String,
    pub bored_url: String,
    pub dog_url: String,
    pub activity_source: ActivitySource,
    pub request_timeout: Duration,
}

impl SourcesConfig {
    /// URL the configured activity extractor should call.
    pub fn activity_url(&self) -> &str {
        match self.activity_source {
            ActivitySource::Quotes => &self.quote_url,
            ActivitySource::Bored => &self.bored_url,
        }
    }
}

/// Process-wide configuration, built once at startup and passed by reference.
#[derive(Debug, Clone, Serialize)]
pub struct EtlConfig {
    pub database: DatabaseConfig,
    pub sources: SourcesConfig,
}

impl EtlConfig {
    #[tracing::instrument(level = "debug")]
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (env, test fixtures).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let parse_num = |key: &str, default: u64| -> Result<u64> {
            match lookup(key) {
                Some(v) if !v.trim().is_empty() => v
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| Error::config(format!("{key} must be a non-negative integer, got '{v}'"))),
                _ => Ok(default),
            }
        };

        let port_raw = get("DB_PORT", "5432");
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| Error::config(format!("DB_PORT must be a port number, got '{port_raw}'")))?;

        let pool_size = u32::try_from(parse_num("DB_POOL_SIZE", 0)?)
            .map_err(|_| Error::config("DB_POOL_SIZE is too large"))?;

        let activity_raw = get("ACTIVITY_SOURCE", "quotes");
        let activity_source = ActivitySource::parse(&activity_raw).ok_or_else(|| {
            Error::config(format!(
                "ACTIVITY_SOURCE must be 'quotes' or 'bored', got '{activity_raw}'"
            ))
        })?;

        let cfg = Self {
            database: DatabaseConfig {
                host: get("DB_HOST", "localhost"),
                port,
                dbname: get("DB_NAME", "etl_pipeline"),
                user: get("DB_USER", "postgres"),
                password: get("DB_PASSWORD", ""),
                pool_size,
                connect_timeout: Duration::from_millis(parse_num("DB_CONNECT_TIMEOUT_MS", 5_000)?),
            },
            sources: SourcesConfig {
                advice_url: get("ADVICE_API_URL", DEFAULT_ADVICE_API_URL),
                quote_url: get("QUOTE_API_URL", DEFAULT_QUOTE_API_URL),
                bored_url: get("BORED_API_URL", DEFAULT_BORED_API_URL),
                dog_url: get("DOG_API_URL", DEFAULT_DOG_API_URL),
                activity_source,
                request_timeout: Duration::from_secs(parse_num("REQUEST_TIMEOUT", 10)?),
            },
        };

        cfg.validate()?;
        Ok(cfg)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn validate(&self) -> Result<()> {
        let db = &self.database;
        for (name, value) in [("DB_HOST", &db.host), ("DB_NAME", &db.dbname), ("DB_USER", &db.user)] {
            if value.trim().is_empty() {
                return Err(Error::config(format!("missing required configuration: {name}")));
            }
        }
        if db.port == 0 {
            return Err(Error::config("DB_PORT must be > 0"));
        }
        if db.connect_timeout.is_zero() {
            return Err(Error::config("DB_CONNECT_TIMEOUT_MS must be > 0"));
        }

        let src = &self.sources;
        if src.request_timeout.is_zero() {
            return Err(Error::config("REQUEST_TIMEOUT must be > 0"));
        }
        for (name, url) in [
            ("ADVICE_API_URL", &src.advice_url),
            ("QUOTE_API_URL", &src.quote_url),
            ("BORED_API_URL", &src.bored_url),
            ("DOG_API_URL", &src.dog_url),
        ] {
            let parsed = reqwest::Url::parse(url)
                .map_err(|e| Error::config(format!("{name} is not a valid url ({e}): '{url}'")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::config(format!("{name} must be an http(s) url: '{url}'")));
            }
        }
        Ok(())
    }
}
