use std::env;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub db_connect_attempts: u32,
    pub db_retry_delay_secs: u64,
}

/// A required setting is missing or a value does not parse.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// `DATABASE_URL` wins; otherwise the URL is composed from the `DB_*` settings.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => {
                let host = required("DB_HOST")?;
                let port: u16 = parse_or(&lookup, "DB_PORT", 5432)?;
                let user = required("DB_USER")?;
                let password = required("DB_PASSWORD")?;
                let name = required("DB_NAME")?;
                format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, name)
            }
        };

        Ok(Self {
            database_url,
            server_port: parse_or(&lookup, "SERVER_PORT", 3333)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_hours: parse_in_range(&lookup, "JWT_TTL_HOURS", 24, 1..=MAX_JWT_TTL_HOURS)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", 8)?,
            db_connect_attempts: parse_or(&lookup, "DB_CONNECT_ATTEMPTS", 10)?,
            db_retry_delay_secs: parse_or(&lookup, "DB_RETRY_DELAY_SECS", 2)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

/// One year.
const MAX_JWT_TTL_HOURS: i64 = 24 * 365;

fn parse_in_range<F>(
    lookup: &F,
    key: &'static str,
    default: i64,
    range: RangeInclusive<i64>,
) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
