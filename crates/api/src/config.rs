use axum::http::HeaderValue;
use schoolhub_cloud::storage::{DEFAULT_BUCKET, DEFAULT_CACHE_MAX_AGE_SECS};
use schoolhub_cloud::StorageConfig;

/// Default request body limit for multipart submissions (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Server configuration loaded from environment variables.
///
/// Everything except the database and storage credentials has a default
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum accepted request body in bytes.
    pub max_upload_bytes: usize,
    pub database_url: String,
    pub storage: StorageConfig,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MAX_UPLOAD_BYTES`     | `10485760`                 |
    /// | `DATABASE_URL`         | required                   |
    /// | `STORAGE_URL`          | required                   |
    /// | `STORAGE_SERVICE_KEY`  | required                   |
    /// | `STORAGE_BUCKET`       | `school-images`            |
    /// | `UPLOAD_CACHE_MAX_AGE` | `3600`                     |
    /// | `LOG_FORMAT`           | `pretty` (or `json`)       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.into());
        let required = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let host = var_or("HOST", "0.0.0.0");
        let port = parse_var("PORT", var_or("PORT", "3000"))?;

        let cors_origins = var_or("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|o| {
                o.parse::<HeaderValue>().map_err(|_| ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    value: o.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let request_timeout_secs =
            parse_var("REQUEST_TIMEOUT_SECS", var_or("REQUEST_TIMEOUT_SECS", "30"))?;
        let max_upload_bytes = parse_var(
            "MAX_UPLOAD_BYTES",
            var_or("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string()),
        )?;

        let database_url = required("DATABASE_URL")?;

        let storage = StorageConfig::new(
            required("STORAGE_URL")?,
            required("STORAGE_SERVICE_KEY")?,
        )
        .with_bucket(var_or("STORAGE_BUCKET", DEFAULT_BUCKET))
        .with_cache_max_age(parse_var(
            "UPLOAD_CACHE_MAX_AGE",
            var_or(
                "UPLOAD_CACHE_MAX_AGE",
                &DEFAULT_CACHE_MAX_AGE_SECS.to_string(),
            ),
        )?);

        let log_format = match var_or("LOG_FORMAT", "pretty").to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Invalid {
                    var: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            database_url,
            storage,
            log_format,
        })
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/schools"),
        ("STORAGE_URL", "https://abc.example.co/"),
        ("STORAGE_SERVICE_KEY", "secret"),
    ];

    #[test]
    fn defaults_apply() {
        let config = ServerConfig::from_lookup(lookup(REQUIRED)).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.storage.base_url, "https://abc.example.co");
        assert_eq!(config.storage.bucket, "school-images");
        assert_eq!(config.storage.cache_max_age_secs, 3600);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn overrides_apply() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("PORT", "8080"),
            ("CORS_ORIGINS", "http://a.test, http://b.test"),
            ("STORAGE_BUCKET", "logos"),
            ("LOG_FORMAT", "JSON"),
        ]);
        let config = ServerConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.storage.bucket, "logos");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn missing_database_url() {
        let pairs: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "DATABASE_URL")
            .collect();
        assert_matches!(
            ServerConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn bad_port() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "http"));
        assert_matches!(
            ServerConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::Invalid { var: "PORT", .. })
        );
    }
}
