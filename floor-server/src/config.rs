//! Server configuration
//!
//! Built once at startup and handed to [`crate::state::AppState`]; nothing
//! else reads the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | SUPABASE_URL | (required) | record store base URL |
//! | SUPABASE_SERVICE_KEY | (required) | store key; falls back to SUPABASE_SERVICE_ROLE_KEY, SUPABASE_SECRET_KEY, SUPABASE_ANON_KEY |
//! | PORT | 3000 | HTTP port |
//! | CORS_ORIGINS | http://localhost:8080,http://localhost:8081 | allowed browser origins |
//! | ALLOW_ANON_KEY_IN_DEV | true | tolerate a non-service key outside production |
//! | ENVIRONMENT / NODE_ENV | development | development, staging or production |
//! | BUSINESS_TIMEZONE | UTC | IANA zone used for "now" on the floor |
//! | STORE_TIMEOUT_MS | 10000 | per-request store timeout |
//! | OPENAPI_PATH | (unset) | OpenAPI document served at /openapi.yaml |
//! | LOG_LEVEL | info | log filter (RUST_LOG wins when set) |
//! | LOG_DIR | (unset) | directory for daily-rolling log files |

use base64::Engine;
use chrono_tz::Tz;
use std::path::PathBuf;

/// Role claim a backend key is expected to carry
pub const SERVICE_ROLE: &str = "service_role";

/// Key variables, in priority order
const KEY_VARS: [&str; 4] = [
    "SUPABASE_SERVICE_KEY",
    "SUPABASE_SERVICE_ROLE_KEY",
    "SUPABASE_SECRET_KEY",
    "SUPABASE_ANON_KEY",
];

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:8080,http://localhost:8081";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SUPABASE_URL must be set")]
    MissingStoreUrl,

    #[error("a store key must be set in SUPABASE_SERVICE_KEY, SUPABASE_SERVICE_ROLE_KEY, SUPABASE_SECRET_KEY or SUPABASE_ANON_KEY")]
    MissingStoreKey,

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("store key has role '{role}'; use the service_role key for the backend")]
    KeyRole { role: String },
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Record store base URL (no trailing slash)
    pub store_url: String,
    /// Record store API key
    pub store_key: String,
    /// `role` claim decoded from the key, if it is a JWT
    pub key_role: Option<String>,
    pub http_port: u16,
    pub cors_origins: Vec<String>,
    pub allow_anon_key_in_dev: bool,
    /// Environment: development | staging | production
    pub environment: String,
    /// Business time zone for the floor's notion of "now"
    pub timezone: Tz,
    pub store_timeout_ms: u64,
    pub openapi_path: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let store_url = var("SUPABASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .ok_or(ConfigError::MissingStoreUrl)?;
        let store_key = KEY_VARS
            .iter()
            .find_map(|name| var(name))
            .ok_or(ConfigError::MissingStoreKey)?;

        let http_port = parse_or(var("PORT"), "PORT", 3000)?;
        let store_timeout_ms = parse_or(var("STORE_TIMEOUT_MS"), "STORE_TIMEOUT_MS", 10_000)?;

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.into())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let allow_anon_key_in_dev = var("ALLOW_ANON_KEY_IN_DEV")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let environment = var("ENVIRONMENT")
            .or_else(|| var("NODE_ENV"))
            .unwrap_or_else(|| "development".into());

        let timezone = match var("BUSINESS_TIMEZONE") {
            Some(name) => name.parse::<Tz>().map_err(|_| ConfigError::Invalid {
                name: "BUSINESS_TIMEZONE",
                value: name.clone(),
            })?,
            None => Tz::UTC,
        };

        Ok(Self {
            key_role: key_role(&store_key),
            store_url,
            store_key,
            http_port,
            cors_origins,
            allow_anon_key_in_dev,
            environment,
            timezone,
            store_timeout_ms,
            openapi_path: var("OPENAPI_PATH").map(PathBuf::from),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: var("LOG_DIR"),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Key role as reported by health endpoints
    pub fn key_role_label(&self) -> &str {
        self.key_role.as_deref().unwrap_or("unknown")
    }

    /// Check that the store key carries the service role
    ///
    /// Fatal in production or when `ALLOW_ANON_KEY_IN_DEV` is false;
    /// otherwise logs a warning and lets startup continue.
    pub fn verify_key_role(&self) -> Result<(), ConfigError> {
        if self.key_role.as_deref() == Some(SERVICE_ROLE) {
            return Ok(());
        }

        let err = ConfigError::KeyRole {
            role: self.key_role_label().to_string(),
        };
        if self.is_production() || !self.allow_anon_key_in_dev {
            return Err(err);
        }
        tracing::warn!(environment = %self.environment, "{err}. Continuing in development mode.");
        Ok(())
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

/// Decode the `role` claim from a JWT-shaped key without verifying it
pub fn key_role(key: &str) -> Option<String> {
    let payload = key.split('.').nth(1)?;
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("role")?.as_str().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn jwt_with_role(role: &str) -> String {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let header = engine.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = engine.encode(format!(r#"{{"iss":"supabase","role":"{role}"}}"#));
        format!("{header}.{payload}.signature")
    }

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let key = jwt_with_role("service_role");
        let cfg = config(&[
            ("SUPABASE_URL", "https://demo.supabase.co/"),
            ("SUPABASE_SERVICE_KEY", &key),
        ])
        .unwrap();

        assert_eq!(cfg.store_url, "https://demo.supabase.co");
        assert_eq!(cfg.http_port, 3000);
        assert_eq!(
            cfg.cors_origins,
            vec!["http://localhost:8080", "http://localhost:8081"]
        );
        assert!(cfg.allow_anon_key_in_dev);
        assert_eq!(cfg.environment, "development");
        assert_eq!(cfg.timezone, Tz::UTC);
        assert_eq!(cfg.key_role.as_deref(), Some("service_role"));
        assert!(cfg.verify_key_role().is_ok());
    }

    #[test]
    fn test_missing_url_or_key_is_fatal() {
        assert!(matches!(
            config(&[("SUPABASE_SERVICE_KEY", "k")]),
            Err(ConfigError::MissingStoreUrl)
        ));
        assert!(matches!(
            config(&[("SUPABASE_URL", "https://x"), ("SUPABASE_SERVICE_KEY", "  ")]),
            Err(ConfigError::MissingStoreKey)
        ));

        let message = ConfigError::MissingStoreKey.to_string();
        assert!(KEY_VARS.iter().all(|name| message.contains(name)));
    }

    #[test]
    fn test_key_fallback_order() {
        let cfg = config(&[
            ("SUPABASE_URL", "https://x"),
            ("SUPABASE_SECRET_KEY", "secret"),
            ("SUPABASE_ANON_KEY", "anon"),
        ])
        .unwrap();
        assert_eq!(cfg.store_key, "secret");
        assert!(cfg.key_role.is_none());
    }

    #[test]
    fn test_anon_key_tolerated_only_in_dev() {
        let anon = jwt_with_role("anon");
        let dev = config(&[("SUPABASE_URL", "https://x"), ("SUPABASE_ANON_KEY", &anon)]).unwrap();
        assert_eq!(dev.key_role_label(), "anon");
        assert!(dev.verify_key_role().is_ok());

        let prod = config(&[
            ("SUPABASE_URL", "https://x"),
            ("SUPABASE_ANON_KEY", &anon),
            ("NODE_ENV", "production"),
        ])
        .unwrap();
        assert!(matches!(
            prod.verify_key_role(),
            Err(ConfigError::KeyRole { role }) if role == "anon"
        ));

        let strict = config(&[
            ("SUPABASE_URL", "https://x"),
            ("SUPABASE_ANON_KEY", "not-a-jwt"),
            ("ALLOW_ANON_KEY_IN_DEV", "false"),
        ])
        .unwrap();
        assert!(matches!(
            strict.verify_key_role(),
            Err(ConfigError::KeyRole { role }) if role == "unknown"
        ));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config(&[("SUPABASE_URL", "https://x"), ("SUPABASE_SERVICE_KEY", "k"), ("PORT", "http")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
        assert!(matches!(
            config(&[
                ("SUPABASE_URL", "https://x"),
                ("SUPABASE_SERVICE_KEY", "k"),
                ("BUSINESS_TIMEZONE", "Mars/Olympus"),
            ]),
            Err(ConfigError::Invalid { name: "BUSINESS_TIMEZONE", .. })
        ));

        let cfg = config(&[
            ("SUPABASE_URL", "https://x"),
            ("SUPABASE_SERVICE_KEY", "k"),
            ("BUSINESS_TIMEZONE", "America/Mexico_City"),
            ("CORS_ORIGINS", " https://floor.example , ,"),
        ])
        .unwrap();
        assert_eq!(cfg.timezone, chrono_tz::America::Mexico_City);
        assert_eq!(cfg.cors_origins, vec!["https://floor.example"]);
    }
}
