//! Configuration module
//!
//! Resolves the backend base URL and intake limits from the environment.
//! In production the client talks to its own origin; everywhere else it falls back to
//! the local development backend.

use std::env;

/// Local development backend.
pub const DEV_BASE_URL: &str = "http://127.0.0.1:8000";

const MAX_FILE_SIZE_MB: u64 = 10;

/// Client configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub environment: String,
    pub base_url: String,
    pub max_file_size_mb: u64,
    /// `None` means requests never time out.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            base_url: DEV_BASE_URL.to_string(),
            max_file_size_mb: MAX_FILE_SIZE_MB,
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Load from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let base_url = resolve_base_url(
            is_production_env(&environment),
            lookup("SHOPVISION_API_URL").as_deref(),
            lookup("SHOPVISION_ORIGIN").as_deref(),
        )?;

        let max_file_size_mb = match lookup("SHOPVISION_MAX_FILE_SIZE_MB") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                anyhow::anyhow!("Invalid SHOPVISION_MAX_FILE_SIZE_MB '{}': {}", raw, e)
            })?,
            None => MAX_FILE_SIZE_MB,
        };

        let request_timeout_secs = match lookup("SHOPVISION_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    anyhow::anyhow!("Invalid SHOPVISION_REQUEST_TIMEOUT_SECS '{}': {}", raw, e)
                })?;
                (secs > 0).then_some(secs)
            }
            None => None,
        };

        Ok(Self {
            environment,
            base_url,
            max_file_size_mb,
            request_timeout_secs,
        })
    }

    /// Check if the client is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.environment)
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid base URL '{}': {}", self.base_url, e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow::anyhow!(
                "Base URL must use http or https, got '{}'",
                parsed.scheme()
            ));
        }
        if self.max_file_size_mb == 0 {
            return Err(anyhow::anyhow!("SHOPVISION_MAX_FILE_SIZE_MB must be at least 1"));
        }
        Ok(())
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

/// Pick the backend base URL.
///
/// An explicit override always wins. Otherwise production targets the client's own origin
/// and every other environment targets [`DEV_BASE_URL`].
pub fn resolve_base_url(
    production: bool,
    explicit: Option<&str>,
    origin: Option<&str>,
) -> Result<String, anyhow::Error> {
    let url = match (explicit, production) {
        (Some(url), _) => url,
        (None, true) => origin.ok_or_else(|| {
            anyhow::anyhow!("SHOPVISION_ORIGIN must be set in production (or set SHOPVISION_API_URL)")
        })?,
        (None, false) => DEV_BASE_URL,
    };
    Ok(url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_local_backend() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(!config.is_production());
        assert_eq!(config.max_file_size_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn production_uses_own_origin() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "Production"),
            ("SHOPVISION_ORIGIN", "https://vision.example.com/"),
        ]))
        .unwrap();
        assert!(config.is_production());
        assert_eq!(config.base_url, "https://vision.example.com");
    }

    #[test]
    fn production_without_origin_is_an_error() {
        let result = ClientConfig::from_lookup(lookup_from(&[("APP_ENV", "prod")]));
        assert!(result.is_err());
    }

    #[test]
    fn explicit_url_overrides_environment() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "production"),
            ("SHOPVISION_ORIGIN", "https://vision.example.com"),
            ("SHOPVISION_API_URL", "http://10.0.0.5:9000"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:9000");
    }

    #[test]
    fn huge_size_limit_does_not_overflow() {
        let config = ClientConfig::from_lookup(lookup_from(&[(
            "SHOPVISION_MAX_FILE_SIZE_MB",
            "18446744073709551615",
        )]))
        .unwrap();
        assert_eq!(config.max_file_size_mb, u64::MAX);
        assert_eq!(config.max_file_size_bytes(), u64::MAX);
    }

    #[test]
    fn timeout_zero_means_none() {
        let config = ClientConfig::from_lookup(lookup_from(&[(
            "SHOPVISION_REQUEST_TIMEOUT_SECS",
            "0",
        )]))
        .unwrap();
        assert_eq!(config.request_timeout_secs, None);

        let config = ClientConfig::from_lookup(lookup_from(&[(
            "SHOPVISION_REQUEST_TIMEOUT_SECS",
            "30",
        )]))
        .unwrap();
        assert_eq!(config.request_timeout_secs, Some(30));
    }

    #[test]
    fn rejects_bad_numbers_and_schemes() {
        assert!(
            ClientConfig::from_lookup(lookup_from(&[("SHOPVISION_MAX_FILE_SIZE_MB", "ten")]))
                .is_err()
        );

        let config = ClientConfig {
            base_url: "ftp://example.com".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(ClientConfig::default().validate().is_ok());
    }
}
