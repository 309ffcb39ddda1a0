//! Application configuration loaded from environment variables.

use std::env;

use folio_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| DatabaseConfig {
                url,
                max_connections: lookup("DB_MAX_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(100),
                min_connections: lookup("DB_MIN_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            });

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .filter(|&p: &u16| p > 0)
                .unwrap_or(8080),
            database,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config(&[]);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.database.is_none());
    }

    #[test]
    fn invalid_port_falls_back() {
        assert_eq!(config(&[("PORT", "0")]).port, 8080);
        assert_eq!(config(&[("PORT", "http")]).port, 8080);
        assert_eq!(config(&[("PORT", "3000")]).port, 3000);
    }

    #[test]
    fn database_pool_sizes() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/folio"),
            ("DB_MAX_CONNECTIONS", "5"),
        ]);
        let db = config.database.unwrap();
        assert_eq!(db.max_connections, 5);
        assert_eq!(db.min_connections, 10);
    }
}
