//! Server configuration

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string; `None` runs on the in-memory store
    pub database_url: Option<String>,
    pub bind_address: String,
    pub cors_origins: Vec<String>,
    /// Load the demo patients into an empty store at startup
    pub seed_demo_data: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".into()),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| vec!["*".to_string()]),
            seed_demo_data: lookup("SEED_DEMO_DATA")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]);
        assert_eq!(config.database_url, None);
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.cors_origins, vec!["*"]);
        assert!(config.seed_demo_data);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://u:p@db/registry"),
            ("BIND_ADDRESS", "127.0.0.1:3000"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("SEED_DEMO_DATA", "false"),
        ]);
        assert_eq!(config.database_url.as_deref(), Some("postgres://u:p@db/registry"));
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn blank_database_url_means_memory_store() {
        assert_eq!(config_from(&[("DATABASE_URL", "  ")]).database_url, None);
    }
}
