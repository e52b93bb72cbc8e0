use serde::Deserialize;

/// Deployment environment, read from `APP_ENV`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Service configuration, loaded from environment variables
///
/// Variable names are the upper-cased field names (`DATABASE_URL`,
/// `JWT_SECRET`, ...). `ALLOWED_ORIGINS` is a comma-separated list.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    pub database_url: String,
    pub jwt_secret: String,
    #[serde(default, rename = "app_env")]
    pub env: Environment,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// JSON curriculum to use instead of the bundled one
    #[serde(default)]
    pub curriculum_path: Option<String>,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    /// Sessions untouched for longer than this are dropped
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: i64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_db_max_connections() -> u32 {
    10
}

const fn default_session_idle_minutes() -> i64 {
    720
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_config_defaults() {
        let config: ApiConfig = envy::from_iter(vars(&[
            ("DATABASE_URL", "postgres://localhost/aps"),
            ("JWT_SECRET", "secret"),
        ]))
        .expect("Failed to load config");

        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert!(config.allowed_origins.is_empty());
        assert!(config.curriculum_path.is_none());
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.session_idle_minutes, 720);
    }

    #[test]
    fn test_config_overrides() {
        let config: ApiConfig = envy::from_iter(vars(&[
            ("DATABASE_URL", "postgres://localhost/aps"),
            ("JWT_SECRET", "secret"),
            ("APP_ENV", "production"),
            ("PORT", "8081"),
            ("ALLOWED_ORIGINS", "http://a.test,http://b.test"),
            ("SESSION_IDLE_MINUTES", "30"),
        ]))
        .expect("Failed to load config");

        assert!(config.env.is_production());
        assert_eq!(config.port, 8081);
        assert_eq!(config.allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.session_idle_minutes, 30);
    }

    #[test]
    fn test_config_requires_database_url() {
        let result: Result<ApiConfig, _> = envy::from_iter(vars(&[("JWT_SECRET", "secret")]));
        assert!(result.is_err());
    }
}
