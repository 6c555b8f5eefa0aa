use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub appwrite: AppwriteSettings,
    pub collection: CollectionSettings,
    pub classifier: ClassifierSettings,
    pub tips: TipsSettings,
    pub location: LocationSettings,
    #[serde(default)]
    pub rewards: RewardsSettings,
    #[serde(default)]
    pub leaderboard: LeaderboardSettings,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub users: String,
    pub food_alerts: String,
    pub food_requests: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierSettings {
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TipsSettings {
    pub endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationSettings {
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewardsSettings {
    #[serde(default = "default_points_per_donation")]
    pub points_per_donation: u32,
}

impl Default for RewardsSettings {
    fn default() -> Self {
        Self {
            points_per_donation: default_points_per_donation(),
        }
    }
}

fn default_points_per_donation() -> u32 { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardSettings {
    #[serde(default = "default_leaderboard_limit")]
    pub limit: usize,
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            limit: default_leaderboard_limit(),
        }
    }
}

fn default_leaderboard_limit() -> usize { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with NOURISH_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with NOURISH_)
            // e.g., NOURISH_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("NOURISH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("NOURISH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply well-known environment overrides for secrets that are usually
/// injected directly rather than via the NOURISH__ scheme
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let appwrite_endpoint = env::var("NOURISH_APPWRITE__ENDPOINT").ok();
    let appwrite_api_key = env::var("APPWRITE_API_KEY")
        .or_else(|_| env::var("NOURISH_APPWRITE__API_KEY"))
        .ok();
    let appwrite_project_id = env::var("NOURISH_APPWRITE__PROJECT_ID").ok();
    let appwrite_database_id = env::var("NOURISH_APPWRITE__DATABASE_ID").ok();
    let tips_api_key = env::var("TIPS_API_KEY")
        .or_else(|_| env::var("NOURISH_TIPS__API_KEY"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(endpoint) = appwrite_endpoint {
        builder = builder.set_override("appwrite.endpoint", endpoint)?;
    }
    if let Some(api_key) = appwrite_api_key {
        builder = builder.set_override("appwrite.api_key", api_key)?;
    }
    if let Some(project_id) = appwrite_project_id {
        builder = builder.set_override("appwrite.project_id", project_id)?;
    }
    if let Some(database_id) = appwrite_database_id {
        builder = builder.set_override("appwrite.database_id", database_id)?;
    }
    if let Some(api_key) = tips_api_key {
        builder = builder.set_override("tips.api_key", api_key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rewards() {
        let rewards = RewardsSettings::default();
        assert_eq!(rewards.points_per_donation, 100);
    }

    #[test]
    fn test_default_leaderboard_limit() {
        let leaderboard = LeaderboardSettings::default();
        assert_eq!(leaderboard.limit, 5);
    }

    #[test]
    fn test_default_http_timeout() {
        let http = HttpSettings::default();
        assert_eq!(http.timeout_secs, 30);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }
}
