use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub ml: MlConfig,
    pub monitor: MonitorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON key-value store file
    #[serde(default = "default_store_path")]
    pub path: String,

    /// Directory where the platform bridge drops per-day usage
    /// snapshots as `YYYY-MM-DD.json`
    #[serde(default = "default_usage_path")]
    pub usage_path: String,

    /// Spool directory for outgoing notifications
    #[serde(default = "default_notify_path")]
    pub notify_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MlConfig {
    /// Base URL of the remote analysis service
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_ml_timeout_ms")]
    pub timeout_ms: u64,

    /// Whether remote analysis is enabled; when disabled the local
    /// fallback classifier is always used
    #[serde(default = "default_ml_enabled")]
    pub enabled: bool,

    /// Days of history sent for analysis
    #[serde(default = "default_history_days")]
    pub history_days: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Watchtime poll interval in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Goal-sync interval in seconds
    #[serde(default = "default_sync_interval")]
    pub sync_interval_secs: u64,

    /// Daily screen-time goal in minutes used for status bucketing
    #[serde(default = "default_goal_minutes")]
    pub goal_minutes: i64,

    /// Below this many minutes of usage a poll records nothing
    #[serde(default = "default_min_usage_minutes")]
    pub min_usage_minutes: i64,

    /// Re-notify for an unchanged status only after this many minutes
    #[serde(default = "default_cooldown_minutes")]
    pub notification_cooldown_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_store_path() -> String {
    "data/wellbeing-store.json".to_string()
}
fn default_usage_path() -> String {
    "data/usage".to_string()
}
fn default_notify_path() -> String {
    "data/notifications".to_string()
}
fn default_ml_timeout_ms() -> u64 {
    10_000
}
fn default_ml_enabled() -> bool {
    true
}
fn default_history_days() -> u32 {
    14
}
fn default_poll_interval() -> u64 {
    60
}
fn default_sync_interval() -> u64 {
    300
}
fn default_goal_minutes() -> i64 {
    180
}
fn default_min_usage_minutes() -> i64 {
    10
}
fn default_cooldown_minutes() -> i64 {
    120
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with WM__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("WM").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Sanity-checks values the serde defaults cannot enforce.
    pub fn validate(&self) -> Result<(), String> {
        if self.ml.enabled && self.ml.base_url.trim().is_empty() {
            return Err("ml.base_url must be set when ml.enabled is true".to_string());
        }
        if self.monitor.goal_minutes <= 0 {
            return Err("monitor.goal_minutes must be positive".to_string());
        }
        if self.monitor.poll_interval_secs == 0 || self.monitor.sync_interval_secs == 0 {
            return Err("monitor intervals must be positive".to_string());
        }
        Ok(())
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds entirely from embedded defaults and overrides, without
    /// relying on config files.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [storage]
            path = "data/test-store.json"
            usage_path = "data/test-usage"
            notify_path = "data/test-notifications"

            [ml]
            base_url = "http://localhost:9999"
            timeout_ms = 1000
            enabled = true
            history_days = 14

            [monitor]
            poll_interval_secs = 60
            sync_interval_secs = 300
            goal_minutes = 180
            min_usage_minutes = 10
            notification_cooldown_minutes = 120

            [logging]
            level = "debug"
            format = "pretty"
        "#;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            defaults,
            config::FileFormat::Toml,
        ));
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_for_test_defaults() {
        let cfg = Config::load_for_test(&[]).unwrap();
        assert_eq!(cfg.monitor.goal_minutes, 180);
        assert_eq!(cfg.monitor.min_usage_minutes, 10);
        assert_eq!(cfg.monitor.notification_cooldown_minutes, 120);
        assert!(cfg.ml.enabled);
    }

    #[test]
    fn test_override_applies() {
        let cfg = Config::load_for_test(&[("monitor.poll_interval_secs", "900")]).unwrap();
        assert_eq!(cfg.monitor.poll_interval_secs, 900);
    }

    #[test]
    fn test_validate_rejects_empty_ml_url_when_enabled() {
        let err = Config::load_for_test(&[("ml.base_url", "")]).unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_validate_allows_empty_url_when_disabled() {
        let cfg =
            Config::load_for_test(&[("ml.base_url", ""), ("ml.enabled", "false")]).unwrap();
        assert!(!cfg.ml.enabled);
    }

    #[test]
    fn test_validate_rejects_zero_intervals() {
        assert!(Config::load_for_test(&[("monitor.poll_interval_secs", "0")]).is_err());
        assert!(Config::load_for_test(&[("monitor.goal_minutes", "0")]).is_err());
    }
}
