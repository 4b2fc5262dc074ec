//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Timer presets and extension length
//! - Survey endpoint and enablement
//! - Engagement toggles
//!
//! Configuration is stored at `<data dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::survey::DEFAULT_SURVEY_ENDPOINT;
use crate::timer::SUGGESTED_MAX_MINUTES;

/// Timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Durations offered by the selection UI, in minutes.
    #[serde(default = "default_presets")]
    pub presets: Vec<u64>,
    /// Soft cap shown in the UI; longer sessions still work.
    #[serde(default = "default_suggested_max")]
    pub suggested_max_minutes: u64,
    /// Default extension applied from the completion dialog.
    #[serde(default = "default_extend_minutes")]
    pub extend_minutes: u64,
}

/// Anonymous survey configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_survey_endpoint")]
    pub endpoint: String,
}

/// Engagement configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementConfig {
    /// Disable to suppress milestone celebrations entirely.
    #[serde(default = "default_true")]
    pub celebrations: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub survey: SurveyConfig,
    #[serde(default)]
    pub engagement: EngagementConfig,
}

// Default functions
fn default_presets() -> Vec<u64> {
    vec![5, 15, 30, 60]
}
fn default_suggested_max() -> u64 {
    SUGGESTED_MAX_MINUTES
}
fn default_extend_minutes() -> u64 {
    5
}
fn default_true() -> bool {
    true
}
fn default_survey_endpoint() -> String {
    DEFAULT_SURVEY_ENDPOINT.to_string()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            presets: default_presets(),
            suggested_max_minutes: default_suggested_max(),
            extend_minutes: default_extend_minutes(),
        }
    }
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_survey_endpoint(),
        }
    }
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self { celebrations: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            survey: SurveyConfig::default(),
            engagement: EngagementConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err("config key is empty".into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| format!("unknown config key: {key}"))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| format!("unknown config key: {key}"))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>()?),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(format!("cannot parse '{value}' as number").into());
                        }
                    }
                    serde_json::Value::Array(_) => serde_json::from_str(value)?,
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| format!("unknown config key: {key}"))?;
        }

        Err(format!("unknown config key: {key}").into())
    }

    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, returning the default on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        self.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.extend_minutes, 5);
        assert!(parsed.survey.enabled);
        assert_eq!(parsed.timer.presets, vec![5, 15, 30, 60]);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("survey.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("timer.extend_minutes").as_deref(), Some("5"));
        assert!(cfg.get("timer.missing_key").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_bool() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "engagement.celebrations", "false").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "engagement.celebrations").unwrap(),
            &serde_json::Value::Bool(false)
        );
    }

    #[test]
    fn set_json_value_by_path_updates_array() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "timer.presets", "[10, 20]").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "timer.presets").unwrap(),
            &serde_json::json!([10, 20])
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        assert!(Config::set_json_value_by_path(&mut json, "timer.nonexistent", "1").is_err());
        assert!(Config::set_json_value_by_path(&mut json, "survey.enabled", "not_a_bool").is_err());
    }

    #[test]
    fn default_survey_endpoint_is_set() {
        let cfg = Config::default();
        assert!(cfg.survey.endpoint.starts_with("https://"));
    }
}
