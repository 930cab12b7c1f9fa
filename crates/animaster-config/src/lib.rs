//! Animaster configuration system
//!
//! This crate provides configuration for the animaster demo shell, loading
//! settings from `animaster.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "animaster.toml";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid trigger entry `{0}`, expected `<at_ms>:<trigger>`")]
    InvalidTrigger(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnimasterConfig {
    /// Clock and run-length settings
    pub playback: PlaybackConfig,
    /// Scripted trigger timeline and recipe parameters
    pub demo: DemoConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

/// Playback clock configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Sleep between timer deadlines instead of running in virtual time
    pub realtime: bool,
    /// Wall-clock multiplier in realtime mode (0.5 runs twice as fast)
    pub time_scale: f64,
    /// Stop the run after this many milliseconds of animation time
    pub run_for_ms: f64,
}

/// One scripted trigger: fire `trigger` at `at_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub at_ms: f64,
    pub trigger: String,
}

impl TriggerEvent {
    pub fn new(at_ms: f64, trigger: impl Into<String>) -> Self {
        Self {
            at_ms,
            trigger: trigger.into(),
        }
    }
}

/// Parameters of the one-shot and composite recipes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeDurations {
    pub fade_ms: f64,
    pub move_ms: f64,
    pub move_x: f64,
    pub move_y: f64,
    pub scale_ms: f64,
    pub scale_ratio: f64,
    pub show_and_hide_ms: f64,
    pub move_and_hide_ms: f64,
}

/// Demo shell configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Trigger timeline, fired in `at_ms` order
    pub events: Vec<TriggerEvent>,
    pub durations: RecipeDurations,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// env_logger filter string (e.g. "info,animaster_core=debug"); RUST_LOG wins if unset
    pub filter: Option<String>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            realtime: false,
            time_scale: 1.0,
            run_for_ms: 6000.0,
        }
    }
}

impl Default for RecipeDurations {
    fn default() -> Self {
        Self {
            fade_ms: 2000.0,
            move_ms: 1000.0,
            move_x: 100.0,
            move_y: 10.0,
            scale_ms: 1000.0,
            scale_ratio: 1.25,
            show_and_hide_ms: 3000.0,
            move_and_hide_ms: 3000.0,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            events: vec![
                TriggerEvent::new(0.0, "fade-in"),
                TriggerEvent::new(0.0, "move"),
                TriggerEvent::new(0.0, "scale"),
                TriggerEvent::new(0.0, "show-and-hide"),
                TriggerEvent::new(0.0, "move-and-hide"),
                TriggerEvent::new(0.0, "heart-beating"),
                TriggerEvent::new(2500.0, "fade-out"),
                TriggerEvent::new(3200.0, "heart-beating-stop"),
                TriggerEvent::new(4000.0, "move-and-hide-reset"),
            ],
            durations: RecipeDurations::default(),
        }
    }
}

/// Parse a comma-separated `<at_ms>:<trigger>` list, e.g. `0:heart-beating,2500:heart-beating-stop`.
pub fn parse_trigger_list(list: &str) -> Result<Vec<TriggerEvent>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (at, trigger) = entry
                .split_once(':')
                .ok_or_else(|| ConfigError::InvalidTrigger(entry.to_string()))?;
            let at_ms = at
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidTrigger(entry.to_string()))?;
            let trigger = trigger.trim();
            if trigger.is_empty() {
                return Err(ConfigError::InvalidTrigger(entry.to_string()));
            }
            Ok(TriggerEvent::new(at_ms, trigger))
        })
        .collect()
}

fn env_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl AnimasterConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from `animaster.toml` in the current directory,
    /// or return the default configuration if the file doesn't exist or is invalid
    pub fn load_or_default() -> Self {
        Self::load_from_file(CONFIG_FILE).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Values that fail to parse are ignored.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("ANIMASTER_REALTIME") {
            self.playback.realtime = env_flag(&val);
        }
        if let Ok(val) = std::env::var("ANIMASTER_TIME_SCALE") {
            if let Ok(scale) = val.parse::<f64>() {
                self.playback.time_scale = scale;
            }
        }
        if let Ok(val) = std::env::var("ANIMASTER_RUN_FOR_MS") {
            if let Ok(ms) = val.parse::<f64>() {
                self.playback.run_for_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("ANIMASTER_TRIGGERS") {
            if let Ok(events) = parse_trigger_list(&val) {
                self.demo.events = events;
            }
        }
        if let Ok(filter) = std::env::var("ANIMASTER_LOG") {
            self.logging.filter = Some(filter);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from animaster.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Trigger timeline sorted by `at_ms`, keeping file order for equal times.
    pub fn sorted_events(&self) -> Vec<TriggerEvent> {
        let mut events = self.demo.events.clone();
        events.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnimasterConfig::default();
        assert!(!config.playback.realtime);
        assert_eq!(config.playback.time_scale, 1.0);
        assert_eq!(config.demo.durations.fade_ms, 2000.0);
        assert_eq!(config.demo.events.len(), 9);
        assert!(config.logging.filter.is_none());
    }

    #[test]
    fn test_toml_serialization() {
        let config = AnimasterConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AnimasterConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.demo.events, config.demo.events);
        assert_eq!(parsed.playback.run_for_ms, 6000.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: AnimasterConfig = toml::from_str(
            r#"
            [playback]
            realtime = true

            [[demo.events]]
            at_ms = 100
            trigger = "heart-beating"
            "#,
        )
        .unwrap();
        assert!(parsed.playback.realtime);
        assert_eq!(parsed.playback.time_scale, 1.0);
        assert_eq!(parsed.demo.events, vec![TriggerEvent::new(100.0, "heart-beating")]);
        assert_eq!(parsed.demo.durations.scale_ratio, 1.25);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = AnimasterConfig::load_from_file("definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_or_default() {
        // Should not panic even if animaster.toml doesn't exist
        let config = AnimasterConfig::load_or_default();
        assert!(config.playback.time_scale > 0.0);
    }

    #[test]
    fn test_parse_trigger_list() {
        let events = parse_trigger_list("0:heart-beating, 2500 : heart-beating-stop,").unwrap();
        assert_eq!(
            events,
            vec![
                TriggerEvent::new(0.0, "heart-beating"),
                TriggerEvent::new(2500.0, "heart-beating-stop"),
            ]
        );
        assert!(matches!(
            parse_trigger_list("soon:fade-in"),
            Err(ConfigError::InvalidTrigger(_))
        ));
        assert!(parse_trigger_list("10:").is_err());
        assert!(parse_trigger_list("fade-in").is_err());
    }

    #[test]
    fn test_sorted_events_is_stable() {
        let mut config = AnimasterConfig::default();
        config.demo.events = vec![
            TriggerEvent::new(50.0, "b"),
            TriggerEvent::new(0.0, "a"),
            TriggerEvent::new(50.0, "c"),
        ];
        let order: Vec<_> = config
            .sorted_events()
            .into_iter()
            .map(|e| e.trigger)
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("ANIMASTER_REALTIME", "true");
            std::env::set_var("ANIMASTER_TIME_SCALE", "0.25");
            std::env::set_var("ANIMASTER_TRIGGERS", "0:scale");
        }

        let mut config = AnimasterConfig::default();
        config.merge_with_env();

        assert!(config.playback.realtime);
        assert_eq!(config.playback.time_scale, 0.25);
        assert_eq!(config.demo.events, vec![TriggerEvent::new(0.0, "scale")]);

        unsafe {
            std::env::remove_var("ANIMASTER_REALTIME");
            std::env::remove_var("ANIMASTER_TIME_SCALE");
            std::env::remove_var("ANIMASTER_TRIGGERS");
        }
    }
}
