//! Runtime configuration.
//!
//! Loaded from YAML; durations are written human-readably ("1s", "1500ms").
//!
//! ```yaml
//! typing_delay:
//!   min: 1s
//!   max: 2s
//! greeting: "Hello! How can I help?"
//! transcript_limit: 200
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading runtime configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid typing delay: min {min:?} exceeds max {max:?}")]
    InvalidDelay { min: Duration, max: Duration },

    #[error("Invalid transcript limit: must keep at least one message")]
    InvalidTranscriptLimit,
}

/// Opening message of every chat session.
pub const DEFAULT_GREETING: &str =
    "Hello! I'm your IAM validation assistant. How can I help you today?";

/// Bounds of the simulated "assistant is typing" pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingDelay {
    #[serde(with = "duration_human")]
    pub min: Duration,

    #[serde(with = "duration_human")]
    pub max: Duration,
}

impl TypingDelay {
    pub fn new(min: Duration, max: Duration) -> Result<Self, ConfigError> {
        let delay = Self { min, max };
        delay.validate()?;
        Ok(delay)
    }

    /// A fixed pause.
    pub fn fixed(duration: Duration) -> Self {
        Self {
            min: duration,
            max: duration,
        }
    }

    /// No pause at all.
    pub fn none() -> Self {
        Self::fixed(Duration::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.max.is_zero()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidDelay {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl Default for TypingDelay {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(1000),
            max: Duration::from_millis(2000),
        }
    }
}

/// Configuration for chat sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub typing_delay: TypingDelay,

    /// First bot message of a new session
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Oldest messages are dropped beyond this many (None = unbounded)
    #[serde(default)]
    pub transcript_limit: Option<usize>,
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            typing_delay: TypingDelay::default(),
            greeting: default_greeting(),
            transcript_limit: None,
        }
    }
}

impl RuntimeConfig {
    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = serde_yaml::from_str(yaml)?;
        config.typing_delay.validate()?;
        if config.transcript_limit == Some(0) {
            return Err(ConfigError::InvalidTranscriptLimit);
        }
        Ok(config)
    }

    /// Parse configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }
}

mod duration_human {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(text.trim()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.typing_delay.min, Duration::from_secs(1));
        assert_eq!(config.typing_delay.max, Duration::from_secs(2));
        assert_eq!(config.greeting, DEFAULT_GREETING);
        assert!(config.transcript_limit.is_none());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
typing_delay:
  min: 250ms
  max: 1s 500ms
greeting: "Hi there"
transcript_limit: 50
"#;
        let config = RuntimeConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.typing_delay.min, Duration::from_millis(250));
        assert_eq!(config.typing_delay.max, Duration::from_millis(1500));
        assert_eq!(config.greeting, "Hi there");
        assert_eq!(config.transcript_limit, Some(50));
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = RuntimeConfig::from_yaml("{}").unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_inverted_delay_rejected() {
        let yaml = r#"
typing_delay:
  min: 3s
  max: 1s
"#;
        let result = RuntimeConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigError::InvalidDelay { .. })));
    }

    #[test]
    fn test_zero_transcript_limit_rejected() {
        assert!(matches!(
            RuntimeConfig::from_yaml("transcript_limit: 0"),
            Err(ConfigError::InvalidTranscriptLimit)
        ));
    }

    #[test]
    fn test_bad_duration_rejected() {
        let yaml = r#"
typing_delay:
  min: soon
  max: 1s
"#;
        assert!(matches!(
            RuntimeConfig::from_yaml(yaml),
            Err(ConfigError::YamlError(_))
        ));
    }

    #[test]
    fn test_example_config_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/runtime.example.yaml");
        let config = RuntimeConfig::from_yaml_file(path).unwrap();
        assert_eq!(config.typing_delay, TypingDelay::default());
        assert_eq!(config.greeting, DEFAULT_GREETING);
        assert_eq!(config.transcript_limit, Some(200));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = RuntimeConfig {
            typing_delay: TypingDelay::fixed(Duration::from_millis(750)),
            greeting: "Hey".to_string(),
            transcript_limit: Some(10),
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("750ms"));
        assert_eq!(RuntimeConfig::from_yaml(&yaml).unwrap(), config);
    }
}
