//! T2D Configuration Management
//!
//! Handles configuration from environment variables and TOML files,
//! with defaults suitable for local use.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{ExtractionMode, OutputFormat};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Labeling pipeline configuration
    pub pipeline: PipelineConfig,

    /// Primary recognizer configuration
    pub recognizer: RecognizerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        self.apply_env()?;
        Ok(self)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        // Pipeline
        if let Ok(mode) = std::env::var("T2D_MODE") {
            self.pipeline.mode = mode.parse()?;
        }
        if let Ok(format) = std::env::var("T2D_OUTPUT_FORMAT") {
            self.pipeline.output_format = format.parse()?;
        }
        if let Ok(segmenter) = std::env::var("T2D_SEGMENTER") {
            self.pipeline.segmenter = segmenter.parse()?;
        }
        if let Ok(fallback) = std::env::var("T2D_FALLBACK") {
            self.pipeline.fallback = fallback.parse()?;
        }
        if let Ok(max) = std::env::var("MAX_TEXT_LENGTH") {
            self.pipeline.max_text_length = parse_number("MAX_TEXT_LENGTH", max)?;
        }

        // Recognizer
        if let Ok(path) = std::env::var("T2D_GAZETTEER") {
            self.recognizer.gazetteer_path = Some(PathBuf::from(path));
        }
        if let Ok(max) = std::env::var("T2D_RECOGNIZER_MAX_CHARS") {
            self.recognizer.max_input_chars = parse_number("T2D_RECOGNIZER_MAX_CHARS", max)?;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            self.logging.json_format = format.eq_ignore_ascii_case("json");
        }

        Ok(())
    }
}

fn parse_number(key: &str, value: String) -> Result<usize, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

/// Labeling pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Extraction strategy
    pub mode: ExtractionMode,

    /// Dataset output format
    pub output_format: OutputFormat,

    /// Sentence boundary detection
    pub segmenter: SegmenterKind,

    /// What to emit when the recognizer cannot handle a sentence
    pub fallback: FallbackPolicy,

    /// Maximum accepted input length (characters)
    pub max_text_length: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::Fast,
            output_format: OutputFormat::Csv,
            segmenter: SegmenterKind::Unicode,
            fallback: FallbackPolicy::Patterns,
            max_text_length: 1_000_000,
        }
    }
}

/// Sentence boundary strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmenterKind {
    /// Unicode (UAX #29) sentence boundaries, punctuation split on failure
    Unicode,
    /// Punctuation split only
    Punctuation,
}

impl std::str::FromStr for SegmenterKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unicode" => Ok(Self::Unicode),
            "punctuation" => Ok(Self::Punctuation),
            _ => Err(ConfigError::InvalidValue {
                key: "T2D_SEGMENTER".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Output for sentences the recognizer could not process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Regex date/email/phone/money patterns
    Patterns,
    /// The entire sentence labeled `SENTENCE`
    WholeSentence,
}

impl std::str::FromStr for FallbackPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "patterns" => Ok(Self::Patterns),
            "whole_sentence" | "sentence" => Ok(Self::WholeSentence),
            _ => Err(ConfigError::InvalidValue {
                key: "T2D_FALLBACK".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Primary recognizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Gazetteer model file; `None` runs on fallback patterns only
    pub gazetteer_path: Option<PathBuf>,

    /// Sentences longer than this (characters) are rejected by the recognizer
    pub max_input_chars: usize,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            gazetteer_path: None,
            max_input_chars: 10_000,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.pipeline.mode, ExtractionMode::Fast);
        assert_eq!(config.pipeline.output_format, OutputFormat::Csv);
        assert_eq!(config.pipeline.segmenter, SegmenterKind::Unicode);
        assert_eq!(config.pipeline.fallback, FallbackPolicy::Patterns);
        assert!(config.recognizer.gazetteer_path.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_enum_parse() {
        assert_eq!(
            "punctuation".parse::<SegmenterKind>().unwrap(),
            SegmenterKind::Punctuation
        );
        assert_eq!(
            "whole-sentence".parse::<FallbackPolicy>().unwrap(),
            FallbackPolicy::WholeSentence
        );
        assert!("nltk".parse::<SegmenterKind>().is_err());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[pipeline]
mode = "smart"
output_format = "spacy"
fallback = "whole_sentence"

[recognizer]
gazetteer_path = "models/gazetteer.json"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.pipeline.mode, ExtractionMode::Smart);
        assert_eq!(config.pipeline.output_format, OutputFormat::Spacy);
        assert_eq!(config.pipeline.fallback, FallbackPolicy::WholeSentence);
        // Unset keys keep their defaults
        assert_eq!(config.pipeline.max_text_length, 1_000_000);
        assert_eq!(config.recognizer.max_input_chars, 10_000);
        assert_eq!(
            config.recognizer.gazetteer_path,
            Some(PathBuf::from("models/gazetteer.json"))
        );
    }

    #[test]
    fn test_from_file_missing() {
        let err = AppConfig::from_file("/nonexistent/t2d.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileReadError { .. }));
    }

    #[test]
    fn test_from_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pipeline]\nmode = \"turbo\"").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
