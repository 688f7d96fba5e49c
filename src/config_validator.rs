// Configuration validation module for the Whisper uploader
//
// This module validates every configuration parameter and environment
// variable up front, with clear, actionable error messages.
//
// The validation system is schema-driven: a central parameter registry
// defines validation rules, defaults and constraints for every option.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use log::{error, info, warn};

use crate::config::{defaults, optional_secs, ClientConfig};
use crate::form::placeholder_default;

/// Numeric kind of the default carried by a placeholder hint
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HintKind {
    Float,
    Integer,
}

/// Configuration parameter types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigType {
    String,
    UnsignedInteger,
    Url,
    Enum(&'static [&'static str]),
    Hint(HintKind),
}

/// Validation severity levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidationLevel {
    Critical, // Must be valid for the client to run
    Standard, // Important but the client can run with defaults
    Warning,  // Optional, generates warnings only
}

/// Configuration parameter definition
#[derive(Debug, Clone)]
pub struct ConfigParam {
    pub name: &'static str,
    pub description: &'static str,
    pub param_type: ConfigType,
    pub default_value: Option<&'static str>,
    pub validation_level: ValidationLevel,
    pub min_value: Option<u64>,
    pub max_value: Option<u64>,
}

/// Centralized configuration parameter registry
pub const CONFIG_PARAMS: &[ConfigParam] = &[
    // Server Configuration
    ConfigParam {
        name: "WHISPER_UPLOADER_SERVER_URL",
        description: "Base URL of the transcription server",
        param_type: ConfigType::Url,
        default_value: Some(defaults::SERVER_URL),
        validation_level: ValidationLevel::Critical,
        min_value: None,
        max_value: None,
    },
    ConfigParam {
        name: "WHISPER_UPLOADER_REQUEST_TIMEOUT_SECONDS",
        description: "Timeout of a single status request in seconds (0 = none)",
        param_type: ConfigType::UnsignedInteger,
        default_value: Some("0"),
        validation_level: ValidationLevel::Warning,
        min_value: Some(0),
        max_value: Some(3600),
    },
    // Polling Configuration
    ConfigParam {
        name: "WHISPER_UPLOADER_POLL_INTERVAL_MS",
        description: "Interval between job status requests in milliseconds",
        param_type: ConfigType::UnsignedInteger,
        default_value: Some("5000"),
        validation_level: ValidationLevel::Standard,
        min_value: Some(10),
        max_value: Some(3_600_000),
    },
    ConfigParam {
        name: "WHISPER_UPLOADER_MAX_POLL_SECONDS",
        description: "Give up polling after this many seconds (0 = poll until the job ends)",
        param_type: ConfigType::UnsignedInteger,
        default_value: Some("0"),
        validation_level: ValidationLevel::Standard,
        min_value: Some(0),
        max_value: None,
    },
    // Upload Configuration
    ConfigParam {
        name: "WHISPER_UPLOADER_UPLOAD_CHUNK_SIZE",
        description: "Size in bytes of each streamed upload chunk",
        param_type: ConfigType::UnsignedInteger,
        default_value: Some("65536"),
        validation_level: ValidationLevel::Warning,
        min_value: Some(1024),
        max_value: Some(16_777_216),
    },
    ConfigParam {
        name: "WHISPER_UPLOADER_MODEL",
        description: "Model sent when none is given",
        param_type: ConfigType::Enum(&defaults::VALID_MODELS),
        default_value: Some(defaults::MODEL),
        validation_level: ValidationLevel::Standard,
        min_value: None,
        max_value: None,
    },
    ConfigParam {
        name: "WHISPER_UPLOADER_THRESHOLD_HINT",
        description: "Placeholder hint of the detection threshold field",
        param_type: ConfigType::Hint(HintKind::Float),
        default_value: Some(defaults::THRESHOLD_HINT),
        validation_level: ValidationLevel::Standard,
        min_value: None,
        max_value: None,
    },
    ConfigParam {
        name: "WHISPER_UPLOADER_MIN_DURATION_OFF_HINT",
        description: "Placeholder hint of the minimum silence duration field",
        param_type: ConfigType::Hint(HintKind::Float),
        default_value: Some(defaults::MIN_DURATION_OFF_HINT),
        validation_level: ValidationLevel::Standard,
        min_value: None,
        max_value: None,
    },
    ConfigParam {
        name: "WHISPER_UPLOADER_MIN_SPEAKERS_HINT",
        description: "Placeholder hint of the minimum speaker count field",
        param_type: ConfigType::Hint(HintKind::Integer),
        default_value: Some(defaults::MIN_SPEAKERS_HINT),
        validation_level: ValidationLevel::Standard,
        min_value: None,
        max_value: None,
    },
    ConfigParam {
        name: "WHISPER_UPLOADER_MAX_SPEAKERS_HINT",
        description: "Placeholder hint of the maximum speaker count field",
        param_type: ConfigType::Hint(HintKind::Integer),
        default_value: Some(defaults::MAX_SPEAKERS_HINT),
        validation_level: ValidationLevel::Standard,
        min_value: None,
        max_value: None,
    },
    // Output Configuration
    ConfigParam {
        name: "WHISPER_UPLOADER_OUTPUT_DIR",
        description: "Directory where transcript downloads are written",
        param_type: ConfigType::String,
        default_value: Some(defaults::OUTPUT_DIR),
        validation_level: ValidationLevel::Standard,
        min_value: None,
        max_value: None,
    },
];

/// Configuration validation errors with detailed context
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub value: String,
    pub error_type: ConfigErrorType,
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigErrorType {
    InvalidValue,
    InvalidFormat,
    InvalidRange,
    Inconsistent,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Configuration error in '{}' ({:?}): {} (value: '{}')",
            self.field, self.error_type, self.message, self.value
        )?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " - Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigValidationError {}

/// Result type for configuration validation
pub type ValidationResult<T> = Result<T, ConfigValidationError>;

/// Configuration validation results
#[derive(Debug, Default)]
pub struct ValidationResults {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ConfigValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ConfigValidationError) {
        self.warnings.push(warning);
    }

    fn add(&mut self, level: ValidationLevel, error: ConfigValidationError) {
        match level {
            ValidationLevel::Critical | ValidationLevel::Standard => self.add_error(error),
            ValidationLevel::Warning => self.add_warning(error),
        }
    }

    pub fn print_summary(&self) {
        if !self.errors.is_empty() {
            error!(
                "Configuration validation found {} error(s):",
                self.errors.len()
            );
            for (i, err) in self.errors.iter().enumerate() {
                error!("  {}. {}", i + 1, err);
            }
        }

        if !self.warnings.is_empty() {
            warn!(
                "Configuration validation found {} warning(s):",
                self.warnings.len()
            );
            for (i, warning) in self.warnings.iter().enumerate() {
                warn!("  {}. {}", i + 1, warning);
            }
        }

        if self.is_valid() && self.warnings.is_empty() {
            info!("Configuration validation passed successfully");
        } else if self.is_valid() {
            info!(
                "Configuration validation passed with {} warning(s)",
                self.warnings.len()
            );
        }
    }
}

/// Helper functions for common validation patterns
pub mod validators {
    use super::*;

    fn invalid(
        field: &str,
        value: &str,
        error_type: ConfigErrorType,
        message: String,
        suggestion: String,
    ) -> ConfigValidationError {
        ConfigValidationError {
            field: field.to_string(),
            value: value.to_string(),
            error_type,
            message,
            suggestion: Some(suggestion),
        }
    }

    /// Validate unsigned integer values with optional range
    pub fn validate_u64(
        field: &str,
        value: &str,
        min: Option<u64>,
        max: Option<u64>,
    ) -> ValidationResult<u64> {
        let parsed = value.trim().parse::<u64>().map_err(|_| {
            invalid(
                field,
                value,
                ConfigErrorType::InvalidFormat,
                "Invalid unsigned integer format".to_string(),
                "Use a valid positive integer number".to_string(),
            )
        })?;

        if let Some(min) = min {
            if parsed < min {
                return Err(invalid(
                    field,
                    value,
                    ConfigErrorType::InvalidRange,
                    format!("Value {} is below minimum {}", parsed, min),
                    format!("Use a value >= {}", min),
                ));
            }
        }

        if let Some(max) = max {
            if parsed > max {
                return Err(invalid(
                    field,
                    value,
                    ConfigErrorType::InvalidRange,
                    format!("Value {} is above maximum {}", parsed, max),
                    format!("Use a value <= {}", max),
                ));
            }
        }

        Ok(parsed)
    }

    /// Validate enumerated values (case-insensitive)
    pub fn validate_enum(
        field: &str,
        value: &str,
        valid_values: &[&str],
    ) -> ValidationResult<String> {
        let lowered = value.trim().to_lowercase();
        valid_values
            .iter()
            .find(|valid| valid.to_lowercase() == lowered)
            .map(|valid| valid.to_string())
            .ok_or_else(|| {
                invalid(
                    field,
                    value,
                    ConfigErrorType::InvalidValue,
                    format!("Invalid value, must be one of: {}", valid_values.join(", ")),
                    format!("Use one of: {}", valid_values.join(", ")),
                )
            })
    }

    /// Validate an http(s) base URL
    pub fn validate_url(field: &str, value: &str) -> ValidationResult<String> {
        let url = reqwest::Url::parse(value.trim()).map_err(|e| {
            invalid(
                field,
                value,
                ConfigErrorType::InvalidFormat,
                format!("Invalid URL: {}", e),
                "Use a full URL such as http://127.0.0.1:5001".to_string(),
            )
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid(
                field,
                value,
                ConfigErrorType::InvalidValue,
                "URL must use http or https and name a host".to_string(),
                "Use a full URL such as http://127.0.0.1:5001".to_string(),
            ));
        }

        Ok(value.trim().trim_end_matches('/').to_string())
    }

    /// Validate a placeholder hint and the numeric default it declares
    pub fn validate_hint(field: &str, value: &str, kind: HintKind) -> ValidationResult<String> {
        let default = placeholder_default(value).ok_or_else(|| {
            invalid(
                field,
                value,
                ConfigErrorType::InvalidFormat,
                "Hint does not declare a default value".to_string(),
                "Use the form '<label>: <default>', e.g. 'Default: 0.5'".to_string(),
            )
        })?;

        let numeric = match kind {
            HintKind::Float => default.parse::<f64>().map(|v| v.is_finite()).unwrap_or(false),
            HintKind::Integer => default.parse::<u32>().is_ok(),
        };
        if !numeric {
            return Err(invalid(
                field,
                value,
                ConfigErrorType::InvalidValue,
                format!("Default '{}' is not a valid {:?} value", default, kind),
                match kind {
                    HintKind::Float => "Use a decimal number, e.g. 0.5".to_string(),
                    HintKind::Integer => "Use a whole number, e.g. 2".to_string(),
                },
            ));
        }

        Ok(value.to_string())
    }
}

/// Helper function to get optional environment variable
pub fn get_env_optional(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Configuration validator for the Whisper uploader
pub struct ClientConfigValidator;

impl ClientConfigValidator {
    /// Validate all parameters from the environment into a typed configuration
    pub fn validate_and_load() -> Result<ClientConfig, ValidationResults> {
        Self::validate_with(get_env_optional)
    }

    /// Validate all parameters read through `lookup`
    pub fn validate_with<F>(lookup: F) -> Result<ClientConfig, ValidationResults>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (config, results) = Self::collect(lookup);

        results.print_summary();

        if results.is_valid() {
            Ok(config)
        } else {
            Err(results)
        }
    }

    /// Validate every parameter, keeping defaults where a value is rejected
    fn collect<F>(lookup: F) -> (ClientConfig, ValidationResults)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut results = ValidationResults::new();
        let mut config = ClientConfig::default();

        info!("Starting configuration validation...");

        for param in CONFIG_PARAMS {
            let value = lookup(param.name)
                .or_else(|| param.default_value.map(String::from))
                .unwrap_or_default();

            if value.trim().is_empty() {
                continue;
            }

            if let Err(error) = Self::validate_and_store_parameter(param, &value, &mut config) {
                results.add(param.validation_level, error);
            }
        }

        Self::validate_cross_dependencies(&mut results, &config);
        (config, results)
    }

    /// Validate a single parameter and store its value in the config struct
    fn validate_and_store_parameter(
        param: &ConfigParam,
        value: &str,
        config: &mut ClientConfig,
    ) -> ValidationResult<()> {
        match param.param_type {
            ConfigType::String => {
                if param.name == "WHISPER_UPLOADER_OUTPUT_DIR" {
                    config.output_dir = PathBuf::from(value.trim());
                }
            }
            ConfigType::UnsignedInteger => {
                let parsed =
                    validators::validate_u64(param.name, value, param.min_value, param.max_value)?;
                match param.name {
                    "WHISPER_UPLOADER_REQUEST_TIMEOUT_SECONDS" => {
                        config.request_timeout = optional_secs(parsed)
                    }
                    "WHISPER_UPLOADER_POLL_INTERVAL_MS" => {
                        config.poll_interval = Duration::from_millis(parsed)
                    }
                    "WHISPER_UPLOADER_MAX_POLL_SECONDS" => {
                        config.max_poll_duration = optional_secs(parsed)
                    }
                    "WHISPER_UPLOADER_UPLOAD_CHUNK_SIZE" => {
                        config.upload_chunk_size = parsed as usize
                    }
                    _ => {}
                }
            }
            ConfigType::Url => {
                let parsed = validators::validate_url(param.name, value)?;
                if param.name == "WHISPER_UPLOADER_SERVER_URL" {
                    config.server_url = parsed;
                }
            }
            ConfigType::Enum(valid_values) => {
                let parsed = validators::validate_enum(param.name, value, valid_values)?;
                if param.name == "WHISPER_UPLOADER_MODEL" {
                    config.default_model = parsed;
                }
            }
            ConfigType::Hint(kind) => {
                let parsed = validators::validate_hint(param.name, value, kind)?;
                match param.name {
                    "WHISPER_UPLOADER_THRESHOLD_HINT" => config.hints.threshold = parsed,
                    "WHISPER_UPLOADER_MIN_DURATION_OFF_HINT" => {
                        config.hints.min_duration_off = parsed
                    }
                    "WHISPER_UPLOADER_MIN_SPEAKERS_HINT" => config.hints.min_speakers = parsed,
                    "WHISPER_UPLOADER_MAX_SPEAKERS_HINT" => config.hints.max_speakers = parsed,
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Validate cross-parameter dependencies
    fn validate_cross_dependencies(results: &mut ValidationResults, config: &ClientConfig) {
        let speakers = |hint: &str| placeholder_default(hint).and_then(|v| v.parse::<u32>().ok());
        if let (Some(min), Some(max)) = (
            speakers(&config.hints.min_speakers),
            speakers(&config.hints.max_speakers),
        ) {
            if min > max {
                results.add_error(ConfigValidationError {
                    field: "WHISPER_UPLOADER_MIN_SPEAKERS_HINT".to_string(),
                    value: config.hints.min_speakers.clone(),
                    error_type: ConfigErrorType::Inconsistent,
                    message: format!(
                        "Default minimum speakers ({}) exceeds default maximum speakers ({})",
                        min, max
                    ),
                    suggestion: Some("Lower the minimum or raise the maximum".to_string()),
                });
            }
        }

        if let Some(max_poll) = config.max_poll_duration {
            if max_poll < config.poll_interval {
                results.add_warning(ConfigValidationError {
                    field: "WHISPER_UPLOADER_MAX_POLL_SECONDS".to_string(),
                    value: max_poll.as_secs().to_string(),
                    error_type: ConfigErrorType::Inconsistent,
                    message: "Polling limit is shorter than one poll interval".to_string(),
                    suggestion: Some(
                        "Raise WHISPER_UPLOADER_MAX_POLL_SECONDS or set it to 0".to_string(),
                    ),
                });
            }
        }
    }
}

/// Documentation and configuration generation utilities
impl ClientConfigValidator {
    /// Generate a sample configuration file with all parameters and descriptions
    pub fn generate_sample_config() -> String {
        let mut output = String::new();
        output.push_str("# Whisper Uploader Configuration File\n");
        output.push_str("# Environment variables take precedence over values in this file\n");

        for param in CONFIG_PARAMS {
            output.push_str(&format!("\n# {}\n", param.description));
            let default = param.default_value.unwrap_or("");
            match param.param_type {
                ConfigType::UnsignedInteger => {
                    output.push_str(&format!("{} = {}\n", param.name, default))
                }
                _ => output.push_str(&format!("{} = \"{}\"\n", param.name, default)),
            }
        }
        output
    }

    /// Generate markdown documentation for all configuration parameters
    pub fn generate_config_documentation() -> String {
        let mut output = String::new();
        output.push_str("# Whisper Uploader Configuration Reference\n\n");
        output.push_str("| Parameter | Type | Default | Description |\n");
        output.push_str("|-----------|------|---------|-------------|\n");

        for param in CONFIG_PARAMS {
            output.push_str(&format!(
                "| `{}` | {:?} | `{}` | {} |\n",
                param.name,
                param.param_type,
                param.default_value.unwrap_or("none"),
                param.description
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn validate(pairs: &[(&str, &str)]) -> Result<ClientConfig, ValidationResults> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfigValidator::validate_with(|key| values.get(key).cloned())
    }

    #[test]
    fn test_defaults_validate() {
        let config = validate(&[]).expect("defaults are valid");
        assert_eq!(config.server_url, defaults::SERVER_URL);
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.max_poll_duration, None);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.default_model, "large-v3");
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = validate(&[
            ("WHISPER_UPLOADER_SERVER_URL", "https://transcribe.example.org/"),
            ("WHISPER_UPLOADER_POLL_INTERVAL_MS", "1500"),
            ("WHISPER_UPLOADER_MAX_POLL_SECONDS", "600"),
            ("WHISPER_UPLOADER_MODEL", "Medium"),
            ("WHISPER_UPLOADER_THRESHOLD_HINT", "Threshold: 0.65"),
            ("WHISPER_UPLOADER_OUTPUT_DIR", "/tmp/transcripts"),
        ])
        .expect("valid overrides");

        assert_eq!(config.server_url, "https://transcribe.example.org");
        assert_eq!(config.poll_interval, Duration::from_millis(1500));
        assert_eq!(config.max_poll_duration, Some(Duration::from_secs(600)));
        assert_eq!(config.default_model, "medium");
        assert_eq!(config.hints.threshold, "Threshold: 0.65");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/transcripts"));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let results = validate(&[
            ("WHISPER_UPLOADER_SERVER_URL", "ftp://example.org"),
            ("WHISPER_UPLOADER_POLL_INTERVAL_MS", "1"),
            ("WHISPER_UPLOADER_MODEL", "gigantic"),
            ("WHISPER_UPLOADER_MIN_SPEAKERS_HINT", "Min speakers"),
        ])
        .unwrap_err();

        let fields: Vec<&str> = results.errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"WHISPER_UPLOADER_SERVER_URL"));
        assert!(fields.contains(&"WHISPER_UPLOADER_POLL_INTERVAL_MS"));
        assert!(fields.contains(&"WHISPER_UPLOADER_MODEL"));
        assert!(fields.contains(&"WHISPER_UPLOADER_MIN_SPEAKERS_HINT"));
    }

    #[test]
    fn test_hint_validation() {
        assert!(validators::validate_hint("F", "Default: 0.5", HintKind::Float).is_ok());
        assert!(validators::validate_hint("F", "Default: abc", HintKind::Float).is_err());
        assert!(validators::validate_hint("F", "Default: 2.5", HintKind::Integer).is_err());
        assert!(validators::validate_hint("F", "no default", HintKind::Integer).is_err());
    }

    #[test]
    fn test_speaker_range_must_be_consistent() {
        let results = validate(&[
            ("WHISPER_UPLOADER_MIN_SPEAKERS_HINT", "Default: 10"),
            ("WHISPER_UPLOADER_MAX_SPEAKERS_HINT", "Default: 4"),
        ])
        .unwrap_err();
        assert_eq!(results.errors.len(), 1);
        assert_eq!(results.errors[0].error_type, ConfigErrorType::Inconsistent);
    }

    #[test]
    fn test_short_poll_limit_is_a_warning() {
        let config = validate(&[
            ("WHISPER_UPLOADER_POLL_INTERVAL_MS", "5000"),
            ("WHISPER_UPLOADER_MAX_POLL_SECONDS", "1"),
        ]);
        assert!(config.is_ok());
    }

    #[test]
    fn test_tuning_values_fall_back_with_warnings() {
        let values: HashMap<&str, &str> = [
            ("WHISPER_UPLOADER_REQUEST_TIMEOUT_SECONDS", "forever"),
            ("WHISPER_UPLOADER_UPLOAD_CHUNK_SIZE", "12"),
        ]
        .into_iter()
        .collect();
        let (config, results) =
            ClientConfigValidator::collect(|key| values.get(key).map(|v| v.to_string()));

        assert!(results.is_valid());
        let fields: Vec<&str> = results.warnings.iter().map(|w| w.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "WHISPER_UPLOADER_REQUEST_TIMEOUT_SECONDS",
                "WHISPER_UPLOADER_UPLOAD_CHUNK_SIZE"
            ]
        );
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.upload_chunk_size, defaults::UPLOAD_CHUNK_SIZE);
    }

    #[test]
    fn test_sample_config_is_loadable() {
        let sample = ClientConfigValidator::generate_sample_config();
        let map = crate::config_loader::flatten_config(&sample).expect("sample is valid toml");
        assert_eq!(map.len(), CONFIG_PARAMS.len());
        assert_eq!(map["WHISPER_UPLOADER_POLL_INTERVAL_MS"], "5000");
    }

    #[test]
    fn test_documentation_lists_every_parameter() {
        let doc = ClientConfigValidator::generate_config_documentation();
        for param in CONFIG_PARAMS {
            assert!(doc.contains(param.name));
        }
    }
}
