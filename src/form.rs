// Submission form for the Whisper uploader
//
// This module holds the user-facing form values and turns them into the
// exact field set sent to the server, applying placeholder defaults to
// every optional parameter left empty.

use std::path::PathBuf;

use log::debug;

use crate::config::{defaults, ClientConfig};
use crate::error::ClientError;

/// Names of the optional parameters, in submission order
pub const OPTIONAL_PARAMS: [&str; 4] = ["threshold", "min_duration_off", "min_speakers", "max_speakers"];

/// Extracts the declared default from a placeholder hint such as `"Default: 0.5"`
///
/// The default is the text following the first `": "` separator, up to the
/// next separator if there is one.
pub fn placeholder_default(hint: &str) -> Option<&str> {
    hint.split(": ")
        .nth(1)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Resolves one optional value: the user value when non-empty, else the hint default
pub fn resolve_optional(value: &str, hint: &str, fallback: &str) -> String {
    let value = value.trim();
    if !value.is_empty() {
        return value.to_string();
    }
    placeholder_default(hint).unwrap_or(fallback).to_string()
}

/// Values entered by the user for one submission
///
/// Empty strings mean "left blank".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionForm {
    /// Selected media file
    pub file: Option<PathBuf>,
    /// Model choice (e.g. "large-v3")
    pub model: String,
    /// Detection threshold
    pub threshold: String,
    /// Minimum silence duration
    pub min_duration_off: String,
    /// Minimum speaker count
    pub min_speakers: String,
    /// Maximum speaker count
    pub max_speakers: String,
}

/// Form values ready to be sent, with every default substituted
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSubmission {
    /// File to upload
    pub file: PathBuf,
    /// Text fields in submission order, starting with `model`
    pub fields: Vec<(&'static str, String)>,
}

impl ResolvedSubmission {
    /// Value of a named text field
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl SubmissionForm {
    /// Creates a form with only a file selected
    pub fn with_file<P: Into<PathBuf>>(file: P) -> Self {
        Self {
            file: Some(file.into()),
            ..Self::default()
        }
    }

    /// Validates the form and substitutes defaults
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NoFileSelected` if no file was chosen.
    pub fn resolve(&self, config: &ClientConfig) -> Result<ResolvedSubmission, ClientError> {
        let file = self.file.clone().ok_or(ClientError::NoFileSelected)?;

        let model = match self.model.trim() {
            "" => config.default_model.clone(),
            value => value.to_string(),
        };

        let hints = &config.hints;
        let fields = vec![
            ("model", model),
            (
                "threshold",
                resolve_optional(&self.threshold, &hints.threshold, defaults::THRESHOLD),
            ),
            (
                "min_duration_off",
                resolve_optional(
                    &self.min_duration_off,
                    &hints.min_duration_off,
                    defaults::MIN_DURATION_OFF,
                ),
            ),
            (
                "min_speakers",
                resolve_optional(&self.min_speakers, &hints.min_speakers, defaults::MIN_SPEAKERS),
            ),
            (
                "max_speakers",
                resolve_optional(&self.max_speakers, &hints.max_speakers, defaults::MAX_SPEAKERS),
            ),
        ];

        debug!("Resolved submission fields: {:?}", fields);

        Ok(ResolvedSubmission { file, fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParamHints;

    #[test]
    fn test_placeholder_default() {
        assert_eq!(placeholder_default("Default: 0.5"), Some("0.5"));
        assert_eq!(placeholder_default("기본값: 25"), Some("25"));
        assert_eq!(placeholder_default("Default: 2: extra"), Some("2"));
        assert_eq!(placeholder_default("no default here"), None);
        assert_eq!(placeholder_default("Default: "), None);
    }

    #[test]
    fn test_empty_optional_fields_use_defaults() {
        let form = SubmissionForm::with_file("/tmp/meeting.mp4");
        let resolved = form.resolve(&ClientConfig::default()).unwrap();

        assert_eq!(resolved.field("model"), Some("large-v3"));
        assert_eq!(resolved.field("threshold"), Some("0.5"));
        assert_eq!(resolved.field("min_duration_off"), Some("0.0"));
        assert_eq!(resolved.field("min_speakers"), Some("2"));
        assert_eq!(resolved.field("max_speakers"), Some("25"));
        for (name, value) in &resolved.fields {
            assert!(!value.is_empty(), "field {} submitted empty", name);
        }
    }

    #[test]
    fn test_user_values_win_over_defaults() {
        let form = SubmissionForm {
            file: Some(PathBuf::from("/tmp/a.wav")),
            model: "medium".to_string(),
            threshold: " 0.7 ".to_string(),
            min_duration_off: "".to_string(),
            min_speakers: "3".to_string(),
            max_speakers: "   ".to_string(),
        };
        let resolved = form.resolve(&ClientConfig::default()).unwrap();

        assert_eq!(resolved.field("model"), Some("medium"));
        assert_eq!(resolved.field("threshold"), Some("0.7"));
        assert_eq!(resolved.field("min_duration_off"), Some("0.0"));
        assert_eq!(resolved.field("min_speakers"), Some("3"));
        assert_eq!(resolved.field("max_speakers"), Some("25"));
    }

    #[test]
    fn test_custom_hints_drive_defaults() {
        let config = ClientConfig {
            hints: ParamHints {
                threshold: "Threshold: 0.65".to_string(),
                min_duration_off: "Silence: 1.5".to_string(),
                min_speakers: "Min: 1".to_string(),
                max_speakers: "broken hint".to_string(),
            },
            ..ClientConfig::default()
        };
        let resolved = SubmissionForm::with_file("a.mp3").resolve(&config).unwrap();

        assert_eq!(resolved.field("threshold"), Some("0.65"));
        assert_eq!(resolved.field("min_duration_off"), Some("1.5"));
        assert_eq!(resolved.field("min_speakers"), Some("1"));
        assert_eq!(resolved.field("max_speakers"), Some(defaults::MAX_SPEAKERS));
    }

    #[test]
    fn test_field_order() {
        let resolved = SubmissionForm::with_file("a.mp3")
            .resolve(&ClientConfig::default())
            .unwrap();
        let names: Vec<&str> = resolved.fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(names[0], "model");
        assert_eq!(&names[1..], &OPTIONAL_PARAMS);
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let form = SubmissionForm::default();
        assert!(matches!(
            form.resolve(&ClientConfig::default()),
            Err(ClientError::NoFileSelected)
        ));
    }
}
