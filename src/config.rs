// Whisper uploader configuration
//
// This module contains configuration structures and constants for the uploader.
// Values here are the built-in defaults; the validator layers environment
// variables and the config file on top of them.

use std::path::PathBuf;
use std::time::Duration;

/// Default values for configuration
pub mod defaults {
    // Base URL of the transcription server
    pub const SERVER_URL: &str = "http://127.0.0.1:5001";

    // Interval between two job status requests, in milliseconds
    pub const POLL_INTERVAL_MS: u64 = 5000;

    // Maximum total polling time in seconds (0 = unlimited)
    pub const MAX_POLL_SECONDS: u64 = 0;

    // Timeout for a single status request in seconds (0 = none)
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 0;

    // Directory where transcript artifacts are written
    pub const OUTPUT_DIR: &str = ".";

    // Default transcription model
    pub const MODEL: &str = "large-v3";

    // Models accepted by the server
    pub const VALID_MODELS: [&str; 8] = [
        "tiny", "base", "small", "medium", "large", "large-v1", "large-v2", "large-v3",
    ];

    // Size of each streamed upload chunk in bytes
    pub const UPLOAD_CHUNK_SIZE: usize = 65536;

    // Placeholder hints for the optional parameters
    pub const THRESHOLD_HINT: &str = "Default: 0.5";
    pub const MIN_DURATION_OFF_HINT: &str = "Default: 0.0";
    pub const MIN_SPEAKERS_HINT: &str = "Default: 2";
    pub const MAX_SPEAKERS_HINT: &str = "Default: 25";

    // Last-resort values when a hint carries no default
    pub const THRESHOLD: &str = "0.5";
    pub const MIN_DURATION_OFF: &str = "0.0";
    pub const MIN_SPEAKERS: &str = "2";
    pub const MAX_SPEAKERS: &str = "25";
}

/// Placeholder hints shown next to the optional form fields.
///
/// Each hint reads `"<label>: <default>"` and doubles as the declared default
/// for its field.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamHints {
    pub threshold: String,
    pub min_duration_off: String,
    pub min_speakers: String,
    pub max_speakers: String,
}

impl Default for ParamHints {
    fn default() -> Self {
        Self {
            threshold: defaults::THRESHOLD_HINT.to_string(),
            min_duration_off: defaults::MIN_DURATION_OFF_HINT.to_string(),
            min_speakers: defaults::MIN_SPEAKERS_HINT.to_string(),
            max_speakers: defaults::MAX_SPEAKERS_HINT.to_string(),
        }
    }
}

/// Configuration for the upload-and-poll client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the transcription server, without trailing slash
    pub server_url: String,
    /// Fixed interval between status requests
    pub poll_interval: Duration,
    /// Optional ceiling on total polling time
    pub max_poll_duration: Option<Duration>,
    /// Optional timeout for each status request
    pub request_timeout: Option<Duration>,
    /// Directory receiving the downloaded artifacts
    pub output_dir: PathBuf,
    /// Model sent when the user leaves the model field empty
    pub default_model: String,
    /// Upload chunk size used for progress reporting
    pub upload_chunk_size: usize,
    /// Placeholder hints of the optional parameters
    pub hints: ParamHints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: defaults::SERVER_URL.to_string(),
            poll_interval: Duration::from_millis(defaults::POLL_INTERVAL_MS),
            max_poll_duration: None,
            request_timeout: None,
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
            default_model: defaults::MODEL.to_string(),
            upload_chunk_size: defaults::UPLOAD_CHUNK_SIZE,
            hints: ParamHints::default(),
        }
    }
}

impl ClientConfig {
    /// URL of the enqueue endpoint
    pub fn upload_url(&self) -> String {
        format!("{}/upload-and-process", self.server_url.trim_end_matches('/'))
    }

    /// URL of the job result endpoint for a given key
    pub fn job_result_url(&self, key: &str) -> String {
        format!("{}/job-result/{}", self.server_url.trim_end_matches('/'), key)
    }

    /// Ensures the output directory exists
    pub fn ensure_output_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.output_dir)
    }
}

/// Converts a seconds value where 0 means "disabled" into an optional duration
pub fn optional_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}
