// Whisper uploader data models
//
// This module contains the wire types exchanged with the transcription server
// and the small value types passed between the client, the poller and the view.

use serde::{Deserialize, Serialize};

/// Response to a successful upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnqueueResponse {
    /// Job key assigned by the server
    pub key: String,
}

/// The two transcript payloads of a completed job
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TranscriptPair {
    /// Plain-text transcript
    #[serde(default)]
    pub txt: Option<String>,
    /// WebVTT subtitles
    #[serde(default)]
    pub vtt: Option<String>,
}

/// Payload of a job result response
///
/// A completed job carries the transcript pair, a failed job a detail string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum JobData {
    Transcripts(TranscriptPair),
    Detail(String),
}

/// Body of `GET /job-result/{key}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobResultResponse {
    /// "processing", "completed" or "failed"
    pub status: String,
    #[serde(default)]
    pub data: Option<JobData>,
}

/// Interpreted state of a polled job
#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    /// Any non-terminal status, carrying the raw status string
    Processing(String),
    /// Terminal success
    Completed(TranscriptPair),
    /// Terminal failure with the server-provided detail
    Failed(String),
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Processing(_))
    }
}

impl From<JobResultResponse> for JobState {
    fn from(response: JobResultResponse) -> Self {
        match response.status.as_str() {
            "completed" => match response.data {
                Some(JobData::Transcripts(pair)) => JobState::Completed(pair),
                _ => JobState::Completed(TranscriptPair::default()),
            },
            "failed" => match response.data {
                Some(JobData::Detail(detail)) => JobState::Failed(detail),
                Some(JobData::Transcripts(_)) | None => {
                    JobState::Failed("no details provided".to_string())
                }
            },
            _ => JobState::Processing(response.status),
        }
    }
}

/// Upload progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    /// Bytes handed to the transport so far
    pub sent: u64,
    /// Total bytes of the file part
    pub total: u64,
}

impl UploadProgress {
    /// Percentage of the file sent, 0.0 to 100.0
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.sent as f64 / self.total as f64) * 100.0
    }
}
