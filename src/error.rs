// Error handling for the Whisper uploader
//
// This module defines the error types surfaced by the upload-and-poll flow.
// Every `ClientError` is fatal for the current submission; `ArtifactError`
// only disables one download.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that end a submission
#[derive(Error, Debug)]
pub enum ClientError {
    /// No file was selected, nothing was sent
    #[error("Please select a file.")]
    NoFileSelected,

    /// The selected file could not be read
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The HTTP client could not be built
    #[error("Failed to initialise HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The server answered the upload with a non-200 status
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// The upload request never completed
    #[error("A network error occurred during upload: {0}")]
    UploadNetwork(#[source] reqwest::Error),

    /// The upload succeeded but the response carried no usable job key
    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    /// The server reported that processing failed
    #[error("Server processing failed: {0}")]
    JobFailed(String),

    /// The server does not know the job key
    #[error("Job ID {0} not found. Please reload the page and submit again.")]
    JobNotFound(String),

    /// The status endpoint answered with an unexpected status
    #[error("Server error while checking results: {0}")]
    PollServerError(String),

    /// A status request failed in transport or returned an unreadable body
    #[error("Network error while checking results: {0}")]
    PollNetwork(String),

    /// Polling exceeded the configured ceiling
    #[error("Job still processing after {0:?}, giving up")]
    PollTimeout(Duration),
}

/// Errors while materializing one transcript artifact
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// The server returned no payload for this artifact
    #[error("No {0} content in job result")]
    MissingPayload(&'static str),

    /// The artifact file could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
