// Whisper Uploader Library
//
// This crate uploads a media file to a transcription server, polls the
// resulting job until it finishes, and saves the transcripts it returns.

pub mod artifacts;
pub mod client;
pub mod config;
pub mod config_loader;
pub mod config_validator;
pub mod controller;
pub mod error;
pub mod form;
pub mod models;
pub mod poller;
pub mod view;

#[cfg(test)]
mod tests;

// Re-export common types for easier access
pub use artifacts::{Artifact, ResultCache, ResultTab, UNAVAILABLE_MESSAGE};
pub use client::JobClient;
pub use config::ClientConfig;
pub use controller::{Completion, UploadController};
pub use error::{ArtifactError, ClientError};
pub use form::SubmissionForm;
pub use models::{JobState, TranscriptPair, UploadProgress};
pub use poller::{Poller, StatusSource};
pub use view::{ConsoleView, FormView, SubmitState};
