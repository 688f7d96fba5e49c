// HTTP client for the transcription server
//
// This module talks to the two server endpoints: the multipart enqueue
// request and the job result request. It maps every response onto the
// client error taxonomy and reports upload progress through a channel.

use async_trait::async_trait;
use futures::TryStream;
use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, StatusCode};
use std::io;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::form::ResolvedSubmission;
use crate::models::{EnqueueResponse, JobResultResponse, JobState, UploadProgress};
use crate::poller::StatusSource;

/// Fallback file name when the path has none
const DEFAULT_UPLOAD_NAME: &str = "upload.bin";

/// Formats a status as code plus reason, e.g. "500 Internal Server Error"
pub fn status_text(status: StatusCode) -> String {
    status.to_string()
}

/// Client for the enqueue and job result endpoints
#[derive(Clone, Debug)]
pub struct JobClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl JobClient {
    /// Builds a client for the configured server
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(ClientError::HttpClient)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Uploads the file and its parameters, returning the job key
    ///
    /// Progress events are sent on `progress` as the body is streamed.
    ///
    /// # Errors
    ///
    /// * `ClientError::FileRead` if the file cannot be read (no request is sent)
    /// * `ClientError::UploadNetwork` on transport failure
    /// * `ClientError::UploadFailed` on any status other than 200
    /// * `ClientError::InvalidResponse` if the 200 body has no key
    pub async fn enqueue(
        &self,
        submission: &ResolvedSubmission,
        progress: UnboundedSender<UploadProgress>,
    ) -> Result<String, ClientError> {
        let read_error = |source: io::Error| ClientError::FileRead {
            path: submission.file.clone(),
            source,
        };
        let file = File::open(&submission.file).await.map_err(read_error)?;
        let metadata = file.metadata().await.map_err(read_error)?;
        if metadata.is_dir() {
            return Err(read_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "is a directory",
            )));
        }
        let total = metadata.len();
        let file_name = submission
            .file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(DEFAULT_UPLOAD_NAME)
            .to_string();

        info!(
            "Uploading {} ({} bytes) to {}",
            file_name,
            total,
            self.config.upload_url()
        );

        let chunks = file_chunks(file, total, self.config.upload_chunk_size, progress);
        let part = Part::stream_with_length(Body::wrap_stream(chunks), total).file_name(file_name);
        let mut form = Form::new().part("file", part);
        for (name, value) in &submission.fields {
            form = form.text(*name, value.clone());
        }

        let response = self
            .http
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(ClientError::UploadNetwork)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ClientError::UploadFailed(status_text(status)));
        }

        let body: EnqueueResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        if body.key.is_empty() {
            return Err(ClientError::InvalidResponse("empty job key".to_string()));
        }

        info!("Upload accepted, job key {}", body.key);
        Ok(body.key)
    }

    /// Requests the current state of a job
    ///
    /// # Errors
    ///
    /// * `ClientError::JobNotFound` on 404
    /// * `ClientError::PollServerError` on any other non-success status
    /// * `ClientError::PollNetwork` on transport failure or unreadable body
    pub async fn job_state(&self, key: &str) -> Result<JobState, ClientError> {
        let mut request = self.http.get(self.config.job_result_url(key));
        if let Some(timeout) = self.config.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::PollNetwork(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body: JobResultResponse = response
                .json()
                .await
                .map_err(|e| ClientError::PollNetwork(e.to_string()))?;
            debug!("Job {} reported status {}", key, body.status);
            Ok(body.into())
        } else if status == StatusCode::NOT_FOUND {
            Err(ClientError::JobNotFound(key.to_string()))
        } else {
            Err(ClientError::PollServerError(status_text(status)))
        }
    }
}

#[async_trait]
impl StatusSource for JobClient {
    async fn check(&self, key: &str) -> Result<JobState, ClientError> {
        self.job_state(key).await
    }
}

/// Streams a file in chunks of `chunk_size` bytes, reporting each chunk read
///
/// An empty file reports a single `0/0` event up front.
fn file_chunks(
    file: File,
    total: u64,
    chunk_size: usize,
    progress: UnboundedSender<UploadProgress>,
) -> impl TryStream<Ok = Vec<u8>, Error = io::Error> + Send + Sync + 'static {
    let chunk_size = chunk_size.max(1);
    if total == 0 {
        let _ = progress.send(UploadProgress { sent: 0, total: 0 });
    }

    futures::stream::try_unfold(
        (file, 0u64, progress),
        move |(mut file, sent, progress)| async move {
            let mut chunk = vec![0u8; chunk_size];
            let read = file.read(&mut chunk).await?;
            if read == 0 {
                return Ok::<_, io::Error>(None);
            }
            chunk.truncate(read);

            let sent = sent + read as u64;
            // The receiver may already be gone once the response has arrived
            let _ = progress.send(UploadProgress { sent, total });
            Ok(Some((chunk, (file, sent, progress))))
        },
    )
}
