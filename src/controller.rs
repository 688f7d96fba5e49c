//! Upload-and-poll controller
//!
//! Drives one submission at a time: validate the form, reset the previous
//! job, upload with progress, poll the job until it is terminal, then
//! materialize and display the transcripts. The job key and the result cache
//! are the only state carried between submissions, and both are cleared by
//! [`UploadController::reset`] before every upload.

use log::{error, info};
use tokio::sync::mpsc;

use crate::artifacts::{materialize, Artifact, ResultCache, ResultTab};
use crate::client::JobClient;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::form::{ResolvedSubmission, SubmissionForm};
use crate::models::TranscriptPair;
use crate::poller::Poller;
use crate::view::{FormView, SubmitState};

const QUEUED_MESSAGE: &str =
    "Job added to the queue. Results will be shown once processing finishes (this can take a few minutes).";
const COMPLETED_MESSAGE: &str = "Processing complete!";

/// Result of a successful submission
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Job key issued by the server
    pub key: String,
    /// Download per tab, `None` where it could not be created
    pub artifacts: Vec<(ResultTab, Option<Artifact>)>,
}

impl Completion {
    pub fn artifact(&self, tab: ResultTab) -> Option<&Artifact> {
        self.artifacts
            .iter()
            .find(|(t, _)| *t == tab)
            .and_then(|(_, artifact)| artifact.as_ref())
    }
}

/// Controller owning the current job and its results
pub struct UploadController<V: FormView> {
    client: JobClient,
    poller: Poller,
    view: V,
    job_key: Option<String>,
    results: ResultCache,
    active_tab: ResultTab,
}

impl<V: FormView> UploadController<V> {
    pub fn new(config: ClientConfig, view: V) -> Result<Self, ClientError> {
        let poller = Poller::from_config(&config);
        Ok(Self {
            client: JobClient::new(config)?,
            poller,
            view,
            job_key: None,
            results: ResultCache::default(),
            active_tab: ResultTab::Txt,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.client.config()
    }

    /// Key of the job currently tracked, if any
    pub fn job_key(&self) -> Option<&str> {
        self.job_key.as_deref()
    }

    pub fn results(&self) -> &ResultCache {
        &self.results
    }

    pub fn active_tab(&self) -> ResultTab {
        self.active_tab
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Forgets the previous job and its results
    pub fn reset(&mut self) {
        self.job_key = None;
        self.results.clear();
        self.active_tab = ResultTab::Txt;
        self.view.reset();
    }

    /// Runs the whole flow for one form submission
    ///
    /// Every error is shown through [`FormView::alert`] and the submit
    /// control is made ready again before it is returned.
    pub async fn submit(&mut self, form: &SubmissionForm) -> Result<Completion, ClientError> {
        let submission = match form.resolve(self.client.config()) {
            Ok(submission) => submission,
            Err(e) => return Err(self.fail(e)),
        };

        self.reset();
        self.view.submit_state(SubmitState::Uploading);
        self.view.upload_progress(0.0);

        let key = match self.upload(&submission).await {
            Ok(key) => key,
            Err(e) => return Err(self.fail(e)),
        };
        self.job_key = Some(key.clone());
        self.view.submit_state(SubmitState::Waiting);
        self.view.status(QUEUED_MESSAGE);

        let pair = match self.poller.run(&self.client, &key).await {
            Ok(pair) => pair,
            Err(e) => return Err(self.fail(e)),
        };

        self.view.status(COMPLETED_MESSAGE);
        Ok(self.display_results(key, pair))
    }

    /// Shows the cached payload named by a tab's data attribute
    ///
    /// Unknown targets and missing payloads show the fallback message.
    pub fn select_tab(&mut self, target: &str) -> &str {
        if let Ok(tab) = target.parse::<ResultTab>() {
            self.active_tab = tab;
        }
        let content = self.results.content_for(target);
        self.view.show_content(content);
        content
    }

    /// Sends the submission while forwarding progress events to the view
    async fn upload(&mut self, submission: &ResolvedSubmission) -> Result<String, ClientError> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let request = self.client.enqueue(submission, tx);
        tokio::pin!(request);

        let result = loop {
            tokio::select! {
                result = &mut request => break result,
                Some(progress) = rx.recv() => self.view.upload_progress(progress.percent()),
            }
        };
        while let Ok(progress) = rx.try_recv() {
            self.view.upload_progress(progress.percent());
        }

        result
    }

    fn display_results(&mut self, key: String, pair: TranscriptPair) -> Completion {
        self.results.store(pair);

        let config = self.client.config();
        if let Err(e) = config.ensure_output_dir() {
            error!(
                "Failed to create output directory {}: {}",
                config.output_dir.display(),
                e
            );
        }
        let artifacts = materialize(&self.results, &key, &config.output_dir);
        for (tab, artifact) in &artifacts {
            self.view.download(*tab, artifact.as_ref());
        }

        self.active_tab = ResultTab::Txt;
        self.view
            .show_content(self.results.content_for(ResultTab::Txt.as_str()));
        self.view.submit_state(SubmitState::Ready);

        info!("Results for job {} are ready", key);
        Completion { key, artifacts }
    }

    fn fail(&mut self, e: ClientError) -> ClientError {
        self.view.alert(&e.to_string());
        self.view.submit_state(SubmitState::Ready);
        e
    }
}
