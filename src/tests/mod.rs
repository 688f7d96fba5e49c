//! Test support and end-to-end flow tests
//!
//! The flow tests run the controller against an in-process mock of the
//! transcription server.

mod mock_server;

use crate::artifacts::{Artifact, ResultTab};
use crate::view::{FormView, SubmitState};

/// Everything a view was asked to show, in order
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Reset,
    Submit(SubmitState),
    Progress(f64),
    Status(String),
    Alert(String),
    Content(String),
    Download(ResultTab, Option<String>),
}

/// View that records calls instead of rendering them
#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn alerts(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Alert(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn progress(&self) -> Vec<f64> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Progress(percent) => Some(*percent),
                _ => None,
            })
            .collect()
    }

    pub fn contents(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Content(content) => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_content(&self) -> Option<&str> {
        self.contents().last().copied()
    }

    pub fn last_submit_state(&self) -> Option<SubmitState> {
        self.events.iter().rev().find_map(|event| match event {
            ViewEvent::Submit(state) => Some(*state),
            _ => None,
        })
    }

    /// Download file names offered for a tab, `None` where it was hidden
    pub fn downloads(&self, tab: ResultTab) -> Vec<Option<String>> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Download(t, name) if *t == tab => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

impl FormView for RecordingView {
    fn reset(&mut self) {
        self.events.push(ViewEvent::Reset);
    }

    fn submit_state(&mut self, state: SubmitState) {
        self.events.push(ViewEvent::Submit(state));
    }

    fn upload_progress(&mut self, percent: f64) {
        self.events.push(ViewEvent::Progress(percent));
    }

    fn status(&mut self, message: &str) {
        self.events.push(ViewEvent::Status(message.to_string()));
    }

    fn alert(&mut self, message: &str) {
        self.events.push(ViewEvent::Alert(message.to_string()));
    }

    fn show_content(&mut self, content: &str) {
        self.events.push(ViewEvent::Content(content.to_string()));
    }

    fn download(&mut self, tab: ResultTab, artifact: Option<&Artifact>) {
        self.events.push(ViewEvent::Download(
            tab,
            artifact.map(|artifact| artifact.file_name.clone()),
        ));
    }
}
