// Presentation seam for the upload controller
//
// The controller never prints. It reports every visible change through
// `FormView`, so the same flow drives the console front end and tests.

use crate::artifacts::{Artifact, ResultTab};

/// State of the submit control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    /// Enabled, ready for a new submission
    Ready,
    /// Disabled while the file is uploading
    Uploading,
    /// Disabled while the server processes the job
    Waiting,
}

/// Everything the controller shows to the user
pub trait FormView {
    /// Clears progress, status and viewer before a new submission
    fn reset(&mut self);

    fn submit_state(&mut self, state: SubmitState);

    /// Upload progress as a percentage, 0.0 to 100.0
    fn upload_progress(&mut self, percent: f64);

    /// Informational status line
    fn status(&mut self, message: &str);

    /// Blocking error message
    fn alert(&mut self, message: &str);

    /// Replaces the viewer content
    fn show_content(&mut self, content: &str);

    /// Offers a download, or hides it when `artifact` is `None`
    fn download(&mut self, tab: ResultTab, artifact: Option<&Artifact>);
}

/// Terminal front end
#[derive(Debug, Default)]
pub struct ConsoleView {
    last_percent: Option<u32>,
}

impl FormView for ConsoleView {
    fn reset(&mut self) {
        self.last_percent = None;
    }

    fn submit_state(&mut self, state: SubmitState) {
        match state {
            SubmitState::Ready => {}
            SubmitState::Uploading => println!("Uploading..."),
            SubmitState::Waiting => println!("Waiting for processing..."),
        }
    }

    fn upload_progress(&mut self, percent: f64) {
        let rounded = percent.round() as u32;
        if self.last_percent != Some(rounded) {
            self.last_percent = Some(rounded);
            println!("Upload: {}%", rounded);
        }
    }

    fn status(&mut self, message: &str) {
        println!("{}", message);
    }

    fn alert(&mut self, message: &str) {
        eprintln!("Error: {}", message);
    }

    fn show_content(&mut self, content: &str) {
        println!("{}", content);
    }

    fn download(&mut self, tab: ResultTab, artifact: Option<&Artifact>) {
        match artifact {
            Some(artifact) => println!(
                "Download {}: {} ({})",
                tab,
                artifact.path.display(),
                artifact.content_type
            ),
            None => println!("Download {}: unavailable", tab),
        }
    }
}
