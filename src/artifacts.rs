// Transcript artifacts for the Whisper uploader
//
// This module holds the in-memory result cache of the current job and turns
// its payloads into downloadable files named after the job key.

use log::{error, info};
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ArtifactError;
use crate::models::TranscriptPair;

/// Shown in the viewer when the selected payload is not available
pub const UNAVAILABLE_MESSAGE: &str = "Content unavailable.";

/// Suffix appended to the job key in artifact file names
const ARTIFACT_SUFFIX: &str = "whisper";

/// One of the two transcript representations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[value(rename_all = "lower")]
pub enum ResultTab {
    /// Plain text
    Txt,
    /// WebVTT subtitles
    Vtt,
}

impl ResultTab {
    pub const ALL: [ResultTab; 2] = [ResultTab::Txt, ResultTab::Vtt];

    /// Data attribute value and file extension
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultTab::Txt => "txt",
            ResultTab::Vtt => "vtt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ResultTab::Txt => "text/plain;charset=utf-8",
            ResultTab::Vtt => "text/vtt;charset=utf-8",
        }
    }
}

impl fmt::Display for ResultTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "txt" => Ok(ResultTab::Txt),
            "vtt" => Ok(ResultTab::Vtt),
            other => Err(format!("Unknown result tab: {}", other)),
        }
    }
}

/// Payloads of the current job, empty until a job completes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultCache {
    txt: Option<String>,
    vtt: Option<String>,
}

impl ResultCache {
    /// Replaces the cached payloads with a completed job's pair
    pub fn store(&mut self, pair: TranscriptPair) {
        self.txt = pair.txt;
        self.vtt = pair.vtt;
    }

    pub fn clear(&mut self) {
        self.txt = None;
        self.vtt = None;
    }

    pub fn is_empty(&self) -> bool {
        self.get(ResultTab::Txt).is_none() && self.get(ResultTab::Vtt).is_none()
    }

    /// Cached payload for a tab, possibly empty
    pub fn get(&self, tab: ResultTab) -> Option<&str> {
        match tab {
            ResultTab::Txt => self.txt.as_deref(),
            ResultTab::Vtt => self.vtt.as_deref(),
        }
    }

    /// Viewer content for a data attribute value, or the fallback message
    ///
    /// An empty payload has nothing to show and gets the fallback too.
    pub fn content_for(&self, target: &str) -> &str {
        target
            .parse::<ResultTab>()
            .ok()
            .and_then(|tab| self.get(tab))
            .filter(|content| !content.is_empty())
            .unwrap_or(UNAVAILABLE_MESSAGE)
    }
}

/// A downloadable transcript file
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub tab: ResultTab,
    /// File name offered for download, e.g. `abc_whisper.txt`
    pub file_name: String,
    pub content_type: &'static str,
    /// Location of the written file
    pub path: PathBuf,
}

/// Download name for a job's artifact
pub fn artifact_file_name(key: &str, tab: ResultTab) -> String {
    format!("{}_{}.{}", key, ARTIFACT_SUFFIX, tab.as_str())
}

/// Save text data to the filesystem
pub fn save_file_data(data: &[u8], file_path: &Path) -> io::Result<()> {
    let mut file = File::create(file_path)?;
    file.write_all(data)?;
    Ok(())
}

/// Writes one artifact of the cached result
///
/// # Errors
///
/// * `ArtifactError::MissingPayload` if the cache has nothing for `tab`
/// * `ArtifactError::Write` if the file cannot be written
pub fn build_artifact(
    cache: &ResultCache,
    key: &str,
    tab: ResultTab,
    output_dir: &Path,
) -> Result<Artifact, ArtifactError> {
    let content = cache
        .get(tab)
        .ok_or(ArtifactError::MissingPayload(tab.as_str()))?;
    let file_name = artifact_file_name(key, tab);
    let path = output_dir.join(&file_name);

    save_file_data(content.as_bytes(), &path).map_err(|source| ArtifactError::Write {
        path: path.clone(),
        source,
    })?;

    info!("Saved {} artifact: {}", tab, path.display());
    Ok(Artifact {
        tab,
        file_name,
        content_type: tab.content_type(),
        path,
    })
}

/// Writes both artifacts, each independently of the other
///
/// A failed artifact is logged and reported as `None` for its tab.
pub fn materialize(
    cache: &ResultCache,
    key: &str,
    output_dir: &Path,
) -> Vec<(ResultTab, Option<Artifact>)> {
    ResultTab::ALL
        .iter()
        .map(|&tab| match build_artifact(cache, key, tab, output_dir) {
            Ok(artifact) => (tab, Some(artifact)),
            Err(e) => {
                error!("Failed to create {} download: {}", tab, e);
                (tab, None)
            }
        })
        .collect()
}
