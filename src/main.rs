use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use whisper_uploader::config_loader::load_config;
use whisper_uploader::config_validator::{validators, ClientConfigValidator};
use whisper_uploader::{ConsoleView, ResultTab, SubmissionForm, UploadController};

/// Upload recordings to a transcription server and save the transcripts
#[derive(Parser, Debug)]
#[command(name = "whisper_uploader", version, about)]
struct Cli {
    /// Media files to transcribe, submitted one after another
    files: Vec<PathBuf>,

    /// Transcription model (empty = configured default)
    #[arg(long, default_value = "")]
    model: String,

    /// Detection threshold (empty = placeholder default)
    #[arg(long, default_value = "")]
    threshold: String,

    /// Minimum silence duration (empty = placeholder default)
    #[arg(long, default_value = "")]
    min_duration_off: String,

    /// Minimum number of speakers (empty = placeholder default)
    #[arg(long, default_value = "")]
    min_speakers: String,

    /// Maximum number of speakers (empty = placeholder default)
    #[arg(long, default_value = "")]
    max_speakers: String,

    /// Server base URL, overrides WHISPER_UPLOADER_SERVER_URL
    #[arg(long)]
    server: Option<String>,

    /// Directory for the downloaded transcripts
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Transcript shown once a job completes
    #[arg(long, value_enum, default_value_t = ResultTab::Txt)]
    show: ResultTab,

    /// Print a sample configuration file and exit
    #[arg(long)]
    sample_config: bool,

    /// Print the configuration reference and exit
    #[arg(long)]
    config_docs: bool,
}

impl Cli {
    fn forms(&self) -> Vec<SubmissionForm> {
        let template = SubmissionForm {
            file: None,
            model: self.model.clone(),
            threshold: self.threshold.clone(),
            min_duration_off: self.min_duration_off.clone(),
            min_speakers: self.min_speakers.clone(),
            max_speakers: self.max_speakers.clone(),
        };

        if self.files.is_empty() {
            // Still submitted so the missing file is reported like any other error
            return vec![template];
        }

        self.files
            .iter()
            .map(|file| SubmissionForm {
                file: Some(file.clone()),
                ..template.clone()
            })
            .collect()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.sample_config {
        print!("{}", ClientConfigValidator::generate_sample_config());
        return ExitCode::SUCCESS;
    }
    if cli.config_docs {
        print!("{}", ClientConfigValidator::generate_config_documentation());
        return ExitCode::SUCCESS;
    }

    load_config();
    let mut config = match ClientConfigValidator::validate_and_load() {
        Ok(config) => config,
        Err(_) => return ExitCode::FAILURE,
    };

    if let Some(server) = &cli.server {
        match validators::validate_url("--server", server) {
            Ok(url) => config.server_url = url,
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output_dir = output_dir.clone();
    }

    info!("Transcription server: {}", config.server_url);
    info!("Poll interval: {:?}", config.poll_interval);
    info!("Output directory: {}", config.output_dir.display());

    let mut controller = match UploadController::new(config, ConsoleView::default()) {
        Ok(controller) => controller,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut failed = false;
    for form in cli.forms() {
        match controller.submit(&form).await {
            Ok(completion) => {
                if controller.active_tab() != cli.show {
                    controller.select_tab(cli.show.as_str());
                }
                info!("Job {} finished", completion.key);
            }
            Err(_) => failed = true,
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
