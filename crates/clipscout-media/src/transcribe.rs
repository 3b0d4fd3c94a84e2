//! Speech-to-text through the Whisper CLI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

use clipscout_models::{TranscriptDocument, TranscriptFragment};

use crate::command::{CommandRunner, ToolCommand};
use crate::error::{MediaError, MediaResult};

/// Turns a local video into ordered, timestamped fragments.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        video_path: &Path,
        workspace: &Path,
    ) -> MediaResult<Vec<TranscriptFragment>>;
}

/// Transcription with the `whisper` command line tool.
#[derive(Debug, Clone)]
pub struct WhisperCliTranscriber {
    binary: String,
    model: String,
    language: Option<String>,
    timeout: Duration,
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl WhisperCliTranscriber {
    pub fn new(binary: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            model: model.into(),
            language: None,
            timeout,
            cancel_rx: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    pub fn build_command(&self, video_path: &Path, output_dir: &Path) -> ToolCommand {
        let cmd = ToolCommand::new(&self.binary)
            .arg(video_path)
            .option("--model", &self.model)
            .option("--output_format", "json")
            .option("--output_dir", output_dir)
            .option("--verbose", "False");
        match &self.language {
            Some(lang) => cmd.option("--language", lang),
            None => cmd,
        }
    }

    fn runner(&self) -> CommandRunner {
        let runner = CommandRunner::new().with_timeout(self.timeout);
        match &self.cancel_rx {
            Some(rx) => runner.with_cancel(rx.clone()),
            None => runner,
        }
    }
}

/// JSON file whisper writes for `video_path` into `output_dir`.
pub fn whisper_output_path(video_path: &Path, output_dir: &Path) -> PathBuf {
    let stem = video_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string());
    output_dir.join(format!("{}.json", stem))
}

/// Parse and validate a whisper JSON document.
pub fn parse_whisper_json(raw: &str) -> MediaResult<Vec<TranscriptFragment>> {
    let doc: TranscriptDocument = serde_json::from_str(raw)?;
    doc.validate()?;
    Ok(doc.segments)
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(
        &self,
        video_path: &Path,
        workspace: &Path,
    ) -> MediaResult<Vec<TranscriptFragment>> {
        if !video_path.exists() {
            return Err(MediaError::FileNotFound(video_path.to_path_buf()));
        }

        info!(
            video = %video_path.display(),
            model = %self.model,
            "Transcribing video"
        );

        let cmd = self.build_command(video_path, workspace);
        match self.runner().run(&cmd).await {
            Ok(_) => {}
            Err(MediaError::CommandFailed {
                stderr, exit_code, ..
            }) => {
                return Err(MediaError::transcription_failed(format!(
                    "whisper exited with {:?}: {}",
                    exit_code,
                    stderr.unwrap_or_default()
                )))
            }
            Err(e) => return Err(e),
        }

        let output = whisper_output_path(video_path, workspace);
        if !output.exists() {
            return Err(MediaError::transcription_failed(format!(
                "whisper did not write {}",
                output.display()
            )));
        }

        let raw = tokio::fs::read_to_string(&output).await?;
        let fragments = parse_whisper_json(&raw)?;
        info!(fragments = fragments.len(), "Transcription complete");
        Ok(fragments)
    }
}
