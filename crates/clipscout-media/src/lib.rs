//! Video acquisition and transcription adapters.
//!
//! This crate provides:
//! - [`VideoSource`] with a `yt-dlp` implementation
//! - [`Transcriber`] with a Whisper CLI implementation
//! - A subprocess runner with timeout and cancellation

pub mod command;
pub mod config;
pub mod download;
pub mod error;
pub mod transcribe;

use tokio::sync::watch;

pub use command::{check_tool, CommandOutput, CommandRunner, ToolCommand};
pub use config::MediaConfig;
pub use download::{read_info_json, source_paths, AcquiredVideo, VideoSource, YtDlpSource};
pub use error::{MediaError, MediaResult};
pub use transcribe::{parse_whisper_json, whisper_output_path, Transcriber, WhisperCliTranscriber};

/// Build the CLI-backed collaborators from `config`.
pub fn build_cli_adapters(
    config: &MediaConfig,
    cancel_rx: Option<watch::Receiver<bool>>,
) -> (YtDlpSource, WhisperCliTranscriber) {
    let mut source = YtDlpSource::new(&config.ytdlp_binary, config.ytdlp_timeout);
    let mut transcriber = WhisperCliTranscriber::new(
        &config.whisper_binary,
        &config.whisper_model,
        config.whisper_timeout,
    );
    if let Some(lang) = &config.whisper_language {
        transcriber = transcriber.with_language(lang);
    }
    if let Some(rx) = cancel_rx {
        source = source.with_cancel(rx.clone());
        transcriber = transcriber.with_cancel(rx);
    }
    (source, transcriber)
}
