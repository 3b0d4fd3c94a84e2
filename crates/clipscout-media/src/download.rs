//! Video acquisition using yt-dlp.
//!
//! Downloads a merged mp4 into the candidate workspace as `source.mp4` and
//! reads the info JSON yt-dlp writes next to it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info};

use clipscout_models::VideoMetadata;

use crate::command::{CommandRunner, ToolCommand};
use crate::error::{MediaError, MediaResult};

/// File stem of the downloaded video inside a workspace.
pub const SOURCE_STEM: &str = "source";

/// Preferred format: separate mp4 video and m4a audio, else any mp4.
const FORMAT_SELECTOR: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/mp4";

/// A local video and what the source reported about it.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquiredVideo {
    pub video_path: PathBuf,
    pub metadata: VideoMetadata,
}

/// Fetches a source video into a workspace directory.
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn acquire(&self, url: &str, workspace: &Path) -> MediaResult<AcquiredVideo>;
}

/// Acquisition through the `yt-dlp` CLI.
#[derive(Debug, Clone)]
pub struct YtDlpSource {
    binary: String,
    timeout: Duration,
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl YtDlpSource {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
            cancel_rx: None,
        }
    }

    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    pub fn build_command(&self, url: &str, workspace: &Path) -> ToolCommand {
        let template = workspace.join(format!("{}.%(ext)s", SOURCE_STEM));
        ToolCommand::new(&self.binary)
            .option("-f", FORMAT_SELECTOR)
            .option("--merge-output-format", "mp4")
            .arg("--write-info-json")
            .arg("--no-playlist")
            .arg("--no-progress")
            .option("-o", template)
            .arg(url)
    }

    fn runner(&self) -> CommandRunner {
        let runner = CommandRunner::new().with_timeout(self.timeout);
        match &self.cancel_rx {
            Some(rx) => runner.with_cancel(rx.clone()),
            None => runner,
        }
    }
}

/// Paths yt-dlp writes for [`SOURCE_STEM`] in `workspace`.
pub fn source_paths(workspace: &Path) -> (PathBuf, PathBuf) {
    (
        workspace.join(format!("{}.mp4", SOURCE_STEM)),
        workspace.join(format!("{}.info.json", SOURCE_STEM)),
    )
}

/// Read the subset of yt-dlp's info JSON kept as [`VideoMetadata`].
pub async fn read_info_json(path: &Path) -> MediaResult<VideoMetadata> {
    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

#[async_trait]
impl VideoSource for YtDlpSource {
    async fn acquire(&self, url: &str, workspace: &Path) -> MediaResult<AcquiredVideo> {
        let (video_path, info_path) = source_paths(workspace);

        if video_path.exists() && info_path.exists() {
            info!(path = %video_path.display(), "Using existing video file");
            let metadata = read_info_json(&info_path).await?;
            return Ok(AcquiredVideo {
                video_path,
                metadata,
            });
        }

        tokio::fs::create_dir_all(workspace).await?;
        info!(url = %url, workspace = %workspace.display(), "Downloading video");

        let cmd = self.build_command(url, workspace);
        match self.runner().run(&cmd).await {
            Ok(output) => debug!(stdout = %output.stdout.trim(), "yt-dlp finished"),
            Err(MediaError::CommandFailed {
                stderr, exit_code, ..
            }) => {
                return Err(MediaError::download_failed(format!(
                    "yt-dlp exited with {:?}: {}",
                    exit_code,
                    stderr.unwrap_or_default()
                )))
            }
            Err(e) => return Err(e),
        }

        if !video_path.exists() {
            return Err(MediaError::download_failed(format!(
                "yt-dlp reported success but {} is missing",
                video_path.display()
            )));
        }

        let metadata = read_info_json(&info_path).await?;
        info!(
            path = %video_path.display(),
            title = metadata.title.as_deref().unwrap_or(""),
            duration = metadata.duration.unwrap_or_default(),
            "Video acquired"
        );

        Ok(AcquiredVideo {
            video_path,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_command() {
        let source = YtDlpSource::new("yt-dlp", Duration::from_secs(60));
        let cmd = source.build_command("https://youtu.be/abc", Path::new("/work/abc"));
        let args: Vec<String> = cmd
            .build_args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(args.last().map(String::as_str), Some("https://youtu.be/abc"));
        assert!(args.contains(&"--write-info-json".to_string()));
        assert!(args.contains(&FORMAT_SELECTOR.to_string()));
        assert!(args.contains(&"/work/abc/source.%(ext)s".to_string()));
    }

    #[tokio::test]
    async fn test_reuses_existing_download() {
        let dir = tempfile::tempdir().unwrap();
        let (video, info) = source_paths(dir.path());
        tokio::fs::write(&video, b"fake").await.unwrap();
        tokio::fs::write(
            &info,
            r#"{"id": "abc", "title": "Cached", "duration": 61.5, "formats": []}"#,
        )
        .await
        .unwrap();

        let source = YtDlpSource::new("clipscout-missing-ytdlp", Duration::from_secs(1));
        let acquired = source.acquire("https://youtu.be/abc", dir.path()).await.unwrap();
        assert_eq!(acquired.video_path, video);
        assert_eq!(acquired.metadata.title.as_deref(), Some("Cached"));
        assert_eq!(acquired.metadata.duration, Some(61.5));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let source = YtDlpSource::new("clipscout-missing-ytdlp", Duration::from_secs(1));
        assert!(matches!(
            source.acquire("https://youtu.be/abc", dir.path()).await,
            Err(MediaError::ToolNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_read_info_json_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_info_json(&dir.path().join("nope.info.json")).await,
            Err(MediaError::FileNotFound(_))
        ));
    }
}
