use crate::core::{AudioQuality, DownloadMode, VideoQuality};
use std::path::PathBuf;
use std::time::Duration;

/// Address the bundled launcher serves the web app on
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";

/// Quiet period between the last keystroke and the preview lookup
pub const PREVIEW_DEBOUNCE: Duration = Duration::from_millis(280);

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL serving `/api/preview`, `/api/download` and `/health`
    pub server: String,
    pub debounce: Duration,
    /// `None` leaves requests unbounded, so a hung backend keeps the form
    /// loading until the transport gives up.
    pub request_timeout: Option<Duration>,
    pub output_dir: PathBuf,
    pub mode: DownloadMode,
    pub audio_quality: AudioQuality,
    pub video_quality: VideoQuality,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            debounce: PREVIEW_DEBOUNCE,
            request_timeout: None,
            output_dir: PathBuf::from("."),
            mode: DownloadMode::default(),
            audio_quality: AudioQuality::default(),
            video_quality: VideoQuality::default(),
        }
    }
}
