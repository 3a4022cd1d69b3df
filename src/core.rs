use crate::utils::format_duration;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
pub use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Output container requested from the backend
#[derive(
    EnumIter,
    EnumString,
    Display,
    AsRefStr,
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    Default,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DownloadMode {
    #[default]
    Mp3,
    Mp4,
}

impl DownloadMode {
    /// Anything that is not exactly `mp4` is treated as audio.
    pub fn normalize(value: &str) -> Self {
        if value == "mp4" { Self::Mp4 } else { Self::Mp3 }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DownloadMode::Mp3 => ".mp3",
            DownloadMode::Mp4 => ".mp4",
        }
    }

    /// Name used when the response carries no usable Content-Disposition.
    pub fn fallback_file_name(&self) -> String {
        format!("download{}", self.extension())
    }
}

/// MP3 bitrate in kbps
#[derive(
    EnumIter, EnumString, Display, AsRefStr, Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
)]
pub enum AudioQuality {
    #[strum(serialize = "128")]
    Kbps128,
    #[default]
    #[strum(serialize = "192")]
    Kbps192,
    #[strum(serialize = "256")]
    Kbps256,
}

impl AudioQuality {
    pub fn normalize(value: &str) -> Self {
        value.trim().parse().unwrap_or_default()
    }
}

/// Maximum MP4 height in lines
#[derive(
    EnumIter, EnumString, Display, AsRefStr, Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
)]
pub enum VideoQuality {
    #[strum(serialize = "360")]
    P360,
    #[default]
    #[strum(serialize = "720")]
    P720,
    #[strum(serialize = "1080")]
    P1080,
}

impl VideoQuality {
    pub fn normalize(value: &str) -> Self {
        value.trim().parse().unwrap_or_default()
    }
}

/// Body of a successful `/api/preview` response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PreviewMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DurationValue {
    Seconds(i64),
    Fractional(f64),
    Text(String),
}

// The backend normally sends "M:SS", but raw second counts show up too.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<DurationValue>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        DurationValue::Seconds(secs) => format_duration(secs),
        DurationValue::Fractional(secs) => format_duration(secs as i64),
        DurationValue::Text(text) => text,
    }))
}

/// Body of `/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(EnumIter, Display, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[strum(serialize_all = "lowercase")]
pub enum StatusKind {
    #[default]
    Neutral,
    Success,
    Error,
}

/// The single status line of the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn neutral(text: impl Into<String>) -> Self {
        Self::new(text, StatusKind::Neutral)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, StatusKind::Success)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, StatusKind::Error)
    }

    pub fn clear() -> Self {
        Self::default()
    }

    /// An empty message hides the status line.
    pub fn is_visible(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Everything `/api/download` receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadForm {
    pub url: String,
    pub mode: DownloadMode,
    pub audio_quality: AudioQuality,
    pub video_quality: VideoQuality,
}

impl DownloadForm {
    /// Form fields as submitted. The quality selector of the inactive mode is
    /// disabled and therefore not part of the body.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let quality = match self.mode {
            DownloadMode::Mp3 => ("quality", self.audio_quality.to_string()),
            DownloadMode::Mp4 => ("video_quality", self.video_quality.to_string()),
        };
        vec![
            ("url", self.url.clone()),
            ("mode", self.mode.to_string()),
            quality,
        ]
    }
}

/// Binary body of a successful download plus its Content-Disposition header
#[derive(Debug, Clone, Default)]
pub struct DownloadPayload {
    pub body: Vec<u8>,
    pub disposition: Option<String>,
}

/// Where a payload ended up after the save action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub file_name: String,
    pub path: PathBuf,
    pub size: u64,
}
