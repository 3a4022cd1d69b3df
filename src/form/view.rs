use crate::core::{DownloadMode, PreviewMetadata, SavedFile, StatusMessage};
use crate::form::messages;

/// Where the preview lookup for the current input stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Invalid,
    Error,
}

/// Visibility and enabled state of one quality selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldState {
    pub visible: bool,
    pub enabled: bool,
}

impl FieldState {
    pub const ACTIVE: FieldState = FieldState {
        visible: true,
        enabled: true,
    };
    pub const INACTIVE: FieldState = FieldState {
        visible: false,
        enabled: false,
    };
}

/// Title/channel/duration/thumbnail block shown under the URL field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPanel {
    pub visible: bool,
    pub title: String,
    pub channel: String,
    pub duration: String,
    pub thumbnail: Option<String>,
}

impl PreviewPanel {
    pub fn placeholder() -> Self {
        Self {
            visible: false,
            title: messages::PLACEHOLDER_TITLE.to_string(),
            channel: messages::PLACEHOLDER_CHANNEL.to_string(),
            duration: messages::PLACEHOLDER_DURATION.to_string(),
            thumbnail: None,
        }
    }

    /// Fill every field, substituting the fixed fallback for missing or blank values.
    pub fn from_metadata(meta: &PreviewMetadata) -> Self {
        fn or_fallback(value: &Option<String>, fallback: &str) -> String {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_string()
        }

        Self {
            visible: true,
            title: or_fallback(&meta.title, messages::FALLBACK_TITLE),
            channel: or_fallback(&meta.channel, messages::FALLBACK_CHANNEL),
            duration: format!(
                "Duration: {}",
                or_fallback(&meta.duration, messages::FALLBACK_DURATION)
            ),
            thumbnail: meta.thumbnail.clone().filter(|t| !t.is_empty()),
        }
    }
}

impl Default for PreviewPanel {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Snapshot of everything the page shows. Front ends render this and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub url_feedback: String,
    pub mode: DownloadMode,
    pub audio_field: FieldState,
    pub video_field: FieldState,
    pub submit_enabled: bool,
    pub busy: bool,
    pub button_label: String,
    pub status: StatusMessage,
    pub preview: PreviewPanel,
    pub phase: PreviewPhase,
    /// Bumped every time a submission ends, whether rejected, failed or saved
    pub submissions: u64,
    pub last_saved: Option<SavedFile>,
}

impl Default for FormView {
    fn default() -> Self {
        Self {
            url_feedback: messages::URL_GUIDANCE.to_string(),
            mode: DownloadMode::default(),
            audio_field: FieldState::ACTIVE,
            video_field: FieldState::INACTIVE,
            submit_enabled: false,
            busy: false,
            button_label: messages::BUTTON_IDLE.to_string(),
            status: StatusMessage::clear(),
            preview: PreviewPanel::placeholder(),
            phase: PreviewPhase::Idle,
            submissions: 0,
            last_saved: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_fallbacks() {
        let panel = PreviewPanel::from_metadata(&PreviewMetadata {
            title: Some(String::new()),
            ..Default::default()
        });
        assert!(panel.visible);
        assert_eq!(panel.title, messages::FALLBACK_TITLE);
        assert_eq!(panel.channel, messages::FALLBACK_CHANNEL);
        assert_eq!(panel.duration, "Duration: --:--");
        assert_eq!(panel.thumbnail, None);
    }

    #[test]
    fn test_panel_from_full_metadata() {
        let panel = PreviewPanel::from_metadata(&PreviewMetadata {
            title: Some("Song".into()),
            channel: Some("Band".into()),
            duration: Some("4:01".into()),
            thumbnail: Some("https://i.ytimg.com/vi/x/hq720.jpg".into()),
        });
        assert_eq!(panel.title, "Song");
        assert_eq!(panel.duration, "Duration: 4:01");
        assert_eq!(panel.thumbnail.as_deref(), Some("https://i.ytimg.com/vi/x/hq720.jpg"));
    }
}
