use super::FormController;
use super::view::FieldState;
use crate::core::{AudioQuality, DownloadMode, VideoQuality};

/// `(audio, video)` selector states for a mode; exactly one is active.
pub fn quality_fields(mode: DownloadMode) -> (FieldState, FieldState) {
    match mode {
        DownloadMode::Mp3 => (FieldState::ACTIVE, FieldState::INACTIVE),
        DownloadMode::Mp4 => (FieldState::INACTIVE, FieldState::ACTIVE),
    }
}

impl FormController {
    pub fn set_mode(&mut self, mode: DownloadMode) {
        self.mode = mode;
        let (audio, video) = quality_fields(mode);
        self.view.mode = mode;
        self.view.audio_field = audio;
        self.view.video_field = video;
    }

    pub fn set_audio_quality(&mut self, quality: AudioQuality) {
        self.audio_quality = quality;
    }

    pub fn set_video_quality(&mut self, quality: VideoQuality) {
        self.video_quality = quality;
    }
}
