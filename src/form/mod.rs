//! The download form as an explicit state machine.
//!
//! `FormController` owns every piece of mutable form state: the raw input,
//! the selected mode and qualities, the preview token and the submit flag.
//! Each user or network event maps to one method; the methods never do I/O
//! themselves but hand back the request to issue, which keeps the controller
//! usable from any event loop (see [`crate::session`]).

pub mod debounce;
pub mod messages;
mod mode;
mod preview;
mod submit;
pub mod view;

pub use debounce::Debouncer;
pub use mode::quality_fields;
pub use preview::{PreviewRequest, PreviewToken};
pub use submit::perform_download;
pub use view::{FieldState, FormView, PreviewPanel, PreviewPhase};

use crate::config::Config;
use crate::core::{AudioQuality, DownloadMode, StatusMessage, VideoQuality};
use crate::youtube::extract_video_id;

#[derive(Debug, Clone)]
pub struct FormController {
    input: String,
    mode: DownloadMode,
    audio_quality: AudioQuality,
    video_quality: VideoQuality,
    token: Option<PreviewToken>,
    next_seq: u64,
    submitting: bool,
    view: FormView,
}

impl FormController {
    pub fn new(config: &Config) -> Self {
        let mut controller = Self {
            input: String::new(),
            mode: config.mode,
            audio_quality: config.audio_quality,
            video_quality: config.video_quality,
            token: None,
            next_seq: 0,
            submitting: false,
            view: FormView::default(),
        };
        controller.set_mode(config.mode);
        controller.reset_preview();
        controller
    }

    pub fn view(&self) -> &FormView {
        &self.view
    }

    /// Store the raw field value. Evaluation happens later, once the input
    /// has been quiet for the debounce period.
    pub fn set_input(&mut self, raw: impl Into<String>) {
        self.input = raw.into();
    }

    pub fn mode(&self) -> DownloadMode {
        self.mode
    }

    pub fn video_id(&self) -> Option<String> {
        extract_video_id(self.input.trim())
    }

    pub fn has_valid_url(&self) -> bool {
        self.video_id().is_some()
    }

    fn set_status(&mut self, status: StatusMessage) {
        self.view.status = status;
    }

    fn set_loading(&mut self, loading: bool) {
        self.submitting = loading;
        self.view.submit_enabled = !loading && self.has_valid_url();
        self.view.busy = loading;
        self.view.button_label = if loading {
            messages::BUTTON_BUSY
        } else {
            messages::BUTTON_IDLE
        }
        .to_string();
    }
}
