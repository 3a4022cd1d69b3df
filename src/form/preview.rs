use super::FormController;
use super::messages;
use super::view::{PreviewPanel, PreviewPhase};
use crate::core::{PreviewMetadata, StatusMessage};
use crate::error::Result;

/// Identifies one preview lookup. Only the newest token may touch the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewToken {
    pub seq: u64,
    pub video_id: String,
}

/// A lookup the caller must perform, then report through
/// [`FormController::apply_preview`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub token: PreviewToken,
    /// Trimmed input, sent as-is to the backend
    pub url: String,
}

impl FormController {
    pub fn preview_token(&self) -> Option<&PreviewToken> {
        self.token.as_ref()
    }

    /// Re-read the input after the debounce period.
    ///
    /// Returns the request to issue when the input names a video that is not
    /// already loaded or loading.
    pub fn evaluate_input(&mut self) -> Option<PreviewRequest> {
        let value = self.input.trim().to_string();
        let Some(video_id) = self.video_id() else {
            self.reset_preview();
            self.set_status(StatusMessage::clear());
            self.view.url_feedback = messages::URL_GUIDANCE.to_string();
            self.view.submit_enabled = false;
            self.view.phase = PreviewPhase::Invalid;
            self.token = None;
            return None;
        };

        self.view.url_feedback = messages::URL_VALID.to_string();
        self.view.submit_enabled = !self.submitting;

        if self
            .token
            .as_ref()
            .is_some_and(|token| token.video_id == video_id)
        {
            return None;
        }

        self.next_seq += 1;
        let token = PreviewToken {
            seq: self.next_seq,
            video_id,
        };
        self.token = Some(token.clone());
        self.view.phase = PreviewPhase::Loading;
        self.set_status(StatusMessage::neutral(messages::PREVIEW_LOADING));

        Some(PreviewRequest { token, url: value })
    }

    /// Apply a settled lookup. Results for any token but the current one are
    /// dropped without touching the form; returns whether it was applied.
    pub fn apply_preview(&mut self, token: &PreviewToken, result: Result<PreviewMetadata>) -> bool {
        if self.token.as_ref() != Some(token) {
            return false;
        }

        match result {
            Ok(meta) => {
                self.view.preview = PreviewPanel::from_metadata(&meta);
                self.view.phase = PreviewPhase::Loaded;
                self.set_status(StatusMessage::success(messages::PREVIEW_LOADED));
            }
            Err(e) => {
                self.reset_preview();
                self.view.phase = PreviewPhase::Error;
                let text = e.status_text();
                let text = if text.is_empty() {
                    messages::PREVIEW_FAILED.to_string()
                } else {
                    text
                };
                self.set_status(StatusMessage::error(text));
                self.view.submit_enabled = false;
            }
        }
        true
    }

    pub(super) fn reset_preview(&mut self) {
        self.view.preview = PreviewPanel::placeholder();
    }
}
