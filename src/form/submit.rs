use super::FormController;
use super::messages;
use crate::core::{DownloadForm, SavedFile, StatusMessage};
use crate::download::Backend;
use crate::error::Result;
use crate::file::Saver;
use crate::utils::file_name_from_disposition;
use tracing::debug;

impl FormController {
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Handle the submit action.
    ///
    /// Returns the form to send, or `None` when nothing may be requested: an
    /// input without a video ID (an error is shown) or a download that is
    /// still running (the event is dropped).
    ///
    /// `submit_enabled` is only a hint for front ends. The input is checked
    /// again here, so a valid link is accepted even after a failed preview
    /// or before the debounced evaluation has run.
    pub fn begin_submit(&mut self) -> Option<DownloadForm> {
        if self.submitting {
            return None;
        }

        if self.video_id().is_none() {
            self.set_status(StatusMessage::error(messages::INVALID_URL));
            self.view.submissions += 1;
            return None;
        }

        self.set_loading(true);
        self.set_status(StatusMessage::neutral(messages::DOWNLOAD_STARTING));

        Some(DownloadForm {
            url: self.input.clone(),
            mode: self.mode,
            audio_quality: self.audio_quality,
            video_quality: self.video_quality,
        })
    }

    /// Report how the download ended. The loading state is always left and
    /// submit availability follows the current input again.
    pub fn finish_submit(&mut self, result: Result<SavedFile>) {
        match result {
            Ok(saved) => {
                self.set_status(StatusMessage::success(messages::DOWNLOAD_DONE));
                self.view.last_saved = Some(saved);
            }
            Err(e) => {
                let text = e.status_text();
                let text = if text.is_empty() {
                    messages::DOWNLOAD_UNEXPECTED.to_string()
                } else {
                    text
                };
                self.set_status(StatusMessage::error(text));
            }
        }
        self.set_loading(false);
        self.view.submissions += 1;
    }
}

/// Fetch the payload for `form`, name it from the response and save it.
pub async fn perform_download(
    backend: &dyn Backend,
    saver: &dyn Saver,
    form: &DownloadForm,
) -> Result<SavedFile> {
    let payload = backend.download(form).await?;
    let file_name = file_name_from_disposition(payload.disposition.as_deref(), form.mode);
    debug!(%file_name, bytes = payload.body.len(), "download received");
    saver.save(&file_name, payload.body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::{
        AudioQuality, DownloadMode, DownloadPayload, HealthStatus, PreviewMetadata, StatusKind,
        VideoQuality,
    };
    use crate::error::YtSaveError;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    const URL: &str = "https://youtu.be/dQw4w9WgXcQ";

    struct StaticBackend {
        disposition: Option<String>,
    }

    #[async_trait]
    impl Backend for StaticBackend {
        async fn preview(&self, _url: &str) -> Result<PreviewMetadata> {
            Ok(PreviewMetadata::default())
        }

        async fn download(&self, _form: &DownloadForm) -> Result<DownloadPayload> {
            Ok(DownloadPayload {
                body: b"data".to_vec(),
                disposition: self.disposition.clone(),
            })
        }

        async fn health(&self) -> Result<HealthStatus> {
            Err(YtSaveError::RequestTimeout("/health".into()))
        }
    }

    #[derive(Default)]
    struct RecordingSaver {
        names: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Saver for RecordingSaver {
        async fn save(&self, file_name: &str, body: Vec<u8>) -> Result<SavedFile> {
            self.names.lock().unwrap().push(file_name.to_string());
            Ok(SavedFile {
                file_name: file_name.to_string(),
                path: PathBuf::from(file_name),
                size: body.len() as u64,
            })
        }
    }

    fn saved(name: &str) -> SavedFile {
        SavedFile {
            file_name: name.to_string(),
            path: PathBuf::from(name),
            size: 4,
        }
    }

    #[test]
    fn test_invalid_input_never_builds_a_request() {
        let mut form = FormController::new(&Config::default());
        assert!(form.begin_submit().is_none());
        assert_eq!(form.view().status, StatusMessage::error(messages::INVALID_URL));
        assert!(!form.view().busy);

        form.set_input("https://example.com/video");
        assert!(form.begin_submit().is_none());
        assert_eq!(form.view().submissions, 2);
    }

    #[test]
    fn test_submit_enters_loading_state() {
        let mut form = FormController::new(&Config::default());
        form.set_input(URL);
        form.set_mode(DownloadMode::Mp4);
        form.set_video_quality(VideoQuality::P1080);
        form.set_audio_quality(AudioQuality::Kbps128);

        let request = form.begin_submit().unwrap();
        assert_eq!(request.url, URL);
        assert_eq!(request.mode, DownloadMode::Mp4);
        assert_eq!(request.video_quality, VideoQuality::P1080);

        let view = form.view();
        assert!(view.busy);
        assert!(!view.submit_enabled);
        assert_eq!(view.button_label, messages::BUTTON_BUSY);
        assert_eq!(view.status, StatusMessage::neutral(messages::DOWNLOAD_STARTING));

        assert!(form.is_submitting());
        assert!(form.begin_submit().is_none());
    }

    #[test]
    fn test_submit_revalidates_instead_of_trusting_enabled_flag() {
        let mut form = FormController::new(&Config::default());
        form.set_input(URL);
        let request = form.evaluate_input().unwrap();
        form.apply_preview(
            &request.token,
            Err(YtSaveError::RequestTimeout("/api/preview".into())),
        );
        assert!(!form.view().submit_enabled);
        assert!(form.begin_submit().is_some());

        // Not yet evaluated by the debouncer either.
        let mut form = FormController::new(&Config::default());
        form.set_input(URL);
        assert!(!form.view().submit_enabled);
        assert!(form.begin_submit().is_some());
    }

    #[test]
    fn test_success_leaves_loading() {
        let mut form = FormController::new(&Config::default());
        form.set_input(URL);
        form.begin_submit().unwrap();
        form.finish_submit(Ok(saved("song.mp3")));

        let view = form.view();
        assert!(!view.busy);
        assert!(view.submit_enabled);
        assert_eq!(view.button_label, messages::BUTTON_IDLE);
        assert_eq!(view.status, StatusMessage::success(messages::DOWNLOAD_DONE));
        assert_eq!(view.last_saved.as_ref().unwrap().file_name, "song.mp3");
        assert_eq!(view.submissions, 1);
    }

    #[test]
    fn test_failure_reenables_submit_for_valid_input() {
        let mut form = FormController::new(&Config::default());
        form.set_input(URL);
        form.begin_submit().unwrap();
        form.finish_submit(Err(YtSaveError::ServerError {
            status: 500,
            message: "Download failed: ffmpeg not found".into(),
        }));

        let view = form.view();
        assert!(view.submit_enabled);
        assert!(!view.busy);
        assert_eq!(view.status.kind, StatusKind::Error);
        assert_eq!(view.status.text, "Download failed: ffmpeg not found");
    }

    #[test]
    fn test_failure_after_input_cleared_keeps_submit_disabled() {
        let mut form = FormController::new(&Config::default());
        form.set_input(URL);
        form.begin_submit().unwrap();
        form.set_input("");
        form.finish_submit(Err(YtSaveError::ServerError {
            status: 500,
            message: String::new(),
        }));
        assert!(!form.view().submit_enabled);
        assert_eq!(form.view().status.text, messages::DOWNLOAD_UNEXPECTED);
    }

    #[tokio::test]
    async fn test_perform_download_names_file_from_header() {
        let backend = StaticBackend {
            disposition: Some("attachment; filename*=UTF-8''video%20name.mp4".into()),
        };
        let saver = RecordingSaver::default();
        let form = DownloadForm {
            url: URL.into(),
            mode: DownloadMode::Mp4,
            audio_quality: AudioQuality::default(),
            video_quality: VideoQuality::default(),
        };

        let saved = perform_download(&backend, &saver, &form).await.unwrap();
        assert_eq!(saved.file_name, "video name.mp4");
        assert_eq!(saved.size, 4);
    }

    #[tokio::test]
    async fn test_perform_download_falls_back_to_mode_name() {
        let backend = StaticBackend { disposition: None };
        let saver = RecordingSaver::default();
        let form = DownloadForm {
            url: URL.into(),
            mode: DownloadMode::Mp3,
            audio_quality: AudioQuality::default(),
            video_quality: VideoQuality::default(),
        };

        perform_download(&backend, &saver, &form).await.unwrap();
        assert_eq!(*saver.names.lock().unwrap(), ["download.mp3"]);
    }
}
