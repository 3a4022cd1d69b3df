//! Event loop around [`FormController`].
//!
//! One task owns the controller, the debounce timer and every in-flight
//! request. Requests are polled inside that task (no spawning), so all state
//! changes happen in response to one discrete event at a time: an input from
//! a [`SessionHandle`], the debounce deadline, or a request settling.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::config::Config;
use crate::core::{AudioQuality, DownloadMode, PreviewMetadata, SavedFile, VideoQuality};
use crate::download::Backend;
use crate::error::Result;
use crate::file::Saver;
use crate::form::{Debouncer, FormController, FormView, PreviewRequest, PreviewToken, perform_download};

/// What the user can do to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Input(String),
    Mode(DownloadMode),
    AudioQuality(AudioQuality),
    VideoQuality(VideoQuality),
    Submit,
}

enum Settlement {
    Preview {
        token: PreviewToken,
        result: Result<PreviewMetadata>,
    },
    Download(Result<SavedFile>),
}

pub struct Session {
    controller: FormController,
    backend: Arc<dyn Backend>,
    saver: Arc<dyn Saver>,
    debouncer: Debouncer,
    events: mpsc::UnboundedReceiver<FormEvent>,
    in_flight: FuturesUnordered<BoxFuture<'static, Settlement>>,
    view: watch::Sender<FormView>,
}

/// Sending side of a session plus a subscription to its view
#[derive(Debug, Clone)]
pub struct SessionHandle {
    events: mpsc::UnboundedSender<FormEvent>,
    view: watch::Receiver<FormView>,
}

impl SessionHandle {
    /// Returns `false` once the session has stopped.
    pub fn send(&self, event: FormEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn input(&self, value: impl Into<String>) -> bool {
        self.send(FormEvent::Input(value.into()))
    }

    pub fn submit(&self) -> bool {
        self.send(FormEvent::Submit)
    }

    /// Current snapshot
    pub fn view(&self) -> FormView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormView> {
        self.view.clone()
    }
}

impl Session {
    pub fn new(
        config: &Config,
        backend: Arc<dyn Backend>,
        saver: Arc<dyn Saver>,
    ) -> (Self, SessionHandle) {
        let controller = FormController::new(config);
        let (view_tx, view_rx) = watch::channel(controller.view().clone());
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let session = Self {
            controller,
            backend,
            saver,
            debouncer: Debouncer::new(config.debounce),
            events: events_rx,
            in_flight: FuturesUnordered::new(),
            view: view_tx,
        };
        let handle = SessionHandle {
            events: events_tx,
            view: view_rx,
        };
        (session, handle)
    }

    /// Process events until every handle is dropped and the requests still
    /// running have settled; returns the final view.
    pub async fn run(mut self) -> FormView {
        let mut closed = false;
        loop {
            if closed && self.in_flight.is_empty() {
                break;
            }

            tokio::select! {
                event = self.events.recv(), if !closed => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        debug!(pending = self.in_flight.len(), "all handles dropped");
                        closed = true;
                        self.debouncer.cancel();
                    }
                },
                () = self.debouncer.fired(), if self.debouncer.is_pending() => {
                    self.evaluate_input()
                }
                Some(settlement) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.settle(settlement)
                }
            }

            self.publish();
        }
        self.controller.view().clone()
    }

    fn handle_event(&mut self, event: FormEvent) {
        match event {
            FormEvent::Input(value) => {
                self.controller.set_input(value);
                self.debouncer.trigger();
            }
            FormEvent::Mode(mode) => self.controller.set_mode(mode),
            FormEvent::AudioQuality(quality) => self.controller.set_audio_quality(quality),
            FormEvent::VideoQuality(quality) => self.controller.set_video_quality(quality),
            FormEvent::Submit => {
                if let Some(form) = self.controller.begin_submit() {
                    debug!(url = %form.url, mode = %form.mode, "submitting download");
                    let backend = Arc::clone(&self.backend);
                    let saver = Arc::clone(&self.saver);
                    self.in_flight.push(
                        async move {
                            let result =
                                perform_download(backend.as_ref(), saver.as_ref(), &form).await;
                            Settlement::Download(result)
                        }
                        .boxed(),
                    );
                }
            }
        }
    }

    fn evaluate_input(&mut self) {
        if let Some(PreviewRequest { token, url }) = self.controller.evaluate_input() {
            debug!(seq = token.seq, video_id = %token.video_id, "requesting preview");
            let backend = Arc::clone(&self.backend);
            self.in_flight.push(
                async move {
                    let result = backend.preview(&url).await;
                    Settlement::Preview { token, result }
                }
                .boxed(),
            );
        }
    }

    fn settle(&mut self, settlement: Settlement) {
        match settlement {
            Settlement::Preview { token, result } => {
                if !self.controller.apply_preview(&token, result) {
                    debug!(
                        seq = token.seq,
                        current = ?self.controller.preview_token().map(|t| t.seq),
                        video_id = %token.video_id,
                        "discarded stale preview"
                    );
                }
            }
            Settlement::Download(result) => {
                if let Err(e) = &result {
                    debug!(error = %e, "download failed");
                }
                self.controller.finish_submit(result);
            }
        }
    }

    fn publish(&self) {
        let current = self.controller.view();
        self.view.send_if_modified(|view| {
            if *view == *current {
                false
            } else {
                *view = current.clone();
                true
            }
        });
    }
}
