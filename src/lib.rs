pub mod config;
pub mod core;
pub mod download;
pub mod error;
pub mod file;
pub mod form;
pub mod session;
pub mod utils;
pub mod youtube;

use std::sync::Arc;

pub use config::Config;
pub use core::{
    AudioQuality, DownloadForm, DownloadMode, PreviewMetadata, SavedFile, StatusKind,
    StatusMessage, VideoQuality,
};
pub use download::{Backend, HttpBackend};
use error::Result;
pub use file::{FileSaver, Saver};
pub use form::{FormController, FormView, PreviewPhase};
pub use session::{FormEvent, Session, SessionHandle};

/// Build a session talking to `config.server` and saving into `config.output_dir`
pub fn connect(config: &Config) -> Result<(Session, SessionHandle)> {
    let backend = Arc::new(HttpBackend::new(config)?);
    let saver = Arc::new(FileSaver::new(config.output_dir.clone()));
    Ok(Session::new(config, backend, saver))
}

/// Ask the backend's `/health` endpoint whether it is up
pub async fn check_server(config: &Config) -> Result<core::HealthStatus> {
    HttpBackend::new(config)?.health().await
}
