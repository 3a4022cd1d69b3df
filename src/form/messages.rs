//! Fixed user-facing texts of the form.

pub const URL_GUIDANCE: &str = "Paste a YouTube URL to enable the download.";
pub const URL_VALID: &str = "Valid link detected.";

pub const PREVIEW_LOADING: &str = "Loading preview...";
pub const PREVIEW_LOADED: &str = "Preview loaded. Choose the format and download.";
pub const PREVIEW_FAILED: &str = "Failed to fetch preview.";

pub const INVALID_URL: &str = "Enter a valid YouTube URL.";
pub const DOWNLOAD_STARTING: &str = "Starting download...";
pub const DOWNLOAD_FAILED: &str = "Could not complete the download.";
pub const DOWNLOAD_UNEXPECTED: &str = "Unexpected download error.";
pub const DOWNLOAD_DONE: &str = "Download completed successfully.";

pub const BUTTON_IDLE: &str = "Download";
pub const BUTTON_BUSY: &str = "Processing...";

pub const PLACEHOLDER_TITLE: &str = "Video title";
pub const PLACEHOLDER_CHANNEL: &str = "Channel";
pub const PLACEHOLDER_DURATION: &str = "Duration";

pub const FALLBACK_TITLE: &str = "Untitled";
pub const FALLBACK_CHANNEL: &str = "Unknown channel";
pub const FALLBACK_DURATION: &str = "--:--";
