use crate::core::DownloadMode;
use regex::Regex;
use std::sync::LazyLock;

static FILENAME_STAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)filename\*=UTF-8''([^;]+)").unwrap());
static FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)filename="?([^";]+)"?"#).unwrap());
static ANSI_ESCAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-?]*[ -/]*[@-~]").unwrap());

/// Percent-decode a header filename, keeping the raw value if it does not
/// decode to UTF-8.
pub fn decode_file_name(value: &str) -> String {
    urlencoding::decode(value)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

/// Pick the filename for a downloaded payload.
///
/// `filename*=UTF-8''...` wins over `filename=...`; without either the name
/// falls back to `download.mp3` / `download.mp4`.
pub fn file_name_from_disposition(disposition: Option<&str>, mode: DownloadMode) -> String {
    if let Some(disposition) = disposition {
        if let Some(name) = FILENAME_STAR_RE
            .captures(disposition)
            .and_then(|c| c.get(1))
        {
            return decode_file_name(name.as_str());
        }

        if let Some(name) = FILENAME_RE.captures(disposition).and_then(|c| c.get(1)) {
            return decode_file_name(name.as_str());
        }
    }

    mode.fallback_file_name()
}

/// Strip terminal escapes and collapse whitespace in a server message.
pub fn sanitize_message(message: &str) -> String {
    let cleaned = ANSI_ESCAPE_RE.replace_all(message, "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return "--:--".to_string();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
