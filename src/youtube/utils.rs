use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Hosts the download service accepts
pub const YOUTUBE_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtu.be",
    "www.youtu.be",
];

// Tried in order: watch?v=, youtu.be/, /shorts/, /embed/
static VIDEO_ID_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"v=([^&]+)").unwrap(),
        Regex::new(r"youtu\.be/([^?]+)").unwrap(),
        Regex::new(r"youtube\.com/shorts/([^?]+)").unwrap(),
        Regex::new(r"youtube\.com/embed/([^?]+)").unwrap(),
    ]
});

/// Extract the video ID from pasted text.
///
/// The caller trims the input. Returns the first non-empty capture, or `None`
/// for empty input or when no pattern matches.
pub fn extract_video_id(input: &str) -> Option<String> {
    if input.is_empty() {
        return None;
    }

    VIDEO_ID_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(input)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    })
}

/// Check if URL is an http(s) link to one of the known YouTube hosts
pub fn is_youtube_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    parsed
        .host_str()
        .map(|host| YOUTUBE_HOSTS.contains(&host.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Construct YouTube watch URL from video ID
pub fn build_watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_form() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s&list=PL1").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_short_link_form() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=share").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_shorts_and_embed_forms() {
        assert_eq!(
            extract_video_id("https://youtube.com/shorts/abcDEF12345?feature=share").as_deref(),
            Some("abcDEF12345")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/xyz_-987654").as_deref(),
            Some("xyz_-987654")
        );
    }

    #[test]
    fn test_non_matching_inputs() {
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("hello world"), None);
        assert_eq!(extract_video_id("https://vimeo.com/123456"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v="), None);
        assert_eq!(extract_video_id("https://youtu.be/?x=1"), None);
    }

    #[test]
    fn test_is_youtube_url() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=abc"));
        assert!(is_youtube_url("http://music.youtube.com/watch?v=abc"));
        assert!(is_youtube_url("https://YOUTU.BE/abc"));
        assert!(!is_youtube_url("ftp://youtube.com/abc"));
        assert!(!is_youtube_url("https://evil-youtube.com/watch?v=abc"));
        assert!(!is_youtube_url("youtube.com/watch?v=abc"));
    }

    #[test]
    fn test_build_watch_url_round_trips_through_recognizer() {
        let url = build_watch_url("dQw4w9WgXcQ");
        assert_eq!(extract_video_id(&url).as_deref(), Some("dQw4w9WgXcQ"));
    }
}
