pub mod utils;

// Re-export commonly used functions
pub use utils::{YOUTUBE_HOSTS, build_watch_url, extract_video_id, is_youtube_url};
