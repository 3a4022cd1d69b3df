use crate::core::SavedFile;
use crate::error::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// The "save as" step of a download
#[async_trait::async_trait]
pub trait Saver: Send + Sync {
    /// Store `body` under (a filesystem-safe form of) `file_name`
    async fn save(&self, file_name: &str, body: Vec<u8>) -> Result<SavedFile>;
}

/// Saves downloads into a directory, never overwriting existing files
#[derive(Debug, Clone)]
pub struct FileSaver {
    dir: PathBuf,
}

impl FileSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// First of `name`, `stem (1).ext`, `stem (2).ext`, ... that is free
    async fn available_path(&self, name: &str) -> Result<PathBuf> {
        let candidate = self.dir.join(name);
        if !tokio::fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }

        let path = Path::new(name);
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(name);
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();

        let mut index = 1;
        loop {
            let candidate = self.dir.join(format!("{} ({}){}", stem, index, extension));
            if !tokio::fs::try_exists(&candidate).await? {
                return Ok(candidate);
            }
            index += 1;
        }
    }
}

static PART_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary `.part` file; removed on drop unless it was persisted.
struct PartFile {
    path: PathBuf,
    persisted: bool,
}

impl PartFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            persisted: false,
        }
    }

    /// Fresh part file in `dir`. The name is fixed-length so it stays valid
    /// for any target name the filesystem accepts.
    fn in_dir(dir: &Path) -> Self {
        let n = PART_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::new(dir.join(format!(".ytsave-{}-{}.part", std::process::id(), n)))
    }

    async fn persist(mut self, target: &Path) -> Result<()> {
        tokio::fs::rename(&self.path, target).await?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if self.persisted {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed partial download"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "could not remove partial download"),
        }
    }
}

fn safe_file_name(name: &str) -> String {
    let sanitized = sanitize_filename::sanitize(name);
    let trimmed = sanitized.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        "download".to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait::async_trait]
impl Saver for FileSaver {
    async fn save(&self, file_name: &str, body: Vec<u8>) -> Result<SavedFile> {
        let file_name = safe_file_name(file_name);
        tokio::fs::create_dir_all(&self.dir).await?;
        let target = self.available_path(&file_name).await?;

        let part = PartFile::in_dir(&self.dir);
        tokio::fs::write(&part.path, &body).await?;
        part.persist(&target).await?;

        let file_name = target
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(file_name.as_str())
            .to_string();
        debug!(path = %target.display(), size = body.len(), "saved download");
        Ok(SavedFile {
            file_name,
            path: target,
            size: body.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_save_writes_file_and_no_part_left() {
        let tmp = tempfile::tempdir().unwrap();
        let saver = FileSaver::new(tmp.path());

        let saved = saver.save("video name.mp4", b"abc".to_vec()).await.unwrap();
        assert_eq!(saved.file_name, "video name.mp4");
        assert_eq!(saved.size, 3);
        assert_eq!(std::fs::read(&saved.path).unwrap(), b"abc");
        assert_eq!(dir_entries(tmp.path()), ["video name.mp4"]);
    }

    #[tokio::test]
    async fn test_existing_files_are_not_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let saver = FileSaver::new(tmp.path());

        saver.save("clip.mp3", b"1".to_vec()).await.unwrap();
        let second = saver.save("clip.mp3", b"2".to_vec()).await.unwrap();
        let third = saver.save("clip.mp3", b"3".to_vec()).await.unwrap();

        assert_eq!(second.file_name, "clip (1).mp3");
        assert_eq!(third.file_name, "clip (2).mp3");
        assert_eq!(std::fs::read(tmp.path().join("clip.mp3")).unwrap(), b"1");
    }

    #[tokio::test]
    async fn test_creates_missing_output_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let saver = FileSaver::new(tmp.path().join("music").join("new"));
        let saved = saver.save("a.mp3", Vec::new()).await.unwrap();
        assert!(saved.path.exists());
        assert_eq!(saver.dir, tmp.path().join("music").join("new"));
    }

    #[tokio::test]
    async fn test_save_name_at_filesystem_limit() {
        let tmp = tempfile::tempdir().unwrap();
        let saver = FileSaver::new(tmp.path());
        let name = format!("{}.mp4", "音".repeat(83));
        assert_eq!(name.len(), 253);

        let saved = saver.save(&name, b"abc".to_vec()).await.unwrap();
        assert_eq!(saved.file_name, name);
        assert_eq!(std::fs::read(&saved.path).unwrap(), b"abc");
        assert_eq!(dir_entries(tmp.path()), [name]);
    }

    #[test]
    fn test_part_files_get_distinct_short_names() {
        let tmp = tempfile::tempdir().unwrap();
        let a = PartFile::in_dir(tmp.path());
        let b = PartFile::in_dir(tmp.path());
        assert_ne!(a.path, b.path);
        let name = a.path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(".ytsave-") && name.ends_with(".part"));
    }

    #[test]
    fn test_unpersisted_part_file_is_removed_on_drop() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".x.mp3.part");
        std::fs::write(&path, b"partial").unwrap();
        {
            let _part = PartFile::new(path.clone());
        }
        assert!(!path.exists());

        // Missing file is not an error either.
        drop(PartFile::new(tmp.path().join("never-written")));
    }

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("a/b:c.mp3"), "abc.mp3");
        assert_eq!(safe_file_name(".."), "download");
        assert_eq!(safe_file_name("   "), "download");
        assert_eq!(safe_file_name("Música.mp3"), "Música.mp3");
    }
}
