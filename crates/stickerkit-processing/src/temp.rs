//! Scratch files for the external encoder.
//!
//! Every animated conversion gets its own input/output pair under the temp
//! directory, named from a fresh job id. Both files are `tempfile::TempPath`s:
//! [`ScopedPaths::release`] closes them and logs any failure, and if the owning
//! task is cancelled first their `Drop` removes them instead.

use std::ffi::OsStr;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use stickerkit_core::{generate_job_id, StickerError};
use tempfile::{Builder, TempPath};

/// Allocates and releases per-job temp files under one directory.
#[derive(Debug, Clone)]
pub struct TempResourceManager {
    dir: PathBuf,
}

impl TempResourceManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the temp directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Fresh, collision-free file stem for `base` (`gif`, `video`, ...).
    pub fn allocate(&self, base: &str) -> String {
        generate_job_id(base)
    }

    /// Create `{stem}.{input_ext}` and `{stem}.{output_ext}` in the temp directory.
    ///
    /// Both files exist (empty) once this returns; an existing file with the
    /// same name is an error, never reused.
    pub fn scoped_paths(
        &self,
        stem: &str,
        input_ext: &str,
        output_ext: &str,
    ) -> io::Result<ScopedPaths> {
        let input = self.create(stem, input_ext)?;
        let output = self.create(stem, output_ext)?;
        Ok(ScopedPaths {
            job_id: stem.to_string(),
            input,
            output,
        })
    }

    fn create(&self, stem: &str, ext: &str) -> io::Result<TempPath> {
        let suffix = format!(".{}", ext);
        Builder::new()
            .prefix(stem)
            .suffix(&suffix)
            .rand_bytes(0)
            .tempfile_in(&self.dir)
            .map(|file| file.into_temp_path())
    }

    /// Delete every path. Missing files are fine; other failures are logged
    /// and never returned.
    pub fn release_all(paths: impl IntoIterator<Item = TempPath>) {
        for path in paths {
            let shown = path.display().to_string();
            match path.close() {
                Ok(()) => tracing::debug!(path = %shown, "Removed temp file"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => StickerError::ResourceCleanupFailed {
                    path: shown,
                    reason: e.to_string(),
                }
                .report("Temp file cleanup failed"),
            }
        }
    }
}

/// Input/output pair owned by one conversion.
#[derive(Debug)]
pub struct ScopedPaths {
    job_id: String,
    input: TempPath,
    output: TempPath,
}

impl ScopedPaths {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// File name of the staged input, e.g. `gif_1700000000000_ab12....gif`.
    pub fn input_file_name(&self) -> String {
        self.input
            .file_name()
            .map(OsStr::to_string_lossy)
            .map(|name| name.into_owned())
            .unwrap_or_else(|| self.job_id.clone())
    }

    /// Delete both files. Consumes the guard, so it runs at most once; an
    /// unreleased guard is cleaned up by `TempPath`'s own `Drop`.
    pub fn release(self) {
        TempResourceManager::release_all([self.input, self.output]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_share_job_stem() {
        let dir = TempDir::new().unwrap();
        let manager = TempResourceManager::new(dir.path());
        let stem = manager.allocate("gif");
        let paths = manager.scoped_paths(&stem, "gif", "webp").unwrap();

        assert!(stem.starts_with("gif_"));
        assert_eq!(paths.input(), dir.path().join(format!("{}.gif", stem)));
        assert_eq!(paths.output(), dir.path().join(format!("{}.webp", stem)));
        assert_eq!(paths.input_file_name(), format!("{}.gif", stem));
        assert_eq!(paths.job_id(), stem);
        assert!(paths.input().exists());
        assert!(paths.output().exists());
    }

    #[test]
    fn test_allocations_never_collide() {
        let manager = TempResourceManager::new("temp");
        let a = manager.allocate("video");
        let b = manager.allocate("video");
        assert_ne!(a, b);
    }

    #[test]
    fn test_existing_name_is_not_reused() {
        let dir = TempDir::new().unwrap();
        let manager = TempResourceManager::new(dir.path());
        let _first = manager.scoped_paths("video_1_x", "mp4", "webp").unwrap();
        assert!(manager.scoped_paths("video_1_x", "mp4", "webp").is_err());
    }

    #[test]
    fn test_release_removes_both_files() {
        let dir = TempDir::new().unwrap();
        let manager = TempResourceManager::new(dir.path());
        let paths = manager
            .scoped_paths(&manager.allocate("video"), "mp4", "webp")
            .unwrap();
        std::fs::write(paths.input(), b"in").unwrap();
        std::fs::write(paths.output(), b"out").unwrap();
        let (input, output) = (paths.input().to_path_buf(), paths.output().to_path_buf());

        paths.release();

        assert!(!input.exists());
        assert!(!output.exists());
    }

    #[test]
    fn test_release_tolerates_missing_files() {
        let dir = TempDir::new().unwrap();
        let manager = TempResourceManager::new(dir.path());
        let paths = manager
            .scoped_paths(&manager.allocate("gif"), "gif", "webp")
            .unwrap();
        let input = paths.input().to_path_buf();
        std::fs::remove_file(paths.output()).unwrap();

        paths.release();
        assert!(!input.exists());
    }

    #[test]
    fn test_drop_cleans_up_unreleased_paths() {
        let dir = TempDir::new().unwrap();
        let manager = TempResourceManager::new(dir.path());
        let paths = manager
            .scoped_paths(&manager.allocate("gif"), "gif", "webp")
            .unwrap();
        std::fs::write(paths.input(), b"in").unwrap();
        let (input, output) = (paths.input().to_path_buf(), paths.output().to_path_buf());

        drop(paths);
        assert!(!input.exists());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_cancelled_job_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let manager = TempResourceManager::new(dir.path());

        let job = {
            let manager = manager.clone();
            async move {
                let paths = manager
                    .scoped_paths(&manager.allocate("video"), "mp4", "webp")
                    .unwrap();
                tokio::fs::write(paths.input(), b"in").await.unwrap();
                std::future::pending::<()>().await;
                paths.release();
            }
        };
        let cancelled = tokio::time::timeout(std::time::Duration::from_millis(50), job).await;

        assert!(cancelled.is_err());
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_ensure_dir_creates_nested_directory() {
        let dir = TempDir::new().unwrap();
        let manager = TempResourceManager::new(dir.path().join("a").join("b"));
        manager.ensure_dir().await.unwrap();
        assert!(manager.dir().is_dir());
        // Idempotent
        manager.ensure_dir().await.unwrap();
    }
}
