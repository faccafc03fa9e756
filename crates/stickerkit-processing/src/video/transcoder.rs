//! Animated sticker transcoding through ffmpeg.
//!
//! The encoder only works on files, so each job stages its input under the temp
//! directory, runs ffmpeg with a fixed argument list and reads the WebP back.
//! Both files are removed on every exit path.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use stickerkit_core::constants::{
    ANIMATED_COMPRESSION_LEVEL, ANIMATED_FPS, ANIMATED_FRAME_QUALITY, ANIMATED_MAX_DURATION_SECS,
    DEFAULT_ENCODER_TIMEOUT_SECS, STICKER_SIZE,
};
use stickerkit_core::{MediaClass, MediaInput, StickerError, StickerResult, StickerResultExt};
use stickerkit_storage::{spawn_offload, DisabledOffload, OffloadClient};
use tokio::process::Command;

use crate::temp::{ScopedPaths, TempResourceManager};
use crate::traits::StickerConverter;

/// Lines of encoder stderr kept in logs and error messages.
const STDERR_TAIL_LINES: usize = 12;

pub struct AnimatedTranscoder {
    ffmpeg_path: String,
    timeout: Duration,
    temp: TempResourceManager,
    offload: Arc<dyn OffloadClient>,
}

impl AnimatedTranscoder {
    pub fn new(ffmpeg_path: impl Into<String>, temp: TempResourceManager) -> Result<Self> {
        let ffmpeg_path = ffmpeg_path.into();

        // Validate ffmpeg_path
        let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
        if ffmpeg_path.trim().is_empty() || ffmpeg_path.chars().any(|c| dangerous_chars.contains(&c))
        {
            return Err(anyhow!(
                "Invalid ffmpeg_path: empty or contains dangerous characters"
            ));
        }

        Ok(Self {
            ffmpeg_path,
            timeout: Duration::from_secs(DEFAULT_ENCODER_TIMEOUT_SECS),
            temp,
            offload: Arc::new(DisabledOffload),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Upload a temporary copy of every animated input through `offload`.
    pub fn with_offload(mut self, offload: Arc<dyn OffloadClient>) -> Self {
        self.offload = offload;
        self
    }

    /// Full ffmpeg argument list for one job.
    ///
    /// 15 fps, stretched to 512×512, lossy frames at quality 50, infinite loop,
    /// no audio, passthrough frame timing, truncated to 6 seconds.
    pub fn encoder_args(input: &Path, output: &Path) -> Vec<String> {
        let fixed = |s: &str| s.to_string();
        vec![
            fixed("-y"),
            fixed("-i"),
            input.to_string_lossy().into_owned(),
            fixed("-vcodec"),
            fixed("libwebp"),
            fixed("-vf"),
            format!("fps={},scale={}:{}", ANIMATED_FPS, STICKER_SIZE, STICKER_SIZE),
            fixed("-lossless"),
            fixed("0"),
            fixed("-compression_level"),
            ANIMATED_COMPRESSION_LEVEL.to_string(),
            fixed("-q:v"),
            ANIMATED_FRAME_QUALITY.to_string(),
            fixed("-loop"),
            fixed("0"),
            fixed("-preset"),
            fixed("default"),
            fixed("-an"),
            fixed("-vsync"),
            fixed("0"),
            fixed("-t"),
            ANIMATED_MAX_DURATION_SECS.to_string(),
            fixed("-f"),
            fixed("webp"),
            output.to_string_lossy().into_owned(),
        ]
    }

    /// Transcode a GIF or video into an animated WebP sticker.
    pub async fn transcode(&self, data: Bytes, class: MediaClass) -> Result<StickerResult, StickerError> {
        let Some(extension) = class.input_extension() else {
            return Err(StickerError::Unsupported(format!(
                "{} is not handled by the animated encoder",
                class
            )));
        };
        self.transcode_as(data, class.name_prefix(), extension, class)
            .await
    }

    /// Stage `data` as `{base}_{job}.{extension}` and encode it.
    ///
    /// `class` only labels failures.
    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn transcode_as(
        &self,
        data: Bytes,
        base: &str,
        extension: &str,
        class: MediaClass,
    ) -> Result<StickerResult, StickerError> {
        self.temp.ensure_dir().await.conversion_failed(class)?;

        let stem = self.temp.allocate(base);
        let paths = self
            .temp
            .scoped_paths(&stem, extension, "webp")
            .with_context(|| format!("Failed to allocate temp files in {}", self.temp.dir().display()))
            .conversion_failed(class)?;

        let outcome = self.run_job(&paths, data, class).await;
        paths.release();

        if let Ok(sticker) = &outcome {
            tracing::info!(job_id = %stem, output_bytes = sticker.data.len(), "Animated sticker encoded");
        }
        outcome
    }

    async fn run_job(
        &self,
        paths: &ScopedPaths,
        data: Bytes,
        class: MediaClass,
    ) -> Result<StickerResult, StickerError> {
        tokio::fs::write(paths.input(), &data)
            .await
            .with_context(|| format!("Failed to stage input {}", paths.input().display()))
            .conversion_failed(class)?;

        // Fire and forget; never awaited by the conversion.
        let _ = spawn_offload(self.offload.clone(), data, paths.input_file_name(), None);

        self.run_encoder(paths.input(), paths.output())
            .await
            .conversion_failed(class)?;

        let webp = tokio::fs::read(paths.output())
            .await
            .with_context(|| format!("Failed to read encoder output {}", paths.output().display()))
            .conversion_failed(class)?;
        if webp.is_empty() {
            return Err(StickerError::conversion(class, "Encoder produced an empty file"));
        }

        Ok(StickerResult::animated(webp))
    }

    async fn run_encoder(&self, input: &Path, output: &Path) -> Result<()> {
        let args = Self::encoder_args(input, output);
        tracing::debug!(ffmpeg = %self.ffmpeg_path, ?args, "Running encoder");

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Dropping the output future on timeout kills the child.
        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| anyhow!("FFmpeg timed out after {}s", self.timeout.as_secs_f32()))?
            .context("Failed to execute ffmpeg")?;

        if !output.status.success() {
            let stderr = stderr_tail(&String::from_utf8_lossy(&output.stderr));
            tracing::warn!(status = %output.status, stderr = %stderr, "FFmpeg exited with failure");
            return Err(anyhow!("FFmpeg failed ({}): {}", output.status, stderr));
        }

        Ok(())
    }
}

/// Last few lines of encoder stderr; ffmpeg prints its banner first.
fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.trim_end().lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[async_trait]
impl StickerConverter for AnimatedTranscoder {
    async fn convert(
        &self,
        input: &MediaInput,
        class: MediaClass,
    ) -> Result<StickerResult, StickerError> {
        self.transcode(input.data.clone(), class).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dir_is_empty(path: &Path) -> bool {
        std::fs::read_dir(path).map(|mut d| d.next().is_none()).unwrap_or(true)
    }

    #[test]
    fn test_encoder_args_are_exact() {
        let args = AnimatedTranscoder::encoder_args(Path::new("/t/gif_1.gif"), Path::new("/t/gif_1.webp"));
        let expected = [
            "-y", "-i", "/t/gif_1.gif", "-vcodec", "libwebp", "-vf", "fps=15,scale=512:512",
            "-lossless", "0", "-compression_level", "6", "-q:v", "50", "-loop", "0", "-preset",
            "default", "-an", "-vsync", "0", "-t", "6", "-f", "webp", "/t/gif_1.webp",
        ];
        assert_eq!(args, expected);
    }

    #[test]
    fn test_rejects_dangerous_ffmpeg_path() {
        let temp = TempResourceManager::new("temp");
        assert!(AnimatedTranscoder::new("ffmpeg && rm -rf /", temp.clone()).is_err());
        assert!(AnimatedTranscoder::new("", temp.clone()).is_err());
        assert!(AnimatedTranscoder::new("/usr/bin/ffmpeg", temp).is_ok());
    }

    #[test]
    fn test_stderr_tail() {
        let stderr: String = (0..40).map(|i| format!("line {}\n", i)).collect();
        let tail = stderr_tail(&stderr);
        assert!(tail.starts_with("line 28"));
        assert!(tail.ends_with("line 39"));
        assert_eq!(stderr_tail("short"), "short");
    }

    #[tokio::test]
    async fn test_still_class_is_rejected() {
        let dir = TempDir::new().unwrap();
        let transcoder =
            AnimatedTranscoder::new("ffmpeg", TempResourceManager::new(dir.path())).unwrap();
        let err = transcoder
            .transcode(Bytes::from_static(b"png"), MediaClass::StaticImage)
            .await
            .unwrap_err();
        assert!(matches!(err, StickerError::Unsupported(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_custom_stem_and_extension() {
        let dir = TempDir::new().unwrap();
        let transcoder =
            AnimatedTranscoder::new("false", TempResourceManager::new(dir.path())).unwrap();

        let err = transcoder
            .transcode_as(Bytes::from_static(b"webm"), "clip", "webm", MediaClass::Video)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("video"));
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_missing_encoder_fails_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let transcoder = AnimatedTranscoder::new(
            "/nonexistent/bin/ffmpeg-for-stickers",
            TempResourceManager::new(dir.path()),
        )
        .unwrap();

        let err = transcoder
            .transcode(Bytes::from_static(b"GIF89a"), MediaClass::AnimatedImage)
            .await
            .unwrap_err();

        assert!(err.is_user_visible());
        assert_eq!(err.media_class(), Some(MediaClass::AnimatedImage));
        assert!(dir_is_empty(dir.path()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_encoder_fails_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let transcoder =
            AnimatedTranscoder::new("false", TempResourceManager::new(dir.path())).unwrap();

        let err = transcoder
            .transcode(Bytes::from_static(b"not really mp4"), MediaClass::Video)
            .await
            .unwrap_err();

        assert_eq!(err.media_class(), Some(MediaClass::Video));
        assert!(dir_is_empty(dir.path()));
    }
}
