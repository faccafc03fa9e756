#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use stickerkit_core::{Config, MediaInput};
use stickerkit_infra::StatusBroadcaster;
use stickerkit_processing::{InboundMedia, StickerPipeline};
use stickerkit_storage::{DisabledOffload, OffloadClient};

/// Chat message carrying an in-memory attachment.
pub struct FakeMessage {
    pub caption: Option<String>,
    pub media: Option<MediaInput>,
    pub fail_download: bool,
    pub downloads: AtomicUsize,
}

impl FakeMessage {
    pub fn new(caption: &str, data: impl Into<Bytes>, mime: &str) -> Self {
        Self {
            caption: Some(caption.to_string()),
            media: Some(MediaInput::new(data, mime)),
            fail_download: false,
            downloads: AtomicUsize::new(0),
        }
    }

    pub fn text_only(caption: &str) -> Self {
        Self {
            caption: Some(caption.to_string()),
            media: None,
            fail_download: false,
            downloads: AtomicUsize::new(0),
        }
    }

    pub fn failing_download(mut self) -> Self {
        self.fail_download = true;
        self
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InboundMedia for FakeMessage {
    fn has_media(&self) -> bool {
        self.media.is_some()
    }

    fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    async fn download_media(&self) -> anyhow::Result<MediaInput> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if self.fail_download {
            anyhow::bail!("media key expired");
        }
        self.media
            .clone()
            .ok_or_else(|| anyhow::anyhow!("message has no media"))
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 7 % 256) as u8, (y * 3 % 256) as u8, 200, 255])
    }));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

pub fn test_config(temp_dir: &Path, ffmpeg_path: &str, timeout: Duration) -> Config {
    Config {
        ffmpeg_path: ffmpeg_path.to_string(),
        encoder_timeout: timeout,
        temp_dir: temp_dir.to_path_buf(),
        ..Config::default()
    }
}

pub fn build_pipeline(config: &Config, offload: Arc<dyn OffloadClient>) -> StickerPipeline {
    StickerPipeline::from_config(config, offload, StatusBroadcaster::new()).unwrap()
}

pub fn build_offline_pipeline(config: &Config) -> StickerPipeline {
    build_pipeline(config, Arc::new(DisabledOffload))
}

pub fn dir_is_empty(path: &Path) -> bool {
    std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true)
}

/// Shell scripts standing in for ffmpeg.
#[cfg(unix)]
pub mod stub {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Writes a fake WebP to the last argument.
    pub const WRITES_OUTPUT: &str = r#"#!/bin/sh
[ "$#" -lt 2 ] && exit 0
for last; do :; done
printf 'RIFF\000\000\000\000WEBPVP8X' > "$last"
"#;

    /// Runs far longer than any test timeout.
    pub const HANGS: &str = r#"#!/bin/sh
[ "$#" -lt 2 ] && exit 0
sleep 30
"#;

    /// Fails the way ffmpeg does on a corrupt input.
    pub const FAILS: &str = r#"#!/bin/sh
[ "$#" -lt 2 ] && exit 0
echo "ffmpeg version stub" >&2
echo "Invalid data found when processing input" >&2
exit 1
"#;

    /// Install `body` as an executable script in `dir` and return its path.
    pub fn install(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        // A concurrent fork may still hold the write descriptor (ETXTBSY).
        for _ in 0..100 {
            match std::process::Command::new(&path).status() {
                Ok(_) => return path,
                Err(e) if e.raw_os_error() == Some(26) => {
                    std::thread::sleep(Duration::from_millis(10))
                }
                Err(e) => panic!("stub encoder {} is not executable: {}", path.display(), e),
            }
        }
        panic!("stub encoder {} stayed busy", path.display());
    }
}
