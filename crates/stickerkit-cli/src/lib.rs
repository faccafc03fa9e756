//! Helpers for the `stickerkit` binary: a file on disk posing as a chat message.

use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use stickerkit_core::MediaInput;
use stickerkit_processing::InboundMedia;

/// MIME type for a file name, from its extension. Only covers what the
/// pipeline can tell apart; anything else should be passed explicitly.
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "3gp" => "video/3gpp",
        "pdf" => "application/pdf",
        "ogg" | "opus" => "audio/ogg",
        _ => return None,
    };
    Some(mime)
}

/// Where to write the sticker for `input` when no output path was given.
///
/// `cat.png` becomes `cat.webp`; a `.webp` input gets a `.sticker.webp` sibling
/// so it is never overwritten.
pub fn default_output_path(input: &Path) -> PathBuf {
    let is_webp = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("webp"));

    if is_webp {
        input.with_extension("sticker.webp")
    } else {
        input.with_extension("webp")
    }
}

/// Local file delivered to the pipeline as if it arrived in a chat.
#[derive(Debug, Clone)]
pub struct FileMessage {
    path: PathBuf,
    mime_type: Option<String>,
    caption: Option<String>,
}

impl FileMessage {
    pub fn new(path: impl Into<PathBuf>, mime_type: Option<String>, caption: Option<String>) -> Self {
        Self {
            path: path.into(),
            mime_type,
            caption,
        }
    }

    /// Explicit MIME type, else one guessed from the extension. Empty when unknown.
    pub fn mime_type(&self) -> String {
        self.mime_type
            .clone()
            .or_else(|| mime_from_extension(&self.path).map(str::to_string))
            .unwrap_or_default()
    }
}

#[async_trait]
impl InboundMedia for FileMessage {
    fn has_media(&self) -> bool {
        true
    }

    fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    async fn download_media(&self) -> anyhow::Result<MediaInput> {
        let data = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        Ok(MediaInput::new(data, self.mime_type()))
    }
}
