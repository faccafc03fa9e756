//! Pipeline orchestrator
//!
//! One inbound message in, at most one reply out:
//!
//! ```text
//! Idle -> Classifying -> Converting(class) -> Done(Success | Failure)
//! ```
//!
//! Messages without media or without the trigger caption never leave `Idle` and
//! are not downloaded. Unsupported media ends silently after `Classifying`.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use stickerkit_core::{Config, MediaClass, MediaInput, StickerError, StickerResult};
use stickerkit_infra::StatusBroadcaster;
use stickerkit_storage::OffloadClient;
use tokio::task::JoinHandle;

use crate::classifier::classify;
use crate::image::StillImageConverter;
use crate::temp::TempResourceManager;
use crate::traits::StickerConverter;
use crate::video::AnimatedTranscoder;

/// Inbound message as seen by the pipeline.
///
/// Implemented by the messaging transport. `download_media` is only called once
/// the caption gate has passed.
#[async_trait]
pub trait InboundMedia: Send + Sync {
    fn has_media(&self) -> bool;

    fn caption(&self) -> Option<&str>;

    async fn download_media(&self) -> anyhow::Result<MediaInput>;
}

/// What the transport should send back to the chat.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Send as a sticker, not as an image.
    Sticker(StickerResult),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Classifying,
    Converting(MediaClass),
    Done(Outcome),
}

impl PipelineState {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        matches!(
            (self, next),
            (PipelineState::Idle, PipelineState::Classifying)
                | (PipelineState::Classifying, PipelineState::Converting(_))
                | (PipelineState::Converting(_), PipelineState::Done(_))
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Idle => f.write_str("idle"),
            PipelineState::Classifying => f.write_str("classifying"),
            PipelineState::Converting(class) => write!(f, "converting({})", class),
            PipelineState::Done(Outcome::Success) => f.write_str("done(success)"),
            PipelineState::Done(Outcome::Failure) => f.write_str("done(failure)"),
        }
    }
}

fn advance(state: &mut PipelineState, next: PipelineState) {
    debug_assert!(state.can_transition_to(next), "{} -> {}", state, next);
    tracing::debug!(from = %state, to = %next, "Pipeline transition");
    *state = next;
}

/// Apology sent when a conversion fails.
pub fn apology_for(class: MediaClass) -> &'static str {
    match class {
        MediaClass::StaticImage => "❌ Sorry, I couldn't turn this image into a sticker.",
        MediaClass::AnimatedImage => "❌ Sorry, I couldn't turn this GIF into a sticker.",
        MediaClass::Video => "❌ Sorry, I couldn't turn this video into a sticker.",
        MediaClass::Unsupported => "❌ Sorry, I couldn't turn this file into a sticker.",
    }
}

fn progress_message(class: MediaClass) -> &'static str {
    match class {
        MediaClass::StaticImage => "Converting image to sticker...",
        MediaClass::AnimatedImage => "Converting GIF to animated sticker...",
        MediaClass::Video => "Converting video to animated sticker...",
        MediaClass::Unsupported => "Converting media...",
    }
}

fn success_message(class: MediaClass) -> &'static str {
    match class {
        MediaClass::StaticImage => "Image converted into a square sticker",
        MediaClass::AnimatedImage => "GIF converted into an animated sticker",
        MediaClass::Video => "Video converted into an animated sticker",
        MediaClass::Unsupported => "Media converted",
    }
}

/// Sticker conversion pipeline. `Send + Sync`; share it behind an `Arc` and
/// handle each event on its own task.
pub struct StickerPipeline {
    trigger: String,
    still: Arc<dyn StickerConverter>,
    animated: Arc<dyn StickerConverter>,
    status: StatusBroadcaster,
}

impl StickerPipeline {
    pub fn new(
        trigger: impl Into<String>,
        still: Arc<dyn StickerConverter>,
        animated: Arc<dyn StickerConverter>,
        status: StatusBroadcaster,
    ) -> Self {
        Self {
            trigger: trigger.into().trim().to_lowercase(),
            still,
            animated,
            status,
        }
    }

    /// Wire the in-process still converter and the ffmpeg transcoder from config.
    pub fn from_config(
        config: &Config,
        offload: Arc<dyn OffloadClient>,
        status: StatusBroadcaster,
    ) -> Result<Self, StickerError> {
        let transcoder =
            AnimatedTranscoder::new(&config.ffmpeg_path, TempResourceManager::new(&config.temp_dir))
                .map_err(|e| StickerError::Config(e.to_string()))?
                .with_timeout(config.encoder_timeout)
                .with_offload(offload);

        Ok(Self::new(
            &config.trigger_caption,
            Arc::new(StillImageConverter::new()),
            Arc::new(transcoder),
            status,
        ))
    }

    pub fn status(&self) -> &StatusBroadcaster {
        &self.status
    }

    /// Case-insensitive, whitespace-trimmed exact match against the trigger.
    pub fn caption_matches(&self, caption: &str) -> bool {
        caption.trim().to_lowercase() == self.trigger
    }

    /// Classify and convert an already downloaded buffer.
    pub async fn convert(&self, input: &MediaInput) -> Result<StickerResult, StickerError> {
        let class = classify(&input.mime_type);
        self.convert_as(input, class).await
    }

    async fn convert_as(
        &self,
        input: &MediaInput,
        class: MediaClass,
    ) -> Result<StickerResult, StickerError> {
        match class {
            MediaClass::StaticImage => self.still.convert(input, class).await,
            MediaClass::AnimatedImage | MediaClass::Video => {
                self.animated.convert(input, class).await
            }
            MediaClass::Unsupported => Err(StickerError::Unsupported(input.mime_type.clone())),
        }
    }

    /// Run one inbound message through the pipeline.
    ///
    /// Returns the reply to send, or `None` when the message is ignored.
    pub async fn handle_event(&self, event: &dyn InboundMedia) -> Option<Reply> {
        let mut state = PipelineState::Idle;

        if !event.has_media() {
            return None;
        }
        if !event.caption().is_some_and(|c| self.caption_matches(c)) {
            return None;
        }

        let input = match event.download_media().await {
            Ok(input) if !input.mime_type.trim().is_empty() => input,
            Ok(_) => {
                self.status.warning("Invalid media: missing MIME type");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "Media download failed");
                self.status.warning("Invalid or unreadable media");
                return None;
            }
        };

        advance(&mut state, PipelineState::Classifying);
        let class = classify(&input.mime_type);
        if class == MediaClass::Unsupported {
            StickerError::Unsupported(input.mime_type.clone()).report("Ignoring media");
            return None;
        }

        advance(&mut state, PipelineState::Converting(class));
        self.status.warning(progress_message(class));
        let started = Instant::now();

        match self.convert_as(&input, class).await {
            Ok(sticker) => {
                advance(&mut state, PipelineState::Done(Outcome::Success));
                tracing::info!(
                    %class,
                    mime_type = %input.mime_type,
                    bytes = input.len(),
                    output_bytes = sticker.data.len(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Sticker ready"
                );
                self.status.success(success_message(class));
                Some(Reply::Sticker(sticker))
            }
            Err(e) => {
                advance(&mut state, PipelineState::Done(Outcome::Failure));
                e.report(&format!(
                    "Sticker conversion of {} ({}) failed after {}ms",
                    class,
                    input.mime_type,
                    started.elapsed().as_millis()
                ));
                if !e.is_user_visible() {
                    return None;
                }
                let failed_class = e.media_class().unwrap_or(class);
                self.status
                    .error(format!("Failed to convert {}: {}", failed_class, e));
                Some(Reply::Text(apology_for(failed_class).to_string()))
            }
        }
    }

    /// Handle `event` on its own task.
    pub fn spawn_event<E>(self: &Arc<Self>, event: E) -> JoinHandle<Option<Reply>>
    where
        E: InboundMedia + 'static,
    {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move { pipeline.handle_event(&event).await })
    }
}
