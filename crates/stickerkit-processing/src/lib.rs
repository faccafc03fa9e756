//! Stickerkit Media Processing Library
//!
//! Turns inbound images, GIFs and videos into 512×512 WebP stickers:
//! - [`classifier`] picks a strategy from the declared MIME type
//! - [`image`] stretches still images and encodes them in-process
//! - [`video`] drives ffmpeg for GIF/video input
//! - [`temp`] owns the encoder's scratch files
//! - [`pipeline`] gates events on the trigger caption and turns outcomes into replies

pub mod classifier;
pub mod compression;
pub mod image;
pub mod pipeline;
pub mod temp;
pub mod traits;
pub mod video;

// Re-export commonly used types
pub use classifier::classify;
pub use image::{ImageResize, StillImageConverter};
pub use pipeline::{
    apology_for, InboundMedia, Outcome, PipelineState, Reply, StickerPipeline,
};
pub use temp::{ScopedPaths, TempResourceManager};
pub use traits::StickerConverter;
pub use video::AnimatedTranscoder;
