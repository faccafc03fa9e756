//! Sticker format constants.
//!
//! These values are WhatsApp platform constraints. Changing any of them makes the
//! produced stickers unusable in the app.

/// Stickers are square, both edges in pixels.
pub const STICKER_SIZE: u32 = 512;

/// MIME type of every produced sticker.
pub const STICKER_MIME_TYPE: &str = "image/webp";

/// Lossy WebP quality for still stickers (0-100).
pub const STILL_WEBP_QUALITY: f32 = 80.0;

/// Output frame rate of animated stickers.
pub const ANIMATED_FPS: u32 = 15;

/// Maximum animated sticker duration. Longer inputs are truncated by the encoder.
pub const ANIMATED_MAX_DURATION_SECS: u32 = 6;

/// libwebp compression effort (0-6).
pub const ANIMATED_COMPRESSION_LEVEL: u8 = 6;

/// libwebp per-frame quality (0-100).
pub const ANIMATED_FRAME_QUALITY: u8 = 50;

/// Caption that authorizes a conversion, compared trimmed and case-insensitively.
pub const DEFAULT_TRIGGER_CAPTION: &str = "sticker";

/// TTL applied to offloaded objects when none is given.
pub const DEFAULT_OFFLOAD_TTL_MINUTES: u32 = 15;

/// Wall-clock limit for one encoder run.
pub const DEFAULT_ENCODER_TIMEOUT_SECS: u64 = 60;

/// Scratch directory used when no remote storage is configured.
pub const LOCAL_TEMP_DIR: &str = "temp";
