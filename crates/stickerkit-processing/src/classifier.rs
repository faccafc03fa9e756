//! MIME type classification.

use stickerkit_core::MediaClass;

/// Map a declared MIME type onto a conversion strategy.
///
/// `image/gif` is checked before the generic `image/*` prefix so animated GIFs
/// never take the still-image path. Parameters (`; codecs=...`), case and
/// surrounding whitespace are ignored.
pub fn classify(mime_type: &str) -> MediaClass {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence == "image/gif" {
        MediaClass::AnimatedImage
    } else if essence.starts_with("image/") {
        MediaClass::StaticImage
    } else if essence.starts_with("video/") {
        MediaClass::Video
    } else {
        MediaClass::Unsupported
    }
}
