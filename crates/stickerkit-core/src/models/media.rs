use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Media buffer handed over by the messaging transport.
///
/// Owned by the invocation that downloaded it; never shared between conversions.
#[derive(Debug, Clone)]
pub struct MediaInput {
    pub data: Bytes,
    pub mime_type: String,
}

impl MediaInput {
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Conversion strategy selected from the declared MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaClass {
    StaticImage,
    AnimatedImage,
    Video,
    Unsupported,
}

impl MediaClass {
    /// Whether this class goes through the external encoder.
    pub fn is_animated(self) -> bool {
        matches!(self, MediaClass::AnimatedImage | MediaClass::Video)
    }

    /// Extension used for the encoder's temporary input file.
    pub fn input_extension(self) -> Option<&'static str> {
        match self {
            MediaClass::AnimatedImage => Some("gif"),
            MediaClass::Video => Some("mp4"),
            MediaClass::StaticImage | MediaClass::Unsupported => None,
        }
    }

    /// Base name of temporary files for this class.
    pub fn name_prefix(self) -> &'static str {
        match self {
            MediaClass::StaticImage => "image",
            MediaClass::AnimatedImage => "gif",
            MediaClass::Video => "video",
            MediaClass::Unsupported => "media",
        }
    }

    /// Human-readable name used in status and apology messages.
    pub fn label(self) -> &'static str {
        match self {
            MediaClass::StaticImage => "image",
            MediaClass::AnimatedImage => "GIF",
            MediaClass::Video => "video",
            MediaClass::Unsupported => "media",
        }
    }
}

impl fmt::Display for MediaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
