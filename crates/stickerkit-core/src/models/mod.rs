//! Domain models for one sticker conversion.

pub mod job;
pub mod media;
pub mod offload;
pub mod sticker;

pub use job::generate_job_id;
pub use media::{MediaClass, MediaInput};
pub use offload::{OffloadReceipt, Ttl};
pub use sticker::StickerResult;
