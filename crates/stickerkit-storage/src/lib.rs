//! Stickerkit Storage Library
//!
//! Best-effort offload of raw inbound media to a remote object store. Every object
//! is uploaded as temporary with a TTL; the remote service owns expiry, so this
//! crate never issues deletes.
//!
//! When no upload endpoint is configured the factory hands out [`DisabledOffload`],
//! which never touches the network.

pub mod disabled;
pub mod factory;
pub mod http;
pub mod task;
pub mod traits;

// Re-export commonly used types
pub use disabled::DisabledOffload;
pub use factory::create_offload_client;
pub use http::HttpOffloadClient;
pub use task::spawn_offload;
pub use traits::{OffloadClient, StorageError, StorageResult};
