//! Detached offload task.

use bytes::Bytes;
use std::sync::Arc;
use stickerkit_core::{OffloadReceipt, StickerError, Ttl};
use tokio::task::JoinHandle;

use crate::traits::OffloadClient;

/// Start a best-effort offload of `data` in the background.
///
/// Returns `None` without spawning anything when the client is not configured.
/// Callers are expected to drop the handle: the receipt is logged here and nothing
/// in the conversion path waits for it. An upload still in flight when the runtime
/// shuts down is lost.
pub fn spawn_offload(
    client: Arc<dyn OffloadClient>,
    data: Bytes,
    filename: String,
    ttl: Option<Ttl>,
) -> Option<JoinHandle<OffloadReceipt>> {
    if !client.is_configured() {
        return None;
    }

    Some(tokio::spawn(async move {
        let size = data.len();
        let receipt = client.offload(data, &filename, ttl).await;

        if receipt.success {
            tracing::info!(
                filename = %filename,
                bytes = size,
                uploaded = ?receipt.uploaded_refs,
                "Offloaded temporary copy to storage"
            );
        } else {
            StickerError::OffloadFailed(receipt.errors.join("; "))
                .report(&format!("Storage offload of {} failed", filename));
        }

        receipt
    }))
}
