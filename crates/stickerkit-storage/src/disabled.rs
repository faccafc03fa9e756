use async_trait::async_trait;
use bytes::Bytes;
use stickerkit_core::{OffloadReceipt, Ttl};

use crate::traits::OffloadClient;

/// Offload client used when no storage endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledOffload;

#[async_trait]
impl OffloadClient for DisabledOffload {
    fn is_configured(&self) -> bool {
        false
    }

    async fn offload(&self, _data: Bytes, _filename: &str, _ttl: Option<Ttl>) -> OffloadReceipt {
        OffloadReceipt::failed("storage upload URL is not configured")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_offload_is_inert() {
        let client = DisabledOffload;
        assert!(!client.is_configured());

        let receipt = client
            .offload(Bytes::from_static(b"gif"), "gif_1.gif", None)
            .await;
        assert!(!receipt.success);
        assert_eq!(receipt.errors.len(), 1);
    }
}
