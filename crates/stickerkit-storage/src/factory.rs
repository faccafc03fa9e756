//! Offload client factory
//!
//! Picks the offload backend from configuration.

use std::sync::Arc;

use stickerkit_core::StorageConfig;

use crate::disabled::DisabledOffload;
use crate::http::HttpOffloadClient;
use crate::traits::{OffloadClient, StorageResult};

/// Create the offload client for the given configuration.
///
/// A missing or non-http upload URL yields the inert [`DisabledOffload`].
pub fn create_offload_client(config: &StorageConfig) -> StorageResult<Arc<dyn OffloadClient>> {
    match config.upload_url.as_deref() {
        Some(url) if config.is_configured() => {
            tracing::info!(upload_url = %url, ttl_minutes = config.default_ttl_minutes, "Storage offload enabled");
            Ok(Arc::new(HttpOffloadClient::new(
                url.to_string(),
                config.default_ttl_minutes,
            )?))
        }
        Some(url) => {
            tracing::warn!(upload_url = %url, "Ignoring storage upload URL that is not http(s); offload disabled");
            Ok(Arc::new(DisabledOffload))
        }
        None => {
            tracing::info!("Storage offload not configured; using local scratch directory only");
            Ok(Arc::new(DisabledOffload))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_storage_is_disabled() {
        let client = create_offload_client(&StorageConfig::default()).unwrap();
        assert!(!client.is_configured());
    }

    #[test]
    fn test_invalid_url_is_disabled() {
        let config = StorageConfig {
            upload_url: Some("files.example.com/api/u/bot".to_string()),
            default_ttl_minutes: 15,
        };
        let client = create_offload_client(&config).unwrap();
        assert!(!client.is_configured());
    }

    #[test]
    fn test_http_url_is_enabled() {
        let config = StorageConfig {
            upload_url: Some("https://files.example.com/api/u/bot".to_string()),
            default_ttl_minutes: 15,
        };
        let client = create_offload_client(&config).unwrap();
        assert!(client.is_configured());
    }
}
