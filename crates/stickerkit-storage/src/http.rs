//! HTTP offload client for the temporary-file storage API.
//!
//! `POST {base}/api/u/{slug}` with a multipart body:
//! - `file`: the raw bytes
//! - `temporary`: always `1`
//! - exactly one of `ttl_seconds` / `ttl_minutes`
//!
//! The service answers `{ success, message?, uploaded?, errors?, error? }`.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use stickerkit_core::{OffloadReceipt, Ttl};

use crate::traits::{OffloadClient, StorageError, StorageResult};

#[derive(Debug, Default, Deserialize)]
struct UploadResponse {
    success: Option<bool>,
    message: Option<String>,
    error: Option<String>,
    uploaded: Option<Vec<serde_json::Value>>,
    errors: Option<Vec<serde_json::Value>>,
}

/// Offload client talking to the storage API over HTTP.
#[derive(Clone, Debug)]
pub struct HttpOffloadClient {
    client: Client,
    upload_url: String,
    default_ttl_minutes: u32,
}

impl HttpOffloadClient {
    pub fn new(upload_url: String, default_ttl_minutes: u32) -> StorageResult<Self> {
        if !upload_url.starts_with("http") {
            return Err(StorageError::ConfigError(format!(
                "Upload URL must be http(s): {}",
                upload_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            upload_url,
            default_ttl_minutes,
        })
    }

    fn resolve_ttl(&self, ttl: Option<Ttl>) -> StorageResult<Ttl> {
        let ttl = ttl.unwrap_or(Ttl::Minutes(self.default_ttl_minutes));
        if !ttl.is_positive() {
            return Err(StorageError::UploadFailed(
                "ttl_minutes or ttl_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(ttl)
    }

    async fn upload(&self, data: Bytes, filename: &str, ttl: Ttl) -> StorageResult<OffloadReceipt> {
        let mut form = Form::new().part(
            "file",
            Part::bytes(data.to_vec()).file_name(filename.to_string()),
        );
        for (name, value) in form_fields(ttl) {
            form = form.text(name, value);
        }

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();
        let parsed: UploadResponse = serde_json::from_slice(&body).unwrap_or_default();

        Ok(receipt_from_response(status, parsed))
    }
}

/// Non-file form fields sent with every upload.
fn form_fields(ttl: Ttl) -> [(&'static str, String); 2] {
    [
        ("temporary", "1".to_string()),
        (ttl.field_name(), ttl.value().to_string()),
    ]
}

fn receipt_from_response(status: reqwest::StatusCode, body: UploadResponse) -> OffloadReceipt {
    let uploaded_refs = body
        .uploaded
        .unwrap_or_default()
        .iter()
        .map(value_to_ref)
        .collect();
    let mut errors: Vec<String> = body
        .errors
        .unwrap_or_default()
        .iter()
        .map(value_to_ref)
        .collect();

    if !status.is_success() {
        let reason = body
            .error
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        errors.insert(0, reason);
        return OffloadReceipt {
            success: false,
            message: body.message,
            uploaded_refs,
            errors,
        };
    }

    OffloadReceipt {
        success: body.success != Some(false),
        message: body.message,
        uploaded_refs,
        errors,
    }
}

/// Flatten an `uploaded`/`errors` entry into a printable reference.
fn value_to_ref(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => ["url", "key", "id", "filename", "name", "error"]
            .iter()
            .find_map(|field| map.get(*field).and_then(|v| v.as_str()))
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

#[async_trait]
impl OffloadClient for HttpOffloadClient {
    fn is_configured(&self) -> bool {
        true
    }

    async fn offload(&self, data: Bytes, filename: &str, ttl: Option<Ttl>) -> OffloadReceipt {
        let ttl = match self.resolve_ttl(ttl) {
            Ok(ttl) => ttl,
            Err(e) => return OffloadReceipt::failed(e.to_string()),
        };

        match self.upload(data, filename, ttl).await {
            Ok(receipt) => receipt,
            Err(e) => OffloadReceipt::failed(e.to_string()),
        }
    }
}
