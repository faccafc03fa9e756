use serde::{Deserialize, Serialize};
use std::fmt;

/// Time-to-live of an offloaded object. The storage service deletes it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ttl {
    Minutes(u32),
    Seconds(u32),
}

impl Ttl {
    /// Multipart field name carrying this TTL.
    pub fn field_name(self) -> &'static str {
        match self {
            Ttl::Minutes(_) => "ttl_minutes",
            Ttl::Seconds(_) => "ttl_seconds",
        }
    }

    pub fn value(self) -> u32 {
        match self {
            Ttl::Minutes(v) | Ttl::Seconds(v) => v,
        }
    }

    pub fn is_positive(self) -> bool {
        self.value() > 0
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::Minutes(v) => write!(f, "{}m", v),
            Ttl::Seconds(v) => write!(f, "{}s", v),
        }
    }
}

/// Outcome of one offload attempt. Only ever consumed by logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffloadReceipt {
    pub success: bool,
    pub message: Option<String>,
    pub uploaded_refs: Vec<String>,
    pub errors: Vec<String>,
}

impl OffloadReceipt {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            uploaded_refs: Vec::new(),
            errors: vec![reason.into()],
        }
    }
}
