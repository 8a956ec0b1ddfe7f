use std::fmt::{Display, Formatter};

use sentix_core::{EnvelopeMeta, FeedId, ValidationError};
use serde::Serialize;
use uuid::Uuid;

/// Request identifier (UUID v4) carried in every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Per-command metadata collected before the envelope is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub request_id: RequestId,
    pub feeds: Vec<FeedId>,
    pub latency_ms: u64,
    pub warnings: Vec<String>,
}

impl Metadata {
    pub fn new(feeds: Vec<FeedId>, latency_ms: u64) -> Self {
        Self {
            request_id: RequestId::new_v4(),
            feeds,
            latency_ms,
            warnings: Vec::new(),
        }
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn into_envelope_meta(self) -> Result<EnvelopeMeta, ValidationError> {
        Ok(
            EnvelopeMeta::new(self.request_id.to_string(), self.feeds, self.latency_ms)?
                .with_warnings(self.warnings),
        )
    }
}
