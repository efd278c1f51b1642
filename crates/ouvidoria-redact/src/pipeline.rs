//! Two-tier redaction: remote detector first, local regex redactor on failure.

use std::sync::Arc;
use std::time::Duration;

use ouvidoria_core::DetectorConfig;
use tracing::{info, warn};

use crate::pii::LocalRedactor;
use crate::remote::{DetectorError, PiiDetector, RemoteDetector};
use crate::types::{RedactionResult, RedactionSource};

/// Redaction entry point shared by all request handlers.
///
/// Holds no mutable state; clone the `Arc` around it freely.
pub struct RedactionPipeline {
    remote: Option<Arc<dyn PiiDetector>>,
    local: LocalRedactor,
    /// Upper bound on the remote attempt, whatever the detector's own timeout.
    deadline: Duration,
}

impl RedactionPipeline {
    pub fn new(remote: Option<Arc<dyn PiiDetector>>, deadline: Duration) -> Self {
        Self {
            remote,
            local: LocalRedactor::new(),
            deadline,
        }
    }

    /// Pipeline that never leaves the process.
    pub fn local_only() -> Self {
        Self::new(None, Duration::ZERO)
    }

    /// Build from configuration, wiring the Presidio client when enabled.
    pub fn from_config(config: &DetectorConfig) -> Result<Self, DetectorError> {
        if !config.enabled {
            info!("Remote detector disabled. Using local redaction only.");
            return Ok(Self::local_only());
        }

        let remote = RemoteDetector::new(config)?;
        info!(
            "Remote detector at {} (timeout {:?})",
            remote.endpoint(),
            config.timeout
        );
        let remote: Arc<dyn PiiDetector> = Arc::new(remote);
        Ok(Self::new(Some(remote), config.timeout))
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn local(&self) -> &LocalRedactor {
        &self.local
    }

    /// Redact `text`, trying the remote detector once before falling back.
    ///
    /// Never fails: any remote error is logged and replaced by the local
    /// redaction of the original text.
    pub async fn process(&self, text: &str) -> RedactionResult {
        if text.trim().is_empty() {
            return RedactionResult::unchanged(text, RedactionSource::Local);
        }

        if let Some(remote) = &self.remote {
            match tokio::time::timeout(self.deadline, remote.detect(text)).await {
                Ok(Ok(result)) => {
                    info!(
                        "{} redacted submission: {} items hidden",
                        remote.name(),
                        result.hidden_count
                    );
                    return result;
                }
                Ok(Err(e)) => {
                    warn!("{} unavailable, using local redaction: {}", remote.name(), e);
                }
                Err(_) => {
                    warn!(
                        "{} exceeded {:?}, using local redaction",
                        remote.name(),
                        self.deadline
                    );
                }
            }
        }

        self.local.redact(text)
    }
}
