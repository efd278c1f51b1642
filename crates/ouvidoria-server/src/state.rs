//! Shared application state.

use ouvidoria_core::OuvidoriaConfig;
use ouvidoria_redact::{DetectorError, RedactionPipeline};

/// Shared application state accessible from all route handlers.
///
/// Read-only after startup, so handlers share it without locking.
pub struct AppState {
    pub config: OuvidoriaConfig,
    pub pipeline: RedactionPipeline,
}

impl AppState {
    pub fn new(config: OuvidoriaConfig, pipeline: RedactionPipeline) -> Self {
        Self { config, pipeline }
    }

    /// Build state from configuration, including the detector client.
    pub fn from_config(config: OuvidoriaConfig) -> Result<Self, DetectorError> {
        let pipeline = RedactionPipeline::from_config(&config.detector)?;
        Ok(Self::new(config, pipeline))
    }
}
