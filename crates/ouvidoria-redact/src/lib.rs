//! PII redaction for ouvidoria submissions.
//!
//! Two tiers: a remote Presidio-based detector reached over HTTP, and a
//! local regex redactor covering Brazilian PII (CPF, email, phone, address,
//! personal names). `RedactionPipeline` tries the remote tier once and falls
//! back to local redaction on any failure.

pub mod pii;
pub mod pipeline;
pub mod remote;
pub mod types;

pub use pii::{LocalRedactor, PatternRule, PiiCategory, PiiMatch};
pub use pipeline::RedactionPipeline;
pub use remote::{DetectorError, PiiDetector, RemoteDetector};
pub use types::{RedactionRequest, RedactionResult, RedactionSource};
