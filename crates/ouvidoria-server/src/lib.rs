//! Ouvidoria HTTP service: submission intake, PII redaction and business hours.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
