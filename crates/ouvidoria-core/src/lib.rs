//! Ouvidoria Core: configuration, error types and the business-hours calendar.

pub mod config;
pub mod error;
pub mod hours;

pub use config::{BusinessHours, DetectorConfig, OuvidoriaConfig};
pub use error::{Error, Result};
pub use hours::{check_business_hours, BusinessHoursStatus};
