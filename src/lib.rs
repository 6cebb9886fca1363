// Library exports for the Physalign tracking core
// The CLI harness and the integration tests drive the pipeline through these modules

pub mod config;
pub mod errors;
pub mod models;
pub mod services;

pub use config::TrackingConfig;
pub use errors::TrackingError;
