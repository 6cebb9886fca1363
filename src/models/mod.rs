// Data models for the tracking pipeline

pub mod exercise;
pub mod landmark;
pub mod session;

pub use exercise::*;
pub use landmark::*;
pub use session::*;
