// Library exports for the Physalign CLI
// This allows testing of internal modules

pub mod commands;
pub mod config;
pub mod models;
