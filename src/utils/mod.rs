/// Environment-driven configuration.
pub mod config;
