// Funding Scout server: HTTP API and scheduler over the funding pipeline
pub mod config;
pub mod kernel;
pub mod server;

pub use config::*;
