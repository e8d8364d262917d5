// noip-api: Async Rust client for the No-IP dynamic DNS update endpoint

pub mod auth;
pub mod client;
pub mod error;
pub mod status;
pub mod transport;

pub use auth::Credentials;
pub use client::{NoIpClient, VALIDATION_HOSTNAME};
pub use error::Error;
pub use status::{ConnectionStatus, HostMap, HostStatus, classify};
pub use transport::TransportConfig;
