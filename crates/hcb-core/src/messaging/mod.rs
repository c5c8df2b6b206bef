//! Service-agnostic message model and the ports a chat backend implements.

pub mod port;
pub mod types;
