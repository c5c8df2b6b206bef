//! Host-side abstractions for chat backends.
//!
//! This crate knows nothing about any particular chat service. Backends such as
//! `hcb-hoge` implement the ports in [`messaging::port`] and are driven by
//! [`serve::serve_forever`].

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod presence;
pub mod serve;

pub use errors::{Error, Result};
