//! Configuration types and parsing
//!
//! Board-agnostic timer configuration, loaded once at startup and
//! immutable for the rest of the session. Boards embed a `timer.toml`
//! and read it with [`parse_config`].

pub mod toml;
pub mod types;

pub use toml::{parse_config, ParseError};
pub use types::*;
