//! Fogo Fishing SDK: account decoders, PDA helpers and the economy model.

pub mod constants;
pub mod error;
pub mod reader;
pub mod state;
pub mod events;
pub mod economy;
pub mod durability;
pub mod processing;
pub mod stats;
pub mod format;

pub use error::{Result, SdkError};
