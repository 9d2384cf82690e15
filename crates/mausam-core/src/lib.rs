//! Core data types, city table, rollups and alert rules for mausam
//!
//! This crate defines the domain shared by the poller, the stores and the
//! query API. Storage backends and weather sources plug in through the
//! traits in [`pipeline`].

pub mod alerts;
pub mod cities;
pub mod error;
pub mod memory;
pub mod pipeline;
pub mod rollups;
pub mod types;

pub use alerts::*;
pub use cities::*;
pub use error::*;
pub use memory::*;
pub use pipeline::*;
pub use rollups::*;
pub use types::*;
