//! Shared types for the moodwav service
//!
//! Holds the pieces both the service crate and its tests need: the common
//! error type, the emotion label domain with the suggested-video table, and
//! configuration loading.

pub mod config;
pub mod emotion;
pub mod error;

pub use error::{Error, Result};
