//! Core types and configuration for the Flower Field simulation.

pub mod types;
pub mod palette;
pub mod config;
pub mod store;
pub mod error;

pub use error::{Error, Result};
pub use types::*;
pub use palette::Palette;
pub use config::*;
pub use store::{ConfigStorage, ConfigStore, FileStorage, MemoryStorage, CONFIG_STORAGE_KEY};
