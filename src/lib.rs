pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{CsvStore, InMemoryStore, SessionFile, Sha256Hasher};
pub use app::{CsvMarketplace, Marketplace};
pub use config::{MarketConfig, StorageConfig};
pub use core::Session;
pub use utils::error::{MarketError, Result};
