// Adapters layer: concrete implementations of the domain ports (storage, hashing)
// plus the session file used by the command-line front end.

pub mod csv_store;
pub mod memory_store;
pub mod repository;
pub mod security;
pub mod session_file;
pub mod store;
pub mod tables;

pub use csv_store::CsvStore;
pub use memory_store::InMemoryStore;
pub use repository::{
    repositories, CsvMarketRepository, CsvUserRepository, InMemoryMarketRepository,
    InMemoryUserRepository, StoreMarketRepository, StoreUserRepository,
};
pub use security::Sha256Hasher;
pub use session_file::SessionFile;
