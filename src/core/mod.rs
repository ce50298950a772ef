pub mod session;

pub use crate::domain::model::{
    Flat, FlatFilter, FlatId, ProfileUpdate, Trade, User, UserId, UserProperty,
};
pub use crate::domain::ports::{MarketRepository, PasswordHasher, UserRepository};
pub use crate::utils::error::{MarketError, Result};
pub use session::Session;
