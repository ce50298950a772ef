use crate::domain::model::{Flat, FlatId, ProfileUpdate, Trade, User, UserId, UserProperty};
use crate::utils::error::{MarketError, Result};
use async_trait::async_trait;

pub trait PasswordHasher: Send + Sync {
    /// Deterministic one-way digest of `password`, rendered as hex.
    fn hash(&self, password: &str) -> String;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user with a zero balance. Fails with `UsernameTaken` when
    /// the name is in use, compared case-insensitively.
    async fn register(&self, username: &str, password_hash: &str) -> Result<User>;

    async fn login(&self, username: &str, password_hash: &str) -> Result<UserId>;

    async fn get_user(&self, user_id: UserId) -> Result<User>;

    async fn get_property(&self, user_id: UserId) -> Result<UserProperty>;

    /// Adds `amount` to the stored balance and returns the stored user.
    async fn add_money(&self, _user_id: UserId, _amount: u64) -> Result<User> {
        Err(MarketError::NotImplemented("add_money"))
    }

    async fn edit_profile(&self, _user_id: UserId, _update: &ProfileUpdate) -> Result<User> {
        Err(MarketError::NotImplemented("edit_profile"))
    }
}

#[async_trait]
pub trait MarketRepository: Send + Sync {
    async fn get_flat_list(&self) -> Result<Vec<Flat>>;

    async fn get_flat(&self, flat_id: FlatId) -> Result<Flat>;

    async fn get_owner(&self, flat_id: FlatId) -> Result<Option<UserId>>;

    /// Moves the price from the buyer's balance and records ownership in one
    /// step. Every precondition is checked again against the stored state.
    async fn purchase_flat(&self, user_id: UserId, flat_id: FlatId) -> Result<Trade>;

    async fn sell_flat(&self, user_id: UserId, flat_id: FlatId) -> Result<Trade>;
}
