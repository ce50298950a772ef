pub mod account;
pub mod auth;
pub mod market;

#[cfg(test)]
pub(crate) mod test_support;

pub use account::{AddMoney, EditProfile, GetUser, GetUserProperty};
pub use auth::{Login, Register};
pub use market::{BuyFlat, GetFlatList, SellFlat};
