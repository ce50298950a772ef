pub mod use_cases;

use crate::adapters::{repositories, CsvMarketRepository, CsvStore, CsvUserRepository, Sha256Hasher};
use crate::config::StorageConfig;
use crate::core::{MarketRepository, PasswordHasher, Result, UserRepository};
use std::sync::Arc;
use use_cases::{
    AddMoney, BuyFlat, EditProfile, GetFlatList, GetUser, GetUserProperty, Login, Register,
    SellFlat,
};

/// Wires the repositories and the hasher into use cases. Holds no state of
/// its own beyond the shared handles.
pub struct Marketplace<U: UserRepository, M: MarketRepository, H: PasswordHasher> {
    users: Arc<U>,
    market: Arc<M>,
    hasher: Arc<H>,
}

pub type CsvMarketplace = Marketplace<CsvUserRepository, CsvMarketRepository, Sha256Hasher>;

impl CsvMarketplace {
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let (users, market) = repositories(CsvStore::open(config)?);
        Ok(Self::new(users, market, Sha256Hasher))
    }
}

impl<U: UserRepository, M: MarketRepository, H: PasswordHasher> Marketplace<U, M, H> {
    pub fn new(users: U, market: M, hasher: H) -> Self {
        Self {
            users: Arc::new(users),
            market: Arc::new(market),
            hasher: Arc::new(hasher),
        }
    }

    pub fn register(&self) -> Register<U, H> {
        Register::new(Arc::clone(&self.users), Arc::clone(&self.hasher))
    }

    pub fn login(&self) -> Login<U, H> {
        Login::new(Arc::clone(&self.users), Arc::clone(&self.hasher))
    }

    pub fn get_user(&self) -> GetUser<U> {
        GetUser::new(Arc::clone(&self.users))
    }

    pub fn get_user_property(&self) -> GetUserProperty<U> {
        GetUserProperty::new(Arc::clone(&self.users))
    }

    pub fn add_money(&self) -> AddMoney<U> {
        AddMoney::new(Arc::clone(&self.users))
    }

    pub fn edit_profile(&self) -> EditProfile<U, H> {
        EditProfile::new(Arc::clone(&self.users), Arc::clone(&self.hasher))
    }

    pub fn get_flat_list(&self) -> GetFlatList<M> {
        GetFlatList::new(Arc::clone(&self.market))
    }

    pub fn buy_flat(&self) -> BuyFlat<U, M> {
        BuyFlat::new(Arc::clone(&self.users), Arc::clone(&self.market))
    }

    pub fn sell_flat(&self) -> SellFlat<U, M> {
        SellFlat::new(Arc::clone(&self.users), Arc::clone(&self.market))
    }
}
