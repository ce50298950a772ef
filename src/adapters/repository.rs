use crate::adapters::csv_store::CsvStore;
use crate::adapters::memory_store::InMemoryStore;
use crate::adapters::store::{Table, TableStore};
use crate::domain::model::{Flat, FlatId, ProfileUpdate, Trade, User, UserId, UserProperty};
use crate::domain::ports::{MarketRepository, UserRepository};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// User port over any [`TableStore`].
#[derive(Debug)]
pub struct StoreUserRepository<S: TableStore> {
    store: Arc<S>,
}

/// Market port over any [`TableStore`].
#[derive(Debug)]
pub struct StoreMarketRepository<S: TableStore> {
    store: Arc<S>,
}

pub type CsvUserRepository = StoreUserRepository<CsvStore>;
pub type CsvMarketRepository = StoreMarketRepository<CsvStore>;
pub type InMemoryUserRepository = StoreUserRepository<InMemoryStore>;
pub type InMemoryMarketRepository = StoreMarketRepository<InMemoryStore>;

impl<S: TableStore> StoreUserRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: TableStore> StoreMarketRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: TableStore> Clone for StoreUserRepository<S> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.store))
    }
}

impl<S: TableStore> Clone for StoreMarketRepository<S> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.store))
    }
}

/// Both repositories over one shared store.
pub fn repositories<S: TableStore>(
    store: S,
) -> (StoreUserRepository<S>, StoreMarketRepository<S>) {
    let store = Arc::new(store);
    (
        StoreUserRepository::new(Arc::clone(&store)),
        StoreMarketRepository::new(store),
    )
}

#[async_trait]
impl<S: TableStore> UserRepository for StoreUserRepository<S> {
    async fn register(&self, username: &str, password_hash: &str) -> Result<User> {
        let user = self
            .store
            .write(&[Table::Users], |tables| {
                tables.register(username, password_hash)
            })
            .await?;
        tracing::debug!(user_id = %user.id, "Stored new user");
        Ok(user)
    }

    async fn login(&self, username: &str, password_hash: &str) -> Result<UserId> {
        self.store
            .read(|tables| tables.login(username, password_hash))
            .await
    }

    async fn get_user(&self, user_id: UserId) -> Result<User> {
        self.store.read(|tables| tables.user(user_id)).await
    }

    async fn get_property(&self, user_id: UserId) -> Result<UserProperty> {
        self.store.read(|tables| tables.property(user_id)).await
    }

    async fn add_money(&self, user_id: UserId, amount: u64) -> Result<User> {
        self.store
            .write(&[Table::Users], |tables| tables.add_money(user_id, amount))
            .await
    }

    async fn edit_profile(&self, user_id: UserId, update: &ProfileUpdate) -> Result<User> {
        self.store
            .write(&[Table::Users], |tables| tables.edit_profile(user_id, update))
            .await
    }
}

#[async_trait]
impl<S: TableStore> MarketRepository for StoreMarketRepository<S> {
    async fn get_flat_list(&self) -> Result<Vec<Flat>> {
        self.store.read(|tables| Ok(tables.flat_list())).await
    }

    async fn get_flat(&self, flat_id: FlatId) -> Result<Flat> {
        self.store.read(|tables| tables.flat(flat_id)).await
    }

    async fn get_owner(&self, flat_id: FlatId) -> Result<Option<UserId>> {
        self.store.read(|tables| Ok(tables.owner_of(flat_id))).await
    }

    async fn purchase_flat(&self, user_id: UserId, flat_id: FlatId) -> Result<Trade> {
        self.store
            .write(&[Table::Users, Table::Owners], |tables| {
                tables.purchase(user_id, flat_id)
            })
            .await
    }

    async fn sell_flat(&self, user_id: UserId, flat_id: FlatId) -> Result<Trade> {
        self.store
            .write(&[Table::Users, Table::Owners], |tables| {
                tables.sell(user_id, flat_id)
            })
            .await
    }
}
