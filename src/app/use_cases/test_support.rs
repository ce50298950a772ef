use crate::adapters::tables::FlatRow;
use crate::adapters::{
    InMemoryMarketRepository, InMemoryStore, InMemoryUserRepository, Sha256Hasher,
};
use crate::core::{FlatId, Session, UserRepository};
use std::sync::Arc;

pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub users: Arc<InMemoryUserRepository>,
    pub market: Arc<InMemoryMarketRepository>,
    pub hasher: Arc<Sha256Hasher>,
}

pub fn flat_row(id: u64, room_amount: u32, price: u64) -> FlatRow {
    FlatRow {
        id: FlatId(id),
        address: format!("Lenina {}", id),
        number: id as u32,
        floor: 1,
        room_amount,
        price,
    }
}

pub fn fixture() -> Fixture {
    fixture_with_flats(vec![
        flat_row(1, 2, 450_000),
        flat_row(2, 1, 300_000),
        flat_row(3, 3, 900_000),
    ])
}

pub fn fixture_with_flats(flats: Vec<FlatRow>) -> Fixture {
    let store = Arc::new(InMemoryStore::with_flats(flats));
    Fixture {
        users: Arc::new(InMemoryUserRepository::new(Arc::clone(&store))),
        market: Arc::new(InMemoryMarketRepository::new(Arc::clone(&store))),
        hasher: Arc::new(Sha256Hasher),
        store,
    }
}

impl Fixture {
    /// Registers `username` directly through the repository and funds it.
    pub async fn funded_session(&self, username: &str, balance: u64) -> Session {
        let user = self.users.register(username, "hash").await.unwrap();
        self.users.add_money(user.id, balance).await.unwrap();
        Session::new(user.id)
    }
}
