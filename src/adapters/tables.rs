//! Row types of the three marketplace tables and the operations applied to
//! them. Both the CSV store and the in-memory store load their state into
//! [`Tables`], run one of these operations, and keep the result only when it
//! succeeds. Every operation checks all of its preconditions before it
//! touches a row.

use crate::domain::model::{Flat, FlatId, ProfileUpdate, Trade, User, UserId, UserProperty};
use crate::utils::error::{MarketError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const USER_HEADERS: [&str; 4] = ["id", "username", "password_hash", "balance"];
pub const FLAT_HEADERS: [&str; 6] = ["id", "address", "number", "floor", "room_amount", "price"];
pub const OWNER_HEADERS: [&str; 2] = ["user_id", "flat_id"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub balance: u64,
}

impl UserRow {
    fn to_user(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            balance: self.balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRow {
    pub id: FlatId,
    pub address: String,
    pub number: u32,
    pub floor: i32,
    pub room_amount: u32,
    pub price: u64,
}

impl FlatRow {
    pub fn to_flat(&self, is_available: bool) -> Flat {
        Flat {
            id: self.id,
            address: self.address.clone(),
            number: self.number,
            floor: self.floor,
            room_amount: self.room_amount,
            price: self.price,
            is_available,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRow {
    pub user_id: UserId,
    pub flat_id: FlatId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tables {
    pub users: Vec<UserRow>,
    pub flats: Vec<FlatRow>,
    pub owners: Vec<OwnerRow>,
}

impl Tables {
    fn user_row(&self, user_id: UserId) -> Result<&UserRow> {
        self.users
            .iter()
            .find(|row| row.id == user_id)
            .ok_or(MarketError::UserNotFound(user_id))
    }

    fn user_row_mut(&mut self, user_id: UserId) -> Result<&mut UserRow> {
        self.users
            .iter_mut()
            .find(|row| row.id == user_id)
            .ok_or(MarketError::UserNotFound(user_id))
    }

    fn flat_row(&self, flat_id: FlatId) -> Result<&FlatRow> {
        self.flats
            .iter()
            .find(|row| row.id == flat_id)
            .ok_or(MarketError::FlatNotFound(flat_id))
    }

    fn username_in_use(&self, username: &str, except: Option<UserId>) -> bool {
        let wanted = username.to_lowercase();
        self.users
            .iter()
            .any(|row| Some(row.id) != except && row.username.to_lowercase() == wanted)
    }

    pub fn register(&mut self, username: &str, password_hash: &str) -> Result<User> {
        if self.username_in_use(username, None) {
            return Err(MarketError::UsernameTaken(username.to_string()));
        }

        let next_id = self.users.iter().map(|row| row.id.0).max().unwrap_or(0) + 1;
        let row = UserRow {
            id: UserId(next_id),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            balance: 0,
        };
        let user = row.to_user();
        self.users.push(row);
        Ok(user)
    }

    pub fn login(&self, username: &str, password_hash: &str) -> Result<UserId> {
        let wanted = username.to_lowercase();
        self.users
            .iter()
            .find(|row| row.username.to_lowercase() == wanted && row.password_hash == password_hash)
            .map(|row| row.id)
            .ok_or(MarketError::InvalidCredentials)
    }

    pub fn user(&self, user_id: UserId) -> Result<User> {
        self.user_row(user_id).map(UserRow::to_user)
    }

    /// Joins the ownership links of `user_id` against the flats table.
    /// Links that point at a flat missing from the table are skipped.
    pub fn property(&self, user_id: UserId) -> Result<UserProperty> {
        self.user_row(user_id)?;

        let properties = self
            .owners
            .iter()
            .filter(|link| link.user_id == user_id)
            .filter_map(|link| match self.flat_row(link.flat_id) {
                Ok(row) => Some(row.to_flat(false)),
                Err(_) => {
                    tracing::warn!(
                        "Skipping ownership link of user {} to unknown flat {}",
                        user_id,
                        link.flat_id
                    );
                    None
                }
            })
            .collect();

        Ok(UserProperty {
            user_id,
            properties,
        })
    }

    pub fn add_money(&mut self, user_id: UserId, amount: u64) -> Result<User> {
        let row = self.user_row_mut(user_id)?;
        let mut user = row.to_user();
        user.deposit(amount)?;
        row.balance = user.balance;
        Ok(user)
    }

    pub fn edit_profile(&mut self, user_id: UserId, update: &ProfileUpdate) -> Result<User> {
        self.user_row(user_id)?;

        if let Some(username) = &update.username {
            if self.username_in_use(username, Some(user_id)) {
                return Err(MarketError::UsernameTaken(username.clone()));
            }
        }

        let row = self.user_row_mut(user_id)?;
        if let Some(username) = &update.username {
            row.username = username.clone();
        }
        if let Some(password_hash) = &update.password_hash {
            row.password_hash = password_hash.clone();
        }
        Ok(row.to_user())
    }

    pub fn owner_of(&self, flat_id: FlatId) -> Option<UserId> {
        self.owners
            .iter()
            .find(|link| link.flat_id == flat_id)
            .map(|link| link.user_id)
    }

    pub fn flat_list(&self) -> Vec<Flat> {
        let sold: HashSet<FlatId> = self.owners.iter().map(|link| link.flat_id).collect();
        self.flats
            .iter()
            .map(|row| row.to_flat(!sold.contains(&row.id)))
            .collect()
    }

    pub fn flat(&self, flat_id: FlatId) -> Result<Flat> {
        let row = self.flat_row(flat_id)?;
        Ok(row.to_flat(self.owner_of(flat_id).is_none()))
    }

    pub fn purchase(&mut self, user_id: UserId, flat_id: FlatId) -> Result<Trade> {
        let mut user = self.user(user_id)?;
        let mut flat = self.flat(flat_id)?;

        flat.ensure_available()?;
        user.charge(flat.price)?;
        flat.sell();

        self.user_row_mut(user_id)?.balance = user.balance;
        self.owners.push(OwnerRow { user_id, flat_id });
        Ok(Trade { user, flat })
    }

    pub fn sell(&mut self, user_id: UserId, flat_id: FlatId) -> Result<Trade> {
        let mut user = self.user(user_id)?;
        let mut flat = self.flat(flat_id)?;

        if self.owner_of(flat_id) != Some(user_id) {
            return Err(MarketError::NotAnOwnerError { user_id, flat_id });
        }

        user.deposit(flat.price)?;
        flat.free();

        self.user_row_mut(user_id)?.balance = user.balance;
        self.owners
            .retain(|link| !(link.user_id == user_id && link.flat_id == flat_id));
        Ok(Trade { user, flat })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> Tables {
        Tables {
            users: vec![],
            flats: vec![
                FlatRow {
                    id: FlatId(1),
                    address: "Lenina 1".to_string(),
                    number: 12,
                    floor: 3,
                    room_amount: 2,
                    price: 450_000,
                },
                FlatRow {
                    id: FlatId(2),
                    address: "Mira 7".to_string(),
                    number: 4,
                    floor: 1,
                    room_amount: 1,
                    price: 300_000,
                },
            ],
            owners: vec![],
        }
    }

    #[test]
    fn test_register_assigns_sequential_ids() {
        let mut tables = tables();
        let first = tables.register("alice", "h1").unwrap();
        let second = tables.register("bob", "h2").unwrap();
        assert_eq!(first.id, UserId(1));
        assert_eq!(second.id, UserId(2));
        assert_eq!(second.balance, 0);
    }

    #[test]
    fn test_register_is_case_insensitive() {
        let mut tables = tables();
        tables.register("User1", "h").unwrap();
        let err = tables.register("user1", "h").unwrap_err();
        assert!(matches!(err, MarketError::UsernameTaken(name) if name == "user1"));
        assert_eq!(tables.users.len(), 1);
    }

    #[test]
    fn test_login_requires_matching_hash() {
        let mut tables = tables();
        let user = tables.register("alice", "good").unwrap();
        assert_eq!(tables.login("ALICE", "good").unwrap(), user.id);
        assert!(matches!(
            tables.login("alice", "bad"),
            Err(MarketError::InvalidCredentials)
        ));
        assert!(matches!(
            tables.login("nobody", "good"),
            Err(MarketError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_purchase_and_sell_cycle() {
        let mut tables = tables();
        let user = tables.register("alice", "h").unwrap();
        tables.add_money(user.id, 500_000).unwrap();

        let trade = tables.purchase(user.id, FlatId(1)).unwrap();
        assert_eq!(trade.user.balance, 50_000);
        assert!(!trade.flat.is_available);
        assert!(!tables.flat(FlatId(1)).unwrap().is_available);
        assert_eq!(tables.property(user.id).unwrap().properties.len(), 1);

        let trade = tables.sell(user.id, FlatId(1)).unwrap();
        assert_eq!(trade.user.balance, 500_000);
        assert!(trade.flat.is_available);
        assert!(tables.owners.is_empty());
    }

    #[test]
    fn test_failed_purchase_leaves_tables_untouched() {
        let mut tables = tables();
        let user = tables.register("alice", "h").unwrap();
        tables.add_money(user.id, 100).unwrap();
        let before = tables.clone();

        assert!(matches!(
            tables.purchase(user.id, FlatId(1)),
            Err(MarketError::NotEnoughMoney { .. })
        ));
        assert!(matches!(
            tables.purchase(user.id, FlatId(99)),
            Err(MarketError::FlatNotFound(FlatId(99)))
        ));
        assert!(matches!(
            tables.purchase(UserId(42), FlatId(1)),
            Err(MarketError::UserNotFound(UserId(42)))
        ));
        assert_eq!(tables, before);
    }

    #[test]
    fn test_sell_by_non_owner_leaves_tables_untouched() {
        let mut tables = tables();
        let owner = tables.register("alice", "h").unwrap();
        let other = tables.register("bob", "h").unwrap();
        tables.add_money(owner.id, 1_000_000).unwrap();
        tables.purchase(owner.id, FlatId(2)).unwrap();
        let before = tables.clone();

        assert!(matches!(
            tables.sell(other.id, FlatId(2)),
            Err(MarketError::NotAnOwnerError { .. })
        ));
        assert!(matches!(
            tables.sell(other.id, FlatId(1)),
            Err(MarketError::NotAnOwnerError { .. })
        ));
        assert_eq!(tables, before);
    }

    #[test]
    fn test_edit_profile_checks_other_users_names() {
        let mut tables = tables();
        let alice = tables.register("alice", "h").unwrap();
        tables.register("bob", "h").unwrap();

        let update = ProfileUpdate {
            username: Some("bob".to_string()),
            password_hash: None,
        };
        assert!(matches!(
            tables.edit_profile(alice.id, &update),
            Err(MarketError::UsernameTaken(_))
        ));

        let update = ProfileUpdate {
            username: Some("alice".to_string()),
            password_hash: Some("h2".to_string()),
        };
        let user = tables.edit_profile(alice.id, &update).unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(tables.login("alice", "h2").unwrap(), alice.id);
    }

    #[test]
    fn test_property_skips_dangling_links() {
        let mut tables = tables();
        let user = tables.register("alice", "h").unwrap();
        tables.owners.push(OwnerRow {
            user_id: user.id,
            flat_id: FlatId(77),
        });
        assert!(tables.property(user.id).unwrap().properties.is_empty());
    }
}
