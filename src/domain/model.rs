use crate::utils::error::{MarketError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FlatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub balance: u64,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            balance: 0,
        }
    }

    /// Adds `amount` to the balance.
    pub fn deposit(&mut self, amount: u64) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(MarketError::BalanceOverflow(self.id))?;
        Ok(())
    }

    /// Subtracts `amount` from the balance. The balance is left untouched
    /// when it does not cover the amount.
    pub fn charge(&mut self, amount: u64) -> Result<()> {
        if self.balance < amount {
            return Err(MarketError::NotEnoughMoney {
                balance: self.balance,
                price: amount,
            });
        }

        self.balance -= amount;
        Ok(())
    }

    pub fn rename(&mut self, new_username: impl Into<String>) {
        self.username = new_username.into();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flat {
    pub id: FlatId,
    pub address: String,
    pub number: u32,
    pub floor: i32,
    pub room_amount: u32,
    pub price: u64,
    pub is_available: bool,
}

impl Flat {
    /// Locks the flat once it has been bought.
    pub fn sell(&mut self) {
        self.is_available = false;
    }

    /// Returns the flat to stock.
    pub fn free(&mut self) {
        self.is_available = true;
    }

    pub fn ensure_available(&self) -> Result<()> {
        if self.is_available {
            Ok(())
        } else {
            Err(MarketError::ItemAlreadySold(self.id))
        }
    }
}

/// Flats currently owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProperty {
    pub user_id: UserId,
    pub properties: Vec<Flat>,
}

/// Persisted outcome of a purchase or a sale: both sides as stored after
/// the write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub user: User,
    pub flat: Flat,
}

/// Requested profile changes. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub password_hash: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password_hash.is_none()
    }
}

/// Narrows a flat listing. Price bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatFilter {
    pub rooms: Option<u32>,
    pub available_only: bool,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
}

impl FlatFilter {
    pub fn matches(&self, flat: &Flat) -> bool {
        if self.rooms.is_some_and(|rooms| flat.room_amount != rooms) {
            return false;
        }
        if self.available_only && !flat.is_available {
            return false;
        }
        if self.min_price.is_some_and(|min| flat.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| flat.price > max) {
            return false;
        }
        true
    }
}

impl crate::utils::validation::Validate for FlatFilter {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_ordered("price", self.min_price, self.max_price)
    }
}
