use crate::core::{
    Flat, FlatFilter, FlatId, MarketError, MarketRepository, Result, Session, Trade,
    UserRepository,
};
use crate::utils::validation::Validate;
use std::sync::Arc;

pub struct GetFlatList<M: MarketRepository> {
    market: Arc<M>,
}

impl<M: MarketRepository> GetFlatList<M> {
    pub fn new(market: Arc<M>) -> Self {
        Self { market }
    }

    pub async fn execute(&self) -> Result<Vec<Flat>> {
        self.market.get_flat_list().await
    }

    /// The listing as browsed: matching flats, cheapest first.
    pub async fn execute_filtered(&self, filter: &FlatFilter) -> Result<Vec<Flat>> {
        filter.validate()?;

        let mut flats: Vec<Flat> = self
            .execute()
            .await?
            .into_iter()
            .filter(|flat| filter.matches(flat))
            .collect();
        flats.sort_by_key(|flat| flat.price);
        Ok(flats)
    }
}

/// Buys a flat for the signed-in user.
///
/// Preconditions are checked against freshly loaded entities and the
/// expected outcome is computed on those local copies. The repository checks
/// them once more while it holds the tables and persists both the balance
/// and the ownership link; the stored result is what gets returned.
pub struct BuyFlat<U: UserRepository, M: MarketRepository> {
    users: Arc<U>,
    market: Arc<M>,
}

impl<U: UserRepository, M: MarketRepository> BuyFlat<U, M> {
    pub fn new(users: Arc<U>, market: Arc<M>) -> Self {
        Self { users, market }
    }

    pub async fn execute(&self, session: &Session, flat_id: FlatId) -> Result<Trade> {
        let mut user = self.users.get_user(session.user_id).await?;
        let mut flat = self.market.get_flat(flat_id).await?;

        flat.ensure_available()?;
        user.charge(flat.price)?;
        flat.sell();
        let expected = Trade { user, flat };

        let trade = self.market.purchase_flat(session.user_id, flat_id).await?;
        if trade != expected {
            tracing::warn!(
                user_id = %session.user_id,
                flat_id = %flat_id,
                "Stored state moved on during purchase"
            );
        }

        tracing::info!(
            user_id = %trade.user.id,
            flat_id = %trade.flat.id,
            price = trade.flat.price,
            balance = trade.user.balance,
            "Flat purchased"
        );
        Ok(trade)
    }
}

/// Sells a flat back for the signed-in user. Ownership is verified before
/// anything else is computed.
pub struct SellFlat<U: UserRepository, M: MarketRepository> {
    users: Arc<U>,
    market: Arc<M>,
}

impl<U: UserRepository, M: MarketRepository> SellFlat<U, M> {
    pub fn new(users: Arc<U>, market: Arc<M>) -> Self {
        Self { users, market }
    }

    pub async fn execute(&self, session: &Session, flat_id: FlatId) -> Result<Trade> {
        let mut user = self.users.get_user(session.user_id).await?;
        let mut flat = self.market.get_flat(flat_id).await?;

        if self.market.get_owner(flat_id).await? != Some(user.id) {
            return Err(MarketError::NotAnOwnerError {
                user_id: user.id,
                flat_id,
            });
        }

        user.deposit(flat.price)?;
        flat.free();
        let expected = Trade { user, flat };

        let trade = self.market.sell_flat(session.user_id, flat_id).await?;
        if trade != expected {
            tracing::warn!(
                user_id = %session.user_id,
                flat_id = %flat_id,
                "Stored state moved on during sale"
            );
        }

        tracing::info!(
            user_id = %trade.user.id,
            flat_id = %trade.flat.id,
            price = trade.flat.price,
            balance = trade.user.balance,
            "Flat sold"
        );
        Ok(trade)
    }
}
