use crate::adapters::tables::Tables;
use crate::utils::error::Result;

/// Tables that an operation rewrites. The flats table is provisioned
/// externally and never written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Users,
    Owners,
}

/// Backing store for the marketplace tables. `write` runs `op` against a
/// consistent snapshot and persists the touched tables only if `op`
/// succeeds.
pub trait TableStore: Send + Sync {
    fn read<T, F>(&self, op: F) -> impl std::future::Future<Output = Result<T>> + Send
    where
        F: FnOnce(&Tables) -> Result<T> + Send,
        T: Send;

    fn write<T, F>(
        &self,
        touched: &'static [Table],
        op: F,
    ) -> impl std::future::Future<Output = Result<T>> + Send
    where
        F: FnOnce(&mut Tables) -> Result<T> + Send,
        T: Send;
}
