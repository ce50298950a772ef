use crate::adapters::store::{Table, TableStore};
use crate::adapters::tables::{FlatRow, Tables};
use crate::utils::error::Result;
use tokio::sync::RwLock;

/// Keeps the marketplace tables in memory. Used by tests and as a scratch
/// backend.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flats(flats: Vec<FlatRow>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                flats,
                ..Default::default()
            }),
        }
    }

    pub async fn snapshot(&self) -> Tables {
        self.tables.read().await.clone()
    }
}

impl TableStore for InMemoryStore {
    async fn read<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Tables) -> Result<T> + Send,
        T: Send,
    {
        let tables = self.tables.read().await;
        op(&tables)
    }

    async fn write<T, F>(&self, _touched: &'static [Table], op: F) -> Result<T>
    where
        F: FnOnce(&mut Tables) -> Result<T> + Send,
        T: Send,
    {
        let mut tables = self.tables.write().await;
        let mut next = tables.clone();
        let output = op(&mut next)?;
        *tables = next;
        Ok(output)
    }
}
