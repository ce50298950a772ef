use crate::adapters::store::{Table, TableStore};
use crate::adapters::tables::{
    FlatRow, OwnerRow, Tables, UserRow, FLAT_HEADERS, OWNER_HEADERS, USER_HEADERS,
};
use crate::config::StorageConfig;
use crate::utils::error::{MarketError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

/// The three marketplace tables as CSV files. Every call re-reads the files
/// and rewrites the touched ones in full. Calls through one store are
/// serialized; separate processes sharing the files are not coordinated.
#[derive(Debug)]
pub struct CsvStore {
    users_path: PathBuf,
    flats_path: PathBuf,
    owners_path: PathBuf,
    lock: Mutex<()>,
}

impl CsvStore {
    /// Opens the tables named by `config`, creating the data directory and
    /// any missing table with just its header row.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let data_dir = Path::new(&config.data_dir);
        fs::create_dir_all(data_dir)?;

        let store = Self {
            users_path: data_dir.join(&config.users_file),
            flats_path: data_dir.join(&config.flats_file),
            owners_path: data_dir.join(&config.owners_file),
            lock: Mutex::new(()),
        };

        create_if_missing::<UserRow>(&store.users_path, &USER_HEADERS)?;
        create_if_missing::<FlatRow>(&store.flats_path, &FLAT_HEADERS)?;
        create_if_missing::<OwnerRow>(&store.owners_path, &OWNER_HEADERS)?;

        tracing::debug!("Opened CSV store in {}", data_dir.display());
        Ok(store)
    }

    fn load(&self) -> Result<Tables> {
        let tables = Tables {
            users: read_rows(&self.users_path)?,
            flats: read_flats(&self.flats_path)?,
            owners: read_rows(&self.owners_path)?,
        };

        tracing::debug!(
            "Loaded {} users, {} flats, {} ownership links",
            tables.users.len(),
            tables.flats.len(),
            tables.owners.len()
        );
        Ok(tables)
    }

    fn stage(&self, table: Table, tables: &Tables) -> Result<StagedTable> {
        match table {
            Table::Users => StagedTable::new(&self.users_path, &USER_HEADERS, &tables.users),
            Table::Owners => StagedTable::new(&self.owners_path, &OWNER_HEADERS, &tables.owners),
        }
    }
}

impl TableStore for CsvStore {
    async fn read<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Tables) -> Result<T> + Send,
        T: Send,
    {
        let _guard = self.lock.lock().await;
        let tables = self.load()?;
        op(&tables)
    }

    async fn write<T, F>(&self, touched: &'static [Table], op: F) -> Result<T>
    where
        F: FnOnce(&mut Tables) -> Result<T> + Send,
        T: Send,
    {
        let _guard = self.lock.lock().await;
        let mut tables = self.load()?;
        let output = op(&mut tables)?;

        // Stage every file before replacing any of them.
        let staged = touched
            .iter()
            .map(|table| self.stage(*table, &tables))
            .collect::<Result<Vec<_>>>()?;
        for file in staged {
            file.commit()?;
        }

        tracing::debug!("Rewrote tables {:?}", touched);
        Ok(output)
    }
}

/// A fully written replacement for one table, waiting to be renamed over
/// the live table file.
struct StagedTable {
    file: NamedTempFile,
    target: PathBuf,
}

impl StagedTable {
    fn new<T: Serialize>(target: &Path, headers: &[&str], rows: &[T]) -> Result<Self> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let file = NamedTempFile::new_in(dir)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        // Written by hand so that empty tables keep their header.
        writer.write_record(headers)?;
        for row in rows {
            writer.serialize(row)?;
        }

        let file = writer
            .into_inner()
            .map_err(|e| MarketError::IoError(e.into_error()))?;

        Ok(Self {
            file,
            target: target.to_path_buf(),
        })
    }

    fn commit(self) -> Result<()> {
        self.file.as_file().sync_all()?;
        self.file
            .persist(&self.target)
            .map_err(|e| MarketError::IoError(e.error))?;
        Ok(())
    }
}

fn create_if_missing<T: Serialize>(path: &Path, headers: &[&str]) -> Result<()> {
    if path.exists() {
        return Ok(());
    }

    tracing::info!("Creating empty table {}", path.display());
    StagedTable::new::<T>(path, headers, &[])?.commit()
}

fn reader(path: &Path) -> Result<csv::Reader<fs::File>> {
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?)
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = reader(path)?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
    Ok(rows)
}

/// Flat rows with missing, malformed or non-UTF-8 fields, or a zero price,
/// are skipped.
fn read_flats(path: &Path) -> Result<Vec<FlatRow>> {
    let mut reader = reader(path)?;
    let headers = reader.byte_headers()?.clone();

    let mut flats = Vec::new();
    for (index, record) in reader.byte_records().enumerate() {
        let record = record?;
        // +2: one for the header, one for 1-based line numbers.
        let line = index + 2;
        match record.deserialize::<FlatRow>(Some(&headers)) {
            Ok(row) if row.price > 0 => flats.push(row),
            Ok(row) => {
                tracing::warn!("Skipping flat {} on line {}: price must be positive", row.id, line)
            }
            Err(e) => tracing::warn!("Skipping malformed flat row on line {}: {}", line, e),
        }
    }
    Ok(flats)
}
