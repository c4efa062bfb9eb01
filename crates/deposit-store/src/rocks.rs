//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `DepositStore` trait.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use deposit_core::{Deposit, DepositId, NewDeposit};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::DepositStore;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    /// Serializes read-modify-write sequences (unique create, completion).
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn put_deposit(&self, deposit: &Deposit) -> Result<()> {
        let cf = self.cf(cf::DEPOSITS)?;
        let value = Self::serialize(deposit)?;

        self.db
            .put_cf(&cf, keys::deposit_key(&deposit.id), value)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn create_blocking(&self, new: NewDeposit) -> Result<DepositId> {
        let _guard = self.lock()?;

        let cf_deposits = self.cf(cf::DEPOSITS)?;
        let cf_by_session = self.cf(cf::DEPOSITS_BY_SESSION)?;
        let session_key = keys::session_key(&new.session_id);

        let exists = self
            .db
            .get_cf(&cf_by_session, &session_key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();
        if exists {
            return Err(StoreError::DuplicateSession {
                session_id: new.session_id,
            });
        }

        let deposit = Deposit::create(DepositId::generate(), new, chrono::Utc::now());
        let deposit_key = keys::deposit_key(&deposit.id);
        let value = Self::serialize(&deposit)?;

        // Write record and index atomically
        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_deposits, &deposit_key, &value);
        batch.put_cf(&cf_by_session, &session_key, &deposit_key);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(deposit.id)
    }

    fn get_blocking(&self, id: &DepositId) -> Result<Option<Deposit>> {
        let cf = self.cf(cf::DEPOSITS)?;

        self.db
            .get_cf(&cf, keys::deposit_key(id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn find_by_session_blocking(&self, session_id: &str) -> Result<Option<Deposit>> {
        let cf_by_session = self.cf(cf::DEPOSITS_BY_SESSION)?;

        let Some(id_bytes) = self
            .db
            .get_cf(&cf_by_session, keys::session_key(session_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let id = keys::decode_deposit_id(&id_bytes)?;
        self.get_blocking(&id)
    }

    fn mark_completed_blocking(&self, id: &DepositId) -> Result<bool> {
        let _guard = self.lock()?;

        let mut deposit = self.get_blocking(id)?.ok_or(StoreError::NotFound)?;

        // Compare-and-set: skip the write entirely when already completed
        if !deposit.complete(chrono::Utc::now()) {
            return Ok(false);
        }

        self.put_deposit(&deposit)?;
        Ok(true)
    }

    fn count_blocking(&self) -> Result<usize> {
        let cf = self.cf(cf::DEPOSITS)?;
        let mut count = 0;

        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            item.map_err(|e| StoreError::Database(e.to_string()))?;
            count += 1;
        }

        Ok(count)
    }

    fn list_blocking(&self, limit: usize, offset: usize) -> Result<Vec<Deposit>> {
        let cf = self.cf(cf::DEPOSITS)?;
        let mut deposits = Vec::new();

        // ULID keys are time-ordered, so iterating from the end yields newest first
        for item in self.db.iterator_cf(&cf, IteratorMode::End).skip(offset) {
            if deposits.len() >= limit {
                break;
            }

            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            deposits.push(Self::deserialize(&value)?);
        }

        Ok(deposits)
    }
}

#[async_trait]
impl DepositStore for RocksStore {
    async fn create(&self, deposit: NewDeposit) -> Result<DepositId> {
        self.create_blocking(deposit)
    }

    async fn get(&self, id: &DepositId) -> Result<Option<Deposit>> {
        self.get_blocking(id)
    }

    async fn find_by_session_id(&self, session_id: &str) -> Result<Option<Deposit>> {
        self.find_by_session_blocking(session_id)
    }

    async fn mark_completed(&self, id: &DepositId) -> Result<bool> {
        self.mark_completed_blocking(id)
    }

    async fn count(&self) -> Result<usize> {
        self.count_blocking()
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Deposit>> {
        self.list_blocking(limit, offset)
    }
}
