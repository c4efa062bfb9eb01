//! Deposit store selection.
//!
//! PostgreSQL when `DATABASE_URL` is set, otherwise `RocksDB` under
//! `data_dir`. There is no in-memory fallback: a deposit that vanishes on
//! restart can never be reconciled.

use std::sync::Arc;

use deposit_store::{DepositStore, PgStore, StoreError};

use crate::config::{ConfigError, ServiceConfig};

/// Errors opening the configured store.
#[derive(Debug, thiserror::Error)]
pub enum OpenStoreError {
    /// No durable backend is available.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The backend failed to open.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Open the deposit store described by `config`.
///
/// # Errors
///
/// Returns `ConfigError::NoDurableStore` when neither PostgreSQL nor
/// `RocksDB` is available, or the backend's error if it fails to open.
pub async fn open_store(config: &ServiceConfig) -> Result<Arc<dyn DepositStore>, OpenStoreError> {
    if let Some(url) = &config.database_url {
        tracing::info!("Connecting to PostgreSQL store");
        return Ok(Arc::new(PgStore::connect(url).await?));
    }

    open_local_store(config)
}

#[cfg(feature = "rocksdb-backend")]
fn open_local_store(config: &ServiceConfig) -> Result<Arc<dyn DepositStore>, OpenStoreError> {
    tracing::info!(path = %config.data_dir, "Opening RocksDB store");
    Ok(Arc::new(deposit_store::RocksStore::open(&config.data_dir)?))
}

#[cfg(not(feature = "rocksdb-backend"))]
fn open_local_store(_config: &ServiceConfig) -> Result<Arc<dyn DepositStore>, OpenStoreError> {
    tracing::error!("No DATABASE_URL and built without rocksdb-backend");
    Err(ConfigError::NoDurableStore.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config(dir: &tempfile::TempDir) -> ServiceConfig {
        ServiceConfig {
            data_dir: dir.path().join("deposits").to_string_lossy().into_owned(),
            ..ServiceConfig::default()
        }
    }

    #[cfg(feature = "rocksdb-backend")]
    #[tokio::test]
    async fn local_store_survives_reopen() {
        use deposit_core::{DepositStatus, NewDeposit};

        let dir = tempfile::tempdir().unwrap();
        let config = local_config(&dir);

        let id = {
            let store = open_store(&config).await.unwrap();
            let id = store
                .create(NewDeposit::for_session("cs_durable", 5000))
                .await
                .unwrap();
            assert!(store.mark_completed(&id).await.unwrap());
            id
        };

        let store = open_store(&config).await.unwrap();
        let deposit = store.find_by_session_id("cs_durable").await.unwrap().unwrap();
        assert_eq!(deposit.id, id);
        assert_eq!(deposit.status, DepositStatus::Completed);
    }

    #[cfg(not(feature = "rocksdb-backend"))]
    #[tokio::test]
    async fn refuses_to_start_without_durable_backend() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_store(&local_config(&dir)).await.err().unwrap();
        assert!(matches!(
            err,
            OpenStoreError::Config(ConfigError::NoDurableStore)
        ));
    }
}
