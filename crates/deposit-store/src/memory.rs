//! In-memory storage implementation.
//!
//! Nothing survives a restart. Used by tests and by service builds that
//! don't include a durable backend.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use deposit_core::{Deposit, DepositId, NewDeposit};

use crate::error::{Result, StoreError};
use crate::DepositStore;

#[derive(Default)]
struct Inner {
    deposits: BTreeMap<DepositId, Deposit>,
    by_session: HashMap<String, DepositId>,
}

/// Non-durable, in-process deposit store.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DepositStore for MemoryStore {
    async fn create(&self, deposit: NewDeposit) -> Result<DepositId> {
        let mut inner = self.inner.write().await;

        if inner.by_session.contains_key(&deposit.session_id) {
            return Err(StoreError::DuplicateSession {
                session_id: deposit.session_id,
            });
        }

        let deposit = Deposit::create(DepositId::generate(), deposit, chrono::Utc::now());
        let id = deposit.id;
        inner.by_session.insert(deposit.session_id.clone(), id);
        inner.deposits.insert(id, deposit);

        Ok(id)
    }

    async fn get(&self, id: &DepositId) -> Result<Option<Deposit>> {
        Ok(self.inner.read().await.deposits.get(id).cloned())
    }

    async fn find_by_session_id(&self, session_id: &str) -> Result<Option<Deposit>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_session
            .get(session_id)
            .and_then(|id| inner.deposits.get(id))
            .cloned())
    }

    async fn mark_completed(&self, id: &DepositId) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let deposit = inner.deposits.get_mut(id).ok_or(StoreError::NotFound)?;
        Ok(deposit.complete(chrono::Utc::now()))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.inner.read().await.deposits.len())
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Deposit>> {
        let inner = self.inner.read().await;
        Ok(inner
            .deposits
            .values()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deposit_core::DepositStatus;
    use std::sync::Arc;

    #[tokio::test]
    async fn create_find_complete() {
        let store = MemoryStore::new();
        let id = store
            .create(NewDeposit::for_session("cs_mem_1", 5000))
            .await
            .unwrap();

        let deposit = store.find_by_session_id("cs_mem_1").await.unwrap().unwrap();
        assert_eq!(deposit.id, id);
        assert_eq!(deposit.status, DepositStatus::Pending);

        assert!(store.mark_completed(&id).await.unwrap());
        assert!(!store.mark_completed(&id).await.unwrap());

        let deposit = store.get(&id).await.unwrap().unwrap();
        assert_eq!(deposit.status, DepositStatus::Completed);
    }

    #[tokio::test]
    async fn duplicate_session_rejected() {
        let store = MemoryStore::new();
        store
            .create(NewDeposit::for_session("cs_mem_dup", 100))
            .await
            .unwrap();

        let result = store
            .create(NewDeposit::for_session("cs_mem_dup", 100))
            .await;
        assert!(matches!(result, Err(StoreError::DuplicateSession { .. })));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn concurrent_completion_transitions_once() {
        let store = Arc::new(MemoryStore::new());
        let id = store
            .create(NewDeposit::for_session("cs_mem_race", 100))
            .await
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.mark_completed(&id).await.unwrap() })
            })
            .collect();

        let mut transitions = 0;
        for handle in handles {
            if handle.await.unwrap() {
                transitions += 1;
            }
        }

        assert_eq!(transitions, 1);
    }

    #[tokio::test]
    async fn unknown_deposit_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.mark_completed(&DepositId::generate()).await,
            Err(StoreError::NotFound)
        ));
    }
}
