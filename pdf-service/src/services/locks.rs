use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-document write locks.
///
/// Append holds a document's lock across its read-modify-write, so concurrent
/// appends to the same document serialize while appends to different
/// documents proceed in parallel. Fetch takes no lock.
#[derive(Default)]
pub struct DocumentLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl DocumentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_key_serializes() {
        let locks = DocumentLocks::new();
        let guard = locks.acquire("doc").await;

        let blocked = tokio::time::timeout(Duration::from_millis(50), locks.acquire("doc")).await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("doc")).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn different_keys_do_not_block() {
        let locks = DocumentLocks::new();
        let _guard = locks.acquire("a").await;

        let other = tokio::time::timeout(Duration::from_millis(50), locks.acquire("b")).await;
        assert!(other.is_ok());
    }
}
