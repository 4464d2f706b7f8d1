use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async mutex per worldview.
///
/// Find-then-create on a worldview's pattern pool runs under its lock, so
/// two integrations into the same worldview cannot both miss and insert the
/// same claim. Different worldviews never contend.
#[derive(Debug, Default)]
pub struct WorldviewLocks {
    inner: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl WorldviewLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and take the lock of `worldview_id`.
    pub async fn acquire(&self, worldview_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(worldview_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of worldviews that have been locked at least once.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
