//! In-memory element store for tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use panolot_core::{EntityId, Error, ProjectId, Result};

use crate::records::{ElementPayload, ElementRecord};
use crate::store::ElementStore;

#[derive(Debug, Default)]
struct Inner {
    rows: BTreeMap<EntityId, ElementRecord>,
    next_id: EntityId,
    creates: usize,
    updates: usize,
    deletes: usize,
    lists: usize,
}

/// An [`ElementStore`] over a plain map, with call counters so tests can
/// assert that an operation issued no network call.
#[derive(Debug, Default)]
pub struct MemoryElementStore {
    inner: Mutex<Inner>,
    fail_next: Mutex<Option<Error>>,
}

impl MemoryElementStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next store call fail with the given error.
    pub fn fail_next(&self, error: Error) {
        *self.fail_next.lock() = Some(error);
    }

    /// Number of create calls seen so far.
    pub fn create_count(&self) -> usize {
        self.inner.lock().creates
    }

    /// Number of update calls seen so far.
    pub fn update_count(&self) -> usize {
        self.inner.lock().updates
    }

    /// Number of delete calls seen so far.
    pub fn delete_count(&self) -> usize {
        self.inner.lock().deletes
    }

    /// Number of list calls seen so far.
    pub fn list_count(&self) -> usize {
        self.inner.lock().lists
    }

    /// Number of rows currently stored.
    pub fn row_count(&self) -> usize {
        self.inner.lock().rows.len()
    }

    fn take_failure(&self) -> Result<()> {
        match self.fail_next.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn materialize(payload: ElementPayload, id: EntityId) -> ElementRecord {
        ElementRecord {
            id,
            project_id: payload.project_id,
            kind: payload.kind,
            number: payload.number,
            title: payload.title,
            description: payload.description,
            status: payload.status.map(|s| s.into()),
            price: payload.price.map(|p| p.into()),
            surface: payload.surface.map(|s| s.into()),
            stroke_or_color: payload.stroke_or_color.map(|c| c.into()),
            geometry: payload.geometry,
        }
    }
}

#[async_trait]
impl ElementStore for MemoryElementStore {
    async fn list(&self, project_id: ProjectId) -> Result<Vec<ElementRecord>> {
        self.take_failure()?;
        let mut inner = self.inner.lock();
        inner.lists += 1;
        Ok(inner
            .rows
            .values()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create(&self, payload: ElementPayload) -> Result<ElementRecord> {
        self.take_failure()?;
        let mut inner = self.inner.lock();
        inner.creates += 1;
        inner.next_id += 1;
        let id = inner.next_id;
        let record = Self::materialize(payload, id);
        inner.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: EntityId, payload: ElementPayload) -> Result<ElementRecord> {
        self.take_failure()?;
        let mut inner = self.inner.lock();
        inner.updates += 1;
        if !inner.rows.contains_key(&id) {
            return Err(Error::other(format!("no element with id {id}")));
        }
        let record = Self::materialize(payload, id);
        inner.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: EntityId) -> Result<()> {
        self.take_failure()?;
        let mut inner = self.inner.lock();
        inner.deletes += 1;
        inner.rows.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panolot_core::{LotStatus, SphericalPoint};

    #[tokio::test]
    async fn create_assigns_ids_and_scopes_by_project() {
        let store = MemoryElementStore::new();
        let points = [SphericalPoint::new(0.0, 0.0), SphericalPoint::new(0.1, 0.0)];
        let a = store
            .create(ElementPayload::lot(1, "A1", LotStatus::Available, 0, 0, 4.0, &points))
            .await
            .unwrap();
        let b = store
            .create(ElementPayload::lot(2, "B1", LotStatus::Available, 0, 0, 4.0, &points))
            .await
            .unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list(1).await.unwrap().len(), 1);
        assert_eq!(store.create_count(), 2);
    }

    #[tokio::test]
    async fn injected_failure_fires_once() {
        let store = MemoryElementStore::new();
        store.fail_next(panolot_core::AuthError::SessionExpired.into());
        assert!(store.list(1).await.unwrap_err().is_auth());
        assert!(store.list(1).await.is_ok());
    }
}
