use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;

use campus_core::{DomainError, DomainResult, Entity, Patch};

/// Keyed record store, generic over the record shape.
pub trait EntityStore<V: Entity>: Send + Sync {
    fn get(&self, id: &V::Id) -> Option<V>;

    /// Insert or replace a record under its own id.
    fn put(&self, record: V);

    /// Insert a record whose id must not be taken yet.
    fn insert_new(&self, record: V) -> DomainResult<V>;

    /// All records, ordered by `(created_at, id)`.
    fn list(&self) -> Vec<V>;

    /// Atomic read-modify-write of a single record.
    ///
    /// `f` works on a copy; the stored record is replaced only when `f`
    /// succeeds.
    fn modify(
        &self,
        id: &V::Id,
        f: &mut dyn FnMut(&mut V) -> DomainResult<()>,
    ) -> DomainResult<V>;

    fn contains(&self, id: &V::Id) -> bool {
        self.get(id).is_some()
    }

    /// Apply a partial update; fails with `NotFound` for unknown ids.
    fn update<P>(&self, id: &V::Id, patch: P) -> DomainResult<V>
    where
        P: Patch<V>,
        Self: Sized,
    {
        let mut patch = Some(patch);
        let now = Utc::now();
        self.modify(id, &mut |record| match patch.take() {
            Some(p) => p.apply(record, now),
            None => Ok(()),
        })
    }
}

impl<V, S> EntityStore<V> for Arc<S>
where
    V: Entity,
    S: EntityStore<V> + ?Sized,
{
    fn get(&self, id: &V::Id) -> Option<V> {
        (**self).get(id)
    }

    fn put(&self, record: V) {
        (**self).put(record)
    }

    fn insert_new(&self, record: V) -> DomainResult<V> {
        (**self).insert_new(record)
    }

    fn list(&self) -> Vec<V> {
        (**self).list()
    }

    fn modify(
        &self,
        id: &V::Id,
        f: &mut dyn FnMut(&mut V) -> DomainResult<()>,
    ) -> DomainResult<V> {
        (**self).modify(id, f)
    }
}

/// In-memory record store.
///
/// Readers share the lock; every write replaces a whole record, so a reader
/// never observes a half-applied update.
#[derive(Debug)]
pub struct InMemoryEntityStore<V: Entity> {
    inner: RwLock<HashMap<V::Id, V>>,
}

impl<V: Entity> InMemoryEntityStore<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Entity> Default for InMemoryEntityStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> DomainError {
    tracing::error!("entity store lock poisoned");
    DomainError::invariant("entity store lock poisoned")
}

impl<V> EntityStore<V> for InMemoryEntityStore<V>
where
    V: Entity + Clone + Send + Sync + 'static,
    V::Id: Send + Sync,
{
    fn get(&self, id: &V::Id) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(id).cloned()
    }

    fn put(&self, record: V) {
        match self.inner.write() {
            Ok(mut map) => {
                map.insert(*record.id(), record);
            }
            Err(_) => {
                poisoned();
            }
        }
    }

    fn insert_new(&self, record: V) -> DomainResult<V> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let id = *record.id();
        if map.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "{} with id {id} already exists",
                V::kind()
            )));
        }
        map.insert(id, record.clone());
        Ok(record)
    }

    fn list(&self) -> Vec<V> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => {
                poisoned();
                return vec![];
            }
        };

        let mut records: Vec<V> = map.values().cloned().collect();
        records.sort_by_key(|r| (r.created_at(), *r.id()));
        records
    }

    fn modify(
        &self,
        id: &V::Id,
        f: &mut dyn FnMut(&mut V) -> DomainResult<()>,
    ) -> DomainResult<V> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let stored = map.get_mut(id).ok_or(DomainError::not_found(V::kind()))?;

        let mut next = stored.clone();
        f(&mut next)?;
        *stored = next.clone();
        Ok(next)
    }
}
