pub mod aggregate;
mod backend;

pub use backend::{BackendKeys, DEFAULT_DESIGNERS_KEY, DEFAULT_OBJECTS_KEY, LocalBackend};

use crate::model::{
    Designer, DesignerDraft, DesignerPatch, ObjectDraft, ObjectPatch, RecordId, SceneObject,
};
use crate::storage::{KeyValueStore, StorageError, load_collection, save_collection};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: RecordId },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type RecordResult<T> = Result<T, RecordError>;

/// An entity kept in a [`RecordStore`].
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Draft;
    type Patch;

    const KIND: &'static str;

    fn id(&self) -> &RecordId;
    fn from_draft(id: RecordId, draft: Self::Draft) -> Self;
    fn apply(&mut self, patch: Self::Patch);
}

impl Record for Designer {
    type Draft = DesignerDraft;
    type Patch = DesignerPatch;

    const KIND: &'static str = "designer";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: DesignerDraft) -> Self {
        Self {
            id,
            full_name: draft.full_name,
            working_hours: draft.working_hours,
            attached_objects_count: 0,
        }
    }

    fn apply(&mut self, patch: DesignerPatch) {
        if let Some(full_name) = patch.full_name {
            self.full_name = full_name;
        }
        if let Some(working_hours) = patch.working_hours {
            self.working_hours = working_hours;
        }
    }
}

impl Record for SceneObject {
    type Draft = ObjectDraft;
    type Patch = ObjectPatch;

    const KIND: &'static str = "object";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: ObjectDraft) -> Self {
        Self {
            id,
            name: draft.name,
            designer_id: draft.designer_id,
            color: draft.color,
            position: draft.position,
            size: draft.size,
            shape: draft.shape,
        }
    }

    fn apply(&mut self, patch: ObjectPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(designer_id) = patch.designer_id {
            self.designer_id = designer_id;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(shape) = patch.shape {
            self.shape = shape;
        }
    }
}

/// In-memory collection mirrored to a key-value store.
///
/// Every mutation is written to the store before it is committed in memory,
/// so a failed write leaves the collection untouched.
#[derive(Debug, Clone)]
pub struct RecordStore<T: Record> {
    key: String,
    records: Vec<T>,
}

impl<T: Record> RecordStore<T> {
    pub fn open<S: KeyValueStore + ?Sized>(storage: &S, key: impl Into<String>) -> Self {
        let key = key.into();
        let records = load_collection(storage, &key, Vec::new());
        Self { key, records }
    }

    pub fn list(&self) -> Vec<T> {
        self.records.clone()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    pub fn create<S: KeyValueStore + ?Sized>(
        &mut self,
        storage: &mut S,
        draft: T::Draft,
    ) -> RecordResult<T> {
        let record = T::from_draft(RecordId::generate(), draft);
        let mut next = self.records.clone();
        next.push(record.clone());
        self.commit(storage, next)?;
        log::debug!("[records] created {} {}", T::KIND, record.id());
        Ok(record)
    }

    pub fn update<S: KeyValueStore + ?Sized>(
        &mut self,
        storage: &mut S,
        id: &RecordId,
        patch: T::Patch,
    ) -> RecordResult<T> {
        let index = self
            .records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| RecordError::NotFound {
                kind: T::KIND,
                id: id.clone(),
            })?;

        let mut next = self.records.clone();
        next[index].apply(patch);
        let updated = next[index].clone();
        self.commit(storage, next)?;
        log::debug!("[records] updated {} {id}", T::KIND);
        Ok(updated)
    }

    /// Removes the record if present. Returns whether anything was removed.
    pub fn delete<S: KeyValueStore + ?Sized>(
        &mut self,
        storage: &mut S,
        id: &RecordId,
    ) -> RecordResult<bool> {
        let removed = self.retain(storage, |record| record.id() != id)?;
        if removed > 0 {
            log::debug!("[records] deleted {} {id}", T::KIND);
        }
        Ok(removed > 0)
    }

    /// Keeps only the records matching `keep`; returns how many were dropped.
    pub fn retain<S, F>(&mut self, storage: &mut S, mut keep: F) -> RecordResult<usize>
    where
        S: KeyValueStore + ?Sized,
        F: FnMut(&T) -> bool,
    {
        let next: Vec<T> = self
            .records
            .iter()
            .filter(|&record| keep(record))
            .cloned()
            .collect();
        let removed = self.records.len() - next.len();
        if removed > 0 {
            self.commit(storage, next)?;
        }
        Ok(removed)
    }

    /// Rewrites derived fields of every record, then persists.
    ///
    /// Derived data is recomputable, so the in-memory rewrite stands even
    /// when the write fails; the stored copy is corrected by the next
    /// successful write or on the next open.
    pub fn rewrite_derived<S, F>(&mut self, storage: &mut S, rewrite: F) -> RecordResult<()>
    where
        S: KeyValueStore + ?Sized,
        F: FnMut(&mut T),
    {
        self.records.iter_mut().for_each(rewrite);
        if let Err(err) = save_collection(storage, &self.key, &self.records) {
            log::error!("[records] failed to persist derived `{}`: {err}", self.key);
            return Err(err.into());
        }
        Ok(())
    }

    fn commit<S: KeyValueStore + ?Sized>(
        &mut self,
        storage: &mut S,
        next: Vec<T>,
    ) -> RecordResult<()> {
        if let Err(err) = save_collection(storage, &self.key, &next) {
            log::error!("[records] failed to persist `{}`: {err}", self.key);
            return Err(err.into());
        }
        self.records = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageResult};

    fn draft(name: &str) -> DesignerDraft {
        DesignerDraft {
            full_name: name.into(),
            working_hours: 8.0,
        }
    }

    #[test]
    fn create_assigns_unique_ids_and_persists() {
        let mut storage = MemoryStore::new();
        let mut store = RecordStore::<Designer>::open(&storage, "designers");

        let a = store.create(&mut storage, draft("Ada")).expect("create a");
        let b = store.create(&mut storage, draft("Grace")).expect("create b");
        assert_ne!(a.id, b.id);

        let reopened = RecordStore::<Designer>::open(&storage, "designers");
        let names: Vec<_> = reopened.list().into_iter().map(|d| d.full_name).collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
    }

    #[test]
    fn update_missing_id_fails_and_leaves_collection() {
        let mut storage = MemoryStore::new();
        let mut store = RecordStore::<Designer>::open(&storage, "designers");
        store.create(&mut storage, draft("Ada")).expect("create");
        let before = store.list();

        let err = store
            .update(
                &mut storage,
                &RecordId::from("missing"),
                DesignerPatch {
                    full_name: Some("Nobody".into()),
                    working_hours: None,
                },
            )
            .expect_err("update of missing id should fail");
        assert!(matches!(err, RecordError::NotFound { kind: "designer", .. }));
        assert_eq!(store.list(), before);
    }

    #[test]
    fn update_overwrites_only_present_fields() {
        let mut storage = MemoryStore::new();
        let mut store = RecordStore::<Designer>::open(&storage, "designers");
        let ada = store.create(&mut storage, draft("Ada")).expect("create");

        let updated = store
            .update(
                &mut storage,
                &ada.id,
                DesignerPatch {
                    full_name: None,
                    working_hours: Some(6.0),
                },
            )
            .expect("update");
        assert_eq!(updated.full_name, "Ada");
        assert_eq!(updated.working_hours, 6.0);
    }

    #[test]
    fn delete_is_idempotent() {
        let mut storage = MemoryStore::new();
        let mut store = RecordStore::<Designer>::open(&storage, "designers");
        let ada = store.create(&mut storage, draft("Ada")).expect("create");

        assert!(store.delete(&mut storage, &ada.id).expect("first delete"));
        assert!(!store.delete(&mut storage, &ada.id).expect("second delete"));
        assert!(store.is_empty());
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: String) -> StorageResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read only").into())
        }

        fn remove(&mut self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_does_not_commit() {
        let mut storage = ReadOnlyStore;
        let mut store = RecordStore::<Designer>::open(&storage, "designers");

        let err = store
            .create(&mut storage, draft("Ada"))
            .expect_err("write should fail");
        assert!(matches!(err, RecordError::Storage(_)));
        assert!(store.is_empty());
    }
}
