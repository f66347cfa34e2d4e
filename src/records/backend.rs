use super::aggregate::{apply_counts, attached_counts};
use super::{RecordResult, RecordStore};
use crate::model::{
    Designer, DesignerDraft, DesignerPatch, ObjectDraft, ObjectPatch, RecordId, SceneObject,
};
use crate::storage::KeyValueStore;

pub const DEFAULT_DESIGNERS_KEY: &str = "dashboard3d_designers";
pub const DEFAULT_OBJECTS_KEY: &str = "dashboard3d_objects";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendKeys {
    pub designers: String,
    pub objects: String,
}

impl Default for BackendKeys {
    fn default() -> Self {
        Self {
            designers: DEFAULT_DESIGNERS_KEY.to_string(),
            objects: DEFAULT_OBJECTS_KEY.to_string(),
        }
    }
}

/// The designer and object collections over one key-value store.
///
/// Designer counts are recomputed after every object mutation and after a
/// designer cascade, so listing designers is always consistent with the
/// object collection.
pub struct LocalBackend<S: KeyValueStore> {
    storage: S,
    designers: RecordStore<Designer>,
    objects: RecordStore<SceneObject>,
}

impl<S: KeyValueStore> LocalBackend<S> {
    pub fn open(storage: S) -> RecordResult<Self> {
        Self::with_keys(storage, BackendKeys::default())
    }

    /// Stored counts may be stale, so they are recomputed once on open.
    pub fn with_keys(storage: S, keys: BackendKeys) -> RecordResult<Self> {
        let designers = RecordStore::open(&storage, keys.designers);
        let objects = RecordStore::open(&storage, keys.objects);
        let mut backend = Self {
            storage,
            designers,
            objects,
        };
        backend.recalculate_counts()?;
        log::info!(
            "[records] opened backend with {} designers and {} objects",
            backend.designers.len(),
            backend.objects.len()
        );
        Ok(backend)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn list_designers(&self) -> Vec<Designer> {
        self.designers.list()
    }

    pub fn designer(&self, id: &RecordId) -> Option<&Designer> {
        self.designers.get(id)
    }

    pub fn create_designer(&mut self, draft: DesignerDraft) -> RecordResult<Designer> {
        self.designers.create(&mut self.storage, draft)
    }

    pub fn update_designer(
        &mut self,
        id: &RecordId,
        patch: DesignerPatch,
    ) -> RecordResult<Designer> {
        self.designers.update(&mut self.storage, id, patch)
    }

    /// Deletes the designer and every object referencing it.
    ///
    /// The two collections are written one after the other; if the object
    /// write fails the designer is already gone.
    pub fn delete_designer(&mut self, id: &RecordId) -> RecordResult<()> {
        self.designers.delete(&mut self.storage, id)?;
        let removed = self
            .objects
            .retain(&mut self.storage, |object| &object.designer_id != id)?;
        if removed > 0 {
            log::debug!("[records] cascade removed {removed} objects of designer {id}");
        }
        self.sync_counts();
        Ok(())
    }

    pub fn list_objects(&self) -> Vec<SceneObject> {
        self.objects.list()
    }

    pub fn object(&self, id: &RecordId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    pub fn create_object(&mut self, draft: ObjectDraft) -> RecordResult<SceneObject> {
        let object = self.objects.create(&mut self.storage, draft)?;
        self.sync_counts();
        Ok(object)
    }

    pub fn update_object(
        &mut self,
        id: &RecordId,
        patch: ObjectPatch,
    ) -> RecordResult<SceneObject> {
        let object = self.objects.update(&mut self.storage, id, patch)?;
        self.sync_counts();
        Ok(object)
    }

    pub fn delete_object(&mut self, id: &RecordId) -> RecordResult<()> {
        self.objects.delete(&mut self.storage, id)?;
        self.sync_counts();
        Ok(())
    }

    /// Rewrites every designer's attached-object count from the object
    /// collection. Only persists when a count actually changed; the new
    /// counts are kept in memory even if that write fails.
    pub fn recalculate_counts(&mut self) -> RecordResult<()> {
        let counts = attached_counts(self.objects.records());
        let mut current = self.designers.list();
        if !apply_counts(&mut current, &counts) {
            return Ok(());
        }
        self.designers.rewrite_derived(&mut self.storage, |designer| {
            designer.attached_objects_count = counts.get(&designer.id).copied().unwrap_or(0);
        })
    }

    /// Recount after an object write that already succeeded. A failed count
    /// write must not turn that into a reported failure.
    fn sync_counts(&mut self) {
        if let Err(err) = self.recalculate_counts() {
            log::warn!("[records] designer counts kept in memory only: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectShape, ObjectSize, Position};
    use crate::storage::{MemoryStore, StorageResult};

    fn designer_draft(name: &str) -> DesignerDraft {
        DesignerDraft {
            full_name: name.into(),
            working_hours: 8.0,
        }
    }

    fn object_draft(designer: &Designer) -> ObjectDraft {
        ObjectDraft {
            name: "Object".into(),
            designer_id: designer.id.clone(),
            color: "#06b6d4".into(),
            position: Position::default(),
            size: ObjectSize::Normal,
            shape: ObjectShape::Box,
        }
    }

    fn count_of<S: KeyValueStore>(backend: &LocalBackend<S>, id: &RecordId) -> u32 {
        backend
            .designer(id)
            .map(|designer| designer.attached_objects_count)
            .expect("designer present")
    }

    #[test]
    fn object_mutations_keep_counts_in_sync() {
        let mut backend = LocalBackend::open(MemoryStore::new()).expect("open");
        let ada = backend.create_designer(designer_draft("Ada")).expect("ada");
        assert_eq!(count_of(&backend, &ada.id), 0);

        let first = backend.create_object(object_draft(&ada)).expect("first");
        backend.create_object(object_draft(&ada)).expect("second");
        assert_eq!(count_of(&backend, &ada.id), 2);

        backend.delete_object(&first.id).expect("delete");
        assert_eq!(count_of(&backend, &ada.id), 1);
    }

    #[test]
    fn cascade_removes_only_referencing_objects() {
        let mut backend = LocalBackend::open(MemoryStore::new()).expect("open");
        let ada = backend.create_designer(designer_draft("Ada")).expect("ada");
        let grace = backend.create_designer(designer_draft("Grace")).expect("grace");
        backend.create_object(object_draft(&ada)).expect("ada object");
        backend.create_object(object_draft(&ada)).expect("ada object");
        let kept = backend.create_object(object_draft(&grace)).expect("grace object");

        backend.delete_designer(&ada.id).expect("cascade");

        assert!(backend.designer(&ada.id).is_none());
        assert_eq!(backend.list_objects(), vec![kept]);
        assert_eq!(count_of(&backend, &grace.id), 1);
    }

    #[test]
    fn stale_stored_counts_are_fixed_on_open() {
        let stale = r#"[{"id":"d1","fullName":"Ada","workingHours":8,"attachedObjectsCount":5}]"#;
        let storage = MemoryStore::new().with_raw(DEFAULT_DESIGNERS_KEY, stale);
        let backend = LocalBackend::open(storage).expect("open");
        assert_eq!(count_of(&backend, &RecordId::from("d1")), 0);
    }

    #[test]
    fn collections_persist_under_their_keys() {
        let mut backend = LocalBackend::open(MemoryStore::new()).expect("open");
        let ada = backend.create_designer(designer_draft("Ada")).expect("ada");
        backend.create_object(object_draft(&ada)).expect("object");

        let storage = backend.storage();
        let designers = storage.raw(DEFAULT_DESIGNERS_KEY).expect("designers stored");
        let objects = storage.raw(DEFAULT_OBJECTS_KEY).expect("objects stored");
        assert!(designers.contains("\"attachedObjectsCount\":1"));
        assert!(objects.contains(ada.id.as_str()));
    }

    /// Accepts the first `designer_writes` designer writes, then rejects the
    /// rest. Object writes always succeed.
    struct DesignerWritesFail {
        inner: MemoryStore,
        designer_writes: usize,
    }

    impl KeyValueStore for DesignerWritesFail {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: String) -> StorageResult<()> {
            if key == DEFAULT_DESIGNERS_KEY {
                if self.designer_writes == 0 {
                    return Err(std::io::Error::other("designer store offline").into());
                }
                self.designer_writes -= 1;
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> StorageResult<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn failed_count_write_does_not_fail_the_object_write() {
        let storage = DesignerWritesFail {
            inner: MemoryStore::new(),
            designer_writes: 1,
        };
        let mut backend = LocalBackend::open(storage).expect("open");
        let ada = backend.create_designer(designer_draft("Ada")).expect("ada");

        let object = backend
            .create_object(object_draft(&ada))
            .expect("object write succeeded");
        assert_eq!(backend.list_objects(), vec![object.clone()]);
        assert_eq!(count_of(&backend, &ada.id), 1);

        backend
            .update_object(&object.id, ObjectPatch::position(Position::new(2.0, 0.0, 1.0)))
            .expect("update");
        backend.delete_object(&object.id).expect("delete");
        assert_eq!(count_of(&backend, &ada.id), 0);

        // The stored count never moved; it is recomputed on the next open.
        let stored = backend.storage().inner.raw(DEFAULT_DESIGNERS_KEY).expect("stored");
        assert!(stored.contains("\"attachedObjectsCount\":0"));
    }

    #[test]
    fn stale_stored_count_is_recomputed_after_reopen() {
        let storage = DesignerWritesFail {
            inner: MemoryStore::new(),
            designer_writes: 1,
        };
        let mut backend = LocalBackend::open(storage).expect("open");
        let ada = backend.create_designer(designer_draft("Ada")).expect("ada");
        backend.create_object(object_draft(&ada)).expect("object");

        let reopened = LocalBackend::open(backend.storage().inner.clone()).expect("reopen");
        assert_eq!(count_of(&reopened, &ada.id), 1);
    }
}
