//! Asynchronous record API consumed by the editor session.
//!
//! [`LocalApi`] serves the API from a [`LocalBackend`] and resolves every call
//! after a fixed simulated latency. A real client can implement
//! [`DashboardApi`] without changing the session code.

use crate::config::DashboardConfig;
use crate::model::{
    Designer, DesignerDraft, DesignerPatch, ObjectDraft, ObjectPatch, RecordId, SceneObject,
};
use crate::records::{BackendKeys, LocalBackend, RecordError};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Record(RecordError::NotFound { .. }))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Record operations for designers and objects.
///
/// Callers must await each call before issuing the next one against the same
/// API; `&mut self` enforces that for a single owner.
#[allow(async_fn_in_trait)]
pub trait DashboardApi {
    async fn list_designers(&mut self) -> ApiResult<Vec<Designer>>;
    async fn create_designer(&mut self, draft: DesignerDraft) -> ApiResult<Designer>;
    async fn update_designer(&mut self, id: &RecordId, patch: DesignerPatch)
    -> ApiResult<Designer>;
    /// Also deletes every object referencing the designer.
    async fn delete_designer(&mut self, id: &RecordId) -> ApiResult<()>;

    async fn list_objects(&mut self) -> ApiResult<Vec<SceneObject>>;
    async fn create_object(&mut self, draft: ObjectDraft) -> ApiResult<SceneObject>;
    async fn update_object(&mut self, id: &RecordId, patch: ObjectPatch)
    -> ApiResult<SceneObject>;
    async fn delete_object(&mut self, id: &RecordId) -> ApiResult<()>;
}

pub const DEFAULT_LATENCY: Duration = Duration::from_millis(200);

pub struct LocalApi<S: KeyValueStore> {
    backend: LocalBackend<S>,
    latency: Duration,
}

impl LocalApi<Box<dyn KeyValueStore>> {
    /// Builds the store described by `config`: a [`FileStore`] when a storage
    /// directory is set, otherwise an in-memory store.
    pub fn open(config: &DashboardConfig) -> ApiResult<Self> {
        let storage: Box<dyn KeyValueStore> = match &config.storage_dir {
            Some(dir) => {
                log::info!("[api] using file storage at {}", dir.display());
                Box::new(FileStore::new(dir))
            }
            None => {
                log::info!("[api] using in-memory storage");
                Box::new(MemoryStore::new())
            }
        };
        let keys = BackendKeys {
            designers: config.designers_key.clone(),
            objects: config.objects_key.clone(),
        };
        let backend = LocalBackend::with_keys(storage, keys)?;
        Ok(Self::new(backend, config.latency()))
    }
}

impl<S: KeyValueStore> LocalApi<S> {
    pub fn new(backend: LocalBackend<S>, latency: Duration) -> Self {
        Self { backend, latency }
    }

    pub fn with_storage(storage: S, latency: Duration) -> ApiResult<Self> {
        Ok(Self::new(LocalBackend::open(storage)?, latency))
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    async fn resolve<T>(&self, result: Result<T, RecordError>) -> ApiResult<T> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        result.map_err(|err| {
            log::debug!("[api] request failed: {err}");
            ApiError::from(err)
        })
    }
}

impl<S: KeyValueStore> DashboardApi for LocalApi<S> {
    async fn list_designers(&mut self) -> ApiResult<Vec<Designer>> {
        let designers = self.backend.list_designers();
        self.resolve(Ok(designers)).await
    }

    async fn create_designer(&mut self, draft: DesignerDraft) -> ApiResult<Designer> {
        let result = self.backend.create_designer(draft);
        self.resolve(result).await
    }

    async fn update_designer(
        &mut self,
        id: &RecordId,
        patch: DesignerPatch,
    ) -> ApiResult<Designer> {
        let result = self.backend.update_designer(id, patch);
        self.resolve(result).await
    }

    async fn delete_designer(&mut self, id: &RecordId) -> ApiResult<()> {
        let result = self.backend.delete_designer(id);
        self.resolve(result).await
    }

    async fn list_objects(&mut self) -> ApiResult<Vec<SceneObject>> {
        let objects = self.backend.list_objects();
        self.resolve(Ok(objects)).await
    }

    async fn create_object(&mut self, draft: ObjectDraft) -> ApiResult<SceneObject> {
        let result = self.backend.create_object(draft);
        self.resolve(result).await
    }

    async fn update_object(
        &mut self,
        id: &RecordId,
        patch: ObjectPatch,
    ) -> ApiResult<SceneObject> {
        let result = self.backend.update_object(id, patch);
        self.resolve(result).await
    }

    async fn delete_object(&mut self, id: &RecordId) -> ApiResult<()> {
        let result = self.backend.delete_object(id);
        self.resolve(result).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> LocalApi<MemoryStore> {
        LocalApi::with_storage(MemoryStore::new(), DEFAULT_LATENCY).expect("open api")
    }

    #[tokio::test(start_paused = true)]
    async fn calls_resolve_after_simulated_latency() {
        let mut api = api();
        let start = tokio::time::Instant::now();
        api.list_designers().await.expect("list");
        assert!(start.elapsed() >= DEFAULT_LATENCY);
    }

    #[tokio::test(start_paused = true)]
    async fn update_missing_object_is_not_found() {
        let mut api = api();
        let err = api
            .update_object(&RecordId::from("nope"), ObjectPatch::default())
            .await
            .expect_err("missing object");
        assert!(err.is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn delete_missing_designer_succeeds() {
        let mut api = api();
        api.delete_designer(&RecordId::from("nope"))
            .await
            .expect("delete is idempotent");
        assert!(api.list_designers().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn zero_latency_skips_the_timer() {
        let mut api = LocalApi::with_storage(MemoryStore::new(), Duration::ZERO).expect("open");
        let designer = api
            .create_designer(DesignerDraft {
                full_name: "Ada Lovelace".into(),
                working_hours: 8.0,
            })
            .await
            .expect("create");
        assert_eq!(api.list_designers().await.expect("list"), vec![designer]);
    }
}
