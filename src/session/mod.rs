//! Orchestration of the editor and designer views over a [`DashboardApi`].
//!
//! The session owns the cached designer and object lists, the editor state,
//! the pending placement and the active drag. Hosts forward pointer events
//! and form submissions to it and render from [`EditorSession::frame`].

use crate::api::{ApiError, ApiResult, DashboardApi};
use crate::editor::appearance::{ObjectAppearance, appearance};
use crate::editor::placement::{object_name, random_palette_color};
use crate::editor::{DragSession, EditorState, PendingPlacement, Ray};
use crate::model::{Designer, ObjectPatch, ObjectShape, RecordId, SceneObject};
use crate::validation::{DesignerForm, PropertiesForm, ValidationError, ValidationErrors};
use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("request failed: {0}")]
    Api(#[from] ApiError),
    #[error("no placement is pending")]
    NoPendingPlacement,
    #[error("no object is selected")]
    NothingSelected,
}

impl From<ValidationError> for SessionError {
    fn from(error: ValidationError) -> Self {
        SessionError::Validation(ValidationErrors::single(error))
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Shown to the user for any failed request; details go to the log.
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed. Please try again.";

/// Loading flag and the last request failure, for the host to display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStatus {
    pub loading: bool,
    pub error: Option<String>,
}

pub struct EditorSession<A: DashboardApi> {
    api: A,
    editor: EditorState,
    designers: Vec<Designer>,
    objects: Vec<SceneObject>,
    pending: Option<PendingPlacement>,
    drag: Option<DragSession>,
    status: SessionStatus,
    rng: StdRng,
}

impl<A: DashboardApi> EditorSession<A> {
    pub fn new(api: A) -> Self {
        Self::with_rng(api, StdRng::from_entropy())
    }

    /// Deterministic placement colours, for tests and replays.
    pub fn with_seed(api: A, seed: u64) -> Self {
        Self::with_rng(api, StdRng::seed_from_u64(seed))
    }

    fn with_rng(api: A, rng: StdRng) -> Self {
        Self {
            api,
            editor: EditorState::new(),
            designers: Vec::new(),
            objects: Vec::new(),
            pending: None,
            drag: None,
            status: SessionStatus::default(),
            rng,
        }
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn designers(&self) -> &[Designer] {
        &self.designers
    }

    pub fn designer(&self, id: &RecordId) -> Option<&Designer> {
        self.designers.iter().find(|designer| &designer.id == id)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, id: &RecordId) -> Option<&SceneObject> {
        self.objects.iter().find(|object| &object.id == id)
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn pending_placement(&self) -> Option<&PendingPlacement> {
        self.pending.as_ref()
    }

    pub fn active_drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Camera orbiting is suspended for the duration of a drag.
    pub fn camera_controls_enabled(&self) -> bool {
        !self.editor.is_dragging()
    }

    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.editor.selected().and_then(|id| self.object(id))
    }

    pub fn properties_form(&self) -> Option<PropertiesForm> {
        self.selected_object().map(PropertiesForm::from_object)
    }

    pub async fn refresh(&mut self) -> SessionResult<()> {
        self.status.loading = true;
        let result = self.reload_all().await;
        self.status.loading = false;
        result
    }

    async fn reload_all(&mut self) -> SessionResult<()> {
        self.refresh_objects().await?;
        self.refresh_designers().await
    }

    pub async fn refresh_designers(&mut self) -> SessionResult<()> {
        let result = self.api.list_designers().await;
        self.designers = self.track(result)?;
        Ok(())
    }

    pub async fn refresh_objects(&mut self) -> SessionResult<()> {
        let result = self.api.list_objects().await;
        self.objects = self.track(result)?;
        self.reconcile_references();
        Ok(())
    }

    pub fn pointer_over(&mut self, id: RecordId) {
        self.editor.hover_enter(id);
    }

    pub fn pointer_out(&mut self, id: &RecordId) {
        self.editor.hover_exit(id);
    }

    pub fn click_object(&mut self, id: RecordId) {
        if self.drag.as_ref().is_some_and(|drag| drag.object_id() != &id) {
            self.drag = None;
        }
        log::debug!("[session] selected object {id}");
        self.editor.select(id);
    }

    pub fn click_ground(&mut self) {
        self.drag = None;
        self.editor.clear_selection();
    }

    /// Opens a pending placement at the ground point under the pointer.
    ///
    /// With an object selected this only clears the selection. Returns the
    /// candidate point when a placement was opened.
    pub fn double_click_ground(&mut self, ray: &Ray) -> Option<Vec3> {
        if self.editor.selected().is_some() {
            self.click_ground();
            return None;
        }

        let pending = PendingPlacement::from_ray(ray)?;
        log::debug!("[session] placement pending at {:?}", pending.point());
        self.pending = Some(pending);
        Some(pending.point())
    }

    /// Closes the placement dialog without side effects.
    pub fn cancel_placement(&mut self) {
        if self.pending.take().is_some() {
            log::debug!("[session] placement cancelled");
        }
    }

    /// Creates an object at the pending point for the chosen designer and
    /// shape. Without a designer the pending point is kept so the choice can
    /// be completed.
    pub async fn confirm_placement(
        &mut self,
        designer_id: Option<RecordId>,
        shape: ObjectShape,
    ) -> SessionResult<SceneObject> {
        let pending = self.pending.ok_or(SessionError::NoPendingPlacement)?;
        let designer_id = designer_id
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::DesignerRequired)?;

        let color = random_palette_color(&mut self.rng);
        let draft = pending.into_draft(object_name(self.objects.len()), designer_id, shape, color);
        let result = self.api.create_object(draft).await;
        let object = self.track(result)?;

        log::info!(
            "[session] placed {} at ({}, {})",
            object.id,
            object.position.x,
            object.position.z
        );
        self.objects.push(object.clone());
        self.pending = None;
        self.refresh_designers().await?;
        Ok(object)
    }

    /// Starts dragging `id` if it is already selected. Returns whether a drag
    /// started.
    pub fn pointer_down(&mut self, id: &RecordId, ray: &Ray) -> bool {
        if !self.editor.begin_drag(id) {
            return false;
        }
        let drag = self
            .object(id)
            .and_then(|object| DragSession::begin(object, ray));
        let Some(drag) = drag else {
            log::warn!("[editor] could not start dragging {id}");
            self.editor.end_drag();
            return false;
        };

        self.drag = Some(drag);
        true
    }

    /// Returns the transient centre of the dragged object.
    pub fn pointer_move(&mut self, ray: &Ray) -> Option<Vec3> {
        self.drag.as_mut().map(|drag| drag.update(ray))
    }

    /// Commits the dragged position. Dragging ends even if the write fails.
    pub async fn pointer_up(&mut self) -> SessionResult<Option<SceneObject>> {
        let Some(drag) = self.drag.take() else {
            return Ok(None);
        };
        self.editor.end_drag();

        let id = drag.object_id().clone();
        let position = drag.finish();
        let result = self
            .api
            .update_object(&id, ObjectPatch::position(position))
            .await;
        let object = self.track(result)?;
        self.replace_cached(object.clone());
        Ok(Some(object))
    }

    /// Appearance of every object at `elapsed` since the scene started.
    pub fn frame(&self, elapsed: Duration) -> Vec<ObjectAppearance> {
        self.objects
            .iter()
            .map(|object| {
                let drag_center = self
                    .drag
                    .as_ref()
                    .filter(|drag| drag.object_id() == &object.id)
                    .map(DragSession::current);
                appearance(object, self.editor.phase_of(&object.id), elapsed, drag_center)
            })
            .collect()
    }

    pub async fn submit_properties(&mut self, form: &PropertiesForm) -> SessionResult<SceneObject> {
        let id = self
            .editor
            .selected()
            .cloned()
            .ok_or(SessionError::NothingSelected)?;
        let patch = form.validate()?;

        let result = self.api.update_object(&id, patch).await;
        let object = self.track(result)?;
        self.replace_cached(object.clone());
        self.refresh_designers().await?;
        Ok(object)
    }

    /// Clears the selection before deleting so nothing refers to the removed
    /// object.
    pub async fn delete_selected(&mut self) -> SessionResult<()> {
        let id = self
            .editor
            .selected()
            .cloned()
            .ok_or(SessionError::NothingSelected)?;
        self.drag = None;
        self.editor.clear_selection();
        self.editor.forget(&id);

        let result = self.api.delete_object(&id).await;
        self.track(result)?;
        self.objects.retain(|object| object.id != id);
        log::info!("[session] deleted object {id}");
        self.refresh_designers().await
    }

    pub async fn add_designer(&mut self, form: &DesignerForm) -> SessionResult<Designer> {
        let draft = form.validate()?;
        let result = self.api.create_designer(draft).await;
        let designer = self.track(result)?;
        self.refresh_designers().await?;
        Ok(designer)
    }

    pub async fn edit_designer(
        &mut self,
        id: &RecordId,
        form: &DesignerForm,
    ) -> SessionResult<Designer> {
        let patch = form.validate_patch()?;
        let result = self.api.update_designer(id, patch).await;
        let designer = self.track(result)?;
        self.refresh_designers().await?;
        Ok(designer)
    }

    /// Deletes the designer and, through the API cascade, its objects.
    pub async fn remove_designer(&mut self, id: &RecordId) -> SessionResult<()> {
        let result = self.api.delete_designer(id).await;
        self.track(result)?;
        log::info!("[session] deleted designer {id}");
        self.reload_all().await
    }

    fn replace_cached(&mut self, object: SceneObject) {
        match self.objects.iter_mut().find(|cached| cached.id == object.id) {
            Some(cached) => *cached = object,
            None => self.objects.push(object),
        }
    }

    fn reconcile_references(&mut self) {
        let objects = &self.objects;
        self.editor
            .retain_existing(|id| objects.iter().any(|object| &object.id == id));
        if self
            .drag
            .as_ref()
            .is_some_and(|drag| !self.editor.is_selected(drag.object_id()))
        {
            self.drag = None;
        }
    }

    /// Records the outcome of a request in the status before returning it.
    fn track<T>(&mut self, result: ApiResult<T>) -> SessionResult<T> {
        match result {
            Ok(value) => {
                self.status.error = None;
                Ok(value)
            }
            Err(err) => {
                log::warn!("[session] request failed: {err}");
                self.status.error = Some(REQUEST_FAILED_MESSAGE.to_string());
                Err(err.into())
            }
        }
    }
}
