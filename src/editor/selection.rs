use crate::model::RecordId;

/// Interaction phase of a single scene object, derived from [`EditorState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPhase {
    Idle,
    Hovered,
    Selected,
    Dragging,
}

/// Hover, selection and drag state shared by the scene and the side panel.
///
/// Holds only id references. `dragging` implies `selected` is set and is the
/// dragged object; at most one object is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    hovered: Option<RecordId>,
    selected: Option<RecordId>,
    dragging: bool,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<&RecordId> {
        self.hovered.as_ref()
    }

    pub fn selected(&self) -> Option<&RecordId> {
        self.selected.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    pub fn phase_of(&self, id: &RecordId) -> InteractionPhase {
        if self.is_selected(id) {
            if self.dragging {
                InteractionPhase::Dragging
            } else {
                InteractionPhase::Selected
            }
        } else if self.hovered.as_ref() == Some(id) {
            InteractionPhase::Hovered
        } else {
            InteractionPhase::Idle
        }
    }

    pub fn hover_enter(&mut self, id: RecordId) {
        self.hovered = Some(id);
    }

    /// Ignored when another object has taken the hover since.
    pub fn hover_exit(&mut self, id: &RecordId) {
        if self.hovered.as_ref() == Some(id) {
            self.hovered = None;
        }
    }

    /// Replaces any previous selection. A drag in progress on another object
    /// ends.
    pub fn select(&mut self, id: RecordId) {
        if !self.is_selected(&id) {
            self.dragging = false;
        }
        self.selected = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.dragging = false;
    }

    /// Starts a drag on `id`; only allowed while `id` is selected.
    pub fn begin_drag(&mut self, id: &RecordId) -> bool {
        if !self.is_selected(id) {
            return false;
        }
        self.dragging = true;
        true
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Drops references to an object that no longer exists.
    pub fn forget(&mut self, id: &RecordId) {
        if self.hovered.as_ref() == Some(id) {
            self.hovered = None;
        }
        if self.is_selected(id) {
            self.clear_selection();
        }
    }

    /// Drops references to every object for which `exists` is false.
    pub fn retain_existing<F>(&mut self, mut exists: F)
    where
        F: FnMut(&RecordId) -> bool,
    {
        if self.hovered.as_ref().is_some_and(|id| !exists(id)) {
            self.hovered = None;
        }
        if self.selected.as_ref().is_some_and(|id| !exists(id)) {
            self.clear_selection();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> RecordId {
        RecordId::from(value)
    }

    #[test]
    fn selecting_another_object_replaces_selection() {
        let mut state = EditorState::new();
        state.select(id("a"));
        state.select(id("b"));

        assert_eq!(state.selected(), Some(&id("b")));
        assert_eq!(state.phase_of(&id("a")), InteractionPhase::Idle);
        assert_eq!(state.phase_of(&id("b")), InteractionPhase::Selected);
    }

    #[test]
    fn drag_requires_matching_selection() {
        let mut state = EditorState::new();
        assert!(!state.begin_drag(&id("a")));

        state.select(id("a"));
        assert!(!state.begin_drag(&id("b")));
        assert!(state.begin_drag(&id("a")));
        assert_eq!(state.phase_of(&id("a")), InteractionPhase::Dragging);

        state.end_drag();
        assert_eq!(state.phase_of(&id("a")), InteractionPhase::Selected);
    }

    #[test]
    fn selecting_elsewhere_ends_drag() {
        let mut state = EditorState::new();
        state.select(id("a"));
        state.begin_drag(&id("a"));
        state.select(id("b"));
        assert!(!state.is_dragging());
    }

    #[test]
    fn hover_exit_only_clears_matching_object() {
        let mut state = EditorState::new();
        state.hover_enter(id("a"));
        state.hover_enter(id("b"));
        state.hover_exit(&id("a"));
        assert_eq!(state.hovered(), Some(&id("b")));
        assert_eq!(state.phase_of(&id("b")), InteractionPhase::Hovered);

        state.hover_exit(&id("b"));
        assert_eq!(state.hovered(), None);
    }

    #[test]
    fn forgetting_selected_object_clears_selection() {
        let mut state = EditorState::new();
        state.hover_enter(id("a"));
        state.select(id("a"));
        state.begin_drag(&id("a"));

        state.forget(&id("a"));
        assert_eq!(state, EditorState::new());
    }

    #[test]
    fn retain_existing_keeps_live_references() {
        let mut state = EditorState::new();
        state.hover_enter(id("gone"));
        state.select(id("live"));

        state.retain_existing(|candidate| candidate.as_str() == "live");
        assert_eq!(state.hovered(), None);
        assert_eq!(state.selected(), Some(&id("live")));
    }
}
