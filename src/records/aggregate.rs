//! Derivation of designer object counts from the object collection.

use crate::model::{Designer, RecordId, SceneObject};
use std::collections::HashMap;

pub fn attached_counts(objects: &[SceneObject]) -> HashMap<RecordId, u32> {
    let mut counts = HashMap::new();
    for object in objects {
        *counts.entry(object.designer_id.clone()).or_insert(0) += 1;
    }
    counts
}

/// Overwrites every designer's count from `counts`, zero when absent.
/// Returns whether any count changed.
pub fn apply_counts(designers: &mut [Designer], counts: &HashMap<RecordId, u32>) -> bool {
    let mut changed = false;
    for designer in designers {
        let count = counts.get(&designer.id).copied().unwrap_or(0);
        if designer.attached_objects_count != count {
            designer.attached_objects_count = count;
            changed = true;
        }
    }
    changed
}

/// Pure form: returns a recounted copy of `designers`.
pub fn recalculate(designers: &[Designer], objects: &[SceneObject]) -> Vec<Designer> {
    let mut next = designers.to_vec();
    apply_counts(&mut next, &attached_counts(objects));
    next
}
