use super::geometry::{Plane, Ray};
use crate::model::{Position, RecordId, SceneObject};
use glam::Vec3;

/// One drag of a selected object across a fixed horizontal plane.
///
/// The plane passes through the object's resting centre. The grab offset
/// between the first hit and the centre is kept for the whole drag so the
/// object does not jump under the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    object_id: RecordId,
    plane: Plane,
    offset: Vec3,
    current: Vec3,
}

impl DragSession {
    /// Returns `None` when the pointer ray does not meet the drag plane.
    pub fn begin(object: &SceneObject, ray: &Ray) -> Option<Self> {
        let center = object.resting_center();
        Self::begin_at(object.id.clone(), center, ray)
    }

    pub fn begin_at(object_id: RecordId, center: Vec3, ray: &Ray) -> Option<Self> {
        let plane = Plane::horizontal(center.y);
        let grab = ray.intersect_plane(&plane)?;
        Some(Self {
            object_id,
            plane,
            offset: grab - center,
            current: center,
        })
    }

    pub fn object_id(&self) -> &RecordId {
        &self.object_id
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Transient centre of the dragged shape.
    pub fn current(&self) -> Vec3 {
        self.current
    }

    /// Moves the object to the new hit minus the grab offset. Only x and z
    /// change; a ray that misses the plane keeps the last position.
    pub fn update(&mut self, ray: &Ray) -> Vec3 {
        if let Some(hit) = ray.intersect_plane(&self.plane) {
            let target = hit - self.offset;
            self.current = Vec3::new(target.x, self.current.y, target.z);
        }
        self.current
    }

    /// Position to persist: the last horizontal position back on the ground.
    pub fn finish(self) -> Position {
        Position::new(self.current.x, 0.0, self.current.z)
    }
}
