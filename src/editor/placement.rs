use super::geometry::{Plane, Ray};
use crate::model::{ObjectDraft, ObjectShape, ObjectSize, Position, RecordId};
use glam::Vec3;
use rand::Rng;
use rand::seq::SliceRandom;

/// Colours assigned to newly placed objects.
pub const PALETTE: [&str; 10] = [
    "#7c3aed", "#06b6d4", "#10b981", "#f59e0b", "#ef4444", "#ec4899", "#8b5cf6", "#14b8a6",
    "#f97316", "#6366f1",
];

pub fn random_palette_color<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    PALETTE.choose(rng).copied().unwrap_or(PALETTE[0])
}

/// Halves round toward positive infinity, so `-0.125` becomes `-0.12`.
pub fn round_to_hundredths(value: f32) -> f32 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// A ground point waiting for the designer and shape choice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPlacement {
    point: Vec3,
}

impl PendingPlacement {
    /// Intersects the pointer ray with the ground plane.
    pub fn from_ray(ray: &Ray) -> Option<Self> {
        ray.intersect_plane(&Plane::GROUND)
            .map(|point| Self { point })
    }

    pub fn point(&self) -> Vec3 {
        self.point
    }

    /// Ground position with x and z rounded to two decimals.
    pub fn position(&self) -> Position {
        Position::new(
            round_to_hundredths(self.point.x),
            0.0,
            round_to_hundredths(self.point.z),
        )
    }

    pub fn into_draft(
        self,
        name: String,
        designer_id: RecordId,
        shape: ObjectShape,
        color: impl Into<String>,
    ) -> ObjectDraft {
        ObjectDraft {
            name,
            designer_id,
            color: color.into(),
            position: self.position(),
            size: ObjectSize::Normal,
            shape,
        }
    }
}

/// Default name for the n-th object in the scene.
pub fn object_name(existing_objects: usize) -> String {
    format!("Object {}", existing_objects + 1)
}
