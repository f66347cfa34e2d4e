use glam::Vec3;

const PARALLEL_EPSILON: f32 = 1.0e-6;

/// Pointer ray in world space, as produced by the host's camera unprojection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray from `origin` through `target`.
    pub fn through(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, target - origin)
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Point where the ray meets `plane`, or `None` when the ray is parallel
    /// to it or the plane lies behind the origin.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
        let denom = plane.normal.dot(self.direction);
        if denom.abs() <= PARALLEL_EPSILON {
            // A ray lying inside the plane hits it at its own origin.
            return (plane.distance_to(self.origin).abs() <= PARALLEL_EPSILON)
                .then_some(self.origin);
        }

        let t = -plane.distance_to(self.origin) / denom;
        if t < 0.0 {
            return None;
        }
        Some(self.at(t))
    }
}

/// Plane `normal · p + constant = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f32,
}

impl Plane {
    /// The ground plane, y = 0.
    pub const GROUND: Plane = Plane {
        normal: Vec3::Y,
        constant: 0.0,
    };

    /// Horizontal plane at `height`.
    pub fn horizontal(height: f32) -> Self {
        Self {
            normal: Vec3::Y,
            constant: -height,
        }
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }
}
