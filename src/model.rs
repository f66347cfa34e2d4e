use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identity shared by designers and scene objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Designer {
    pub id: RecordId,
    pub full_name: String,
    pub working_hours: f32,
    /// Derived from the object collection; see `records::aggregate`.
    #[serde(default)]
    pub attached_objects_count: u32,
}

impl Designer {
    /// Up to two uppercase initials, e.g. "Ada Lovelace" -> "AL".
    pub fn initials(&self) -> String {
        self.full_name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignerDraft {
    pub full_name: String,
    pub working_hours: f32,
}

/// Per-field designer update. The attached-object count is not editable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignerPatch {
    pub full_name: Option<String>,
    pub working_hours: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl From<Vec3> for Position {
    fn from(value: Vec3) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Position> for Vec3 {
    fn from(value: Position) -> Self {
        value.to_vec3()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectSize {
    Small,
    #[default]
    Normal,
    Large,
}

impl ObjectSize {
    pub const ALL: [ObjectSize; 3] = [ObjectSize::Small, ObjectSize::Normal, ObjectSize::Large];

    /// Linear scale factor applied to the unit shape.
    pub fn scale(self) -> f32 {
        match self {
            ObjectSize::Small => 0.4,
            ObjectSize::Normal => 0.7,
            ObjectSize::Large => 1.1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ObjectSize::Small => "small",
            ObjectSize::Normal => "normal",
            ObjectSize::Large => "large",
        }
    }
}

impl FromStr for ObjectSize {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ObjectSize::ALL
            .into_iter()
            .find(|size| size.label() == value)
            .ok_or_else(|| UnknownVariant(value.to_string()))
    }
}

impl fmt::Display for ObjectSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectShape {
    #[default]
    Box,
    Sphere,
    Cylinder,
    Cone,
}

impl ObjectShape {
    pub const ALL: [ObjectShape; 4] = [
        ObjectShape::Box,
        ObjectShape::Sphere,
        ObjectShape::Cylinder,
        ObjectShape::Cone,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ObjectShape::Box => "box",
            ObjectShape::Sphere => "sphere",
            ObjectShape::Cylinder => "cylinder",
            ObjectShape::Cone => "cone",
        }
    }
}

impl FromStr for ObjectShape {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ObjectShape::ALL
            .into_iter()
            .find(|shape| shape.label() == value)
            .ok_or_else(|| UnknownVariant(value.to_string()))
    }
}

impl fmt::Display for ObjectShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variant `{}`", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneObject {
    pub id: RecordId,
    pub name: String,
    pub designer_id: RecordId,
    pub color: String,
    pub position: Position,
    #[serde(default)]
    pub size: ObjectSize,
    #[serde(default)]
    pub shape: ObjectShape,
}

impl SceneObject {
    pub fn scale(&self) -> f32 {
        self.size.scale()
    }

    /// Centre of the rendered shape: the shape sits on `position.y`.
    pub fn resting_center(&self) -> Vec3 {
        let position = self.position.to_vec3();
        Vec3::new(position.x, position.y + self.scale() / 2.0, position.z)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDraft {
    pub name: String,
    pub designer_id: RecordId,
    pub color: String,
    pub position: Position,
    pub size: ObjectSize,
    pub shape: ObjectShape,
}

/// Per-field object update. `position` replaces the whole position value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectPatch {
    pub name: Option<String>,
    pub designer_id: Option<RecordId>,
    pub color: Option<String>,
    pub position: Option<Position>,
    pub size: Option<ObjectSize>,
    pub shape: Option<ObjectShape>,
}

impl ObjectPatch {
    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }
}
