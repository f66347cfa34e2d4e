//! Form validation for designers and object properties. Errors are resolved
//! here and never reach the record stores.

use crate::model::{
    Designer, DesignerDraft, DesignerPatch, ObjectPatch, ObjectShape, ObjectSize, RecordId,
    SceneObject,
};
use std::fmt;
use thiserror::Error;

pub const OBJECT_NAME_MAX_CHARS: usize = 50;
pub const DESIGNER_NAME_MIN_CHARS: usize = 2;
pub const DESIGNER_NAME_MAX_CHARS: usize = 100;
pub const MIN_WORKING_HOURS: f32 = 1.0;
pub const MAX_WORKING_HOURS: f32 = 24.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("name is required")]
    NameRequired,
    #[error("name must be {max} characters or less")]
    NameTooLong { max: usize },
    #[error("name must be at least {min} characters")]
    NameTooShort { min: usize },
    #[error("designer is required")]
    DesignerRequired,
    #[error("unknown size `{0}`")]
    UnknownSize(String),
    #[error("unknown shape `{0}`")]
    UnknownShape(String),
    #[error("color is required")]
    ColorRequired,
    #[error("working hours must be between {min} and {max}, got {value}")]
    WorkingHoursOutOfRange { value: f32, min: f32, max: f32 },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn single(error: ValidationError) -> Self {
        Self(vec![error])
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignerForm {
    pub full_name: String,
    pub working_hours: f32,
}

impl Default for DesignerForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            working_hours: 8.0,
        }
    }
}

impl DesignerForm {
    pub fn new(full_name: impl Into<String>, working_hours: f32) -> Self {
        Self {
            full_name: full_name.into(),
            working_hours,
        }
    }

    pub fn from_designer(designer: &Designer) -> Self {
        Self::new(designer.full_name.clone(), designer.working_hours)
    }

    pub fn validate(&self) -> Result<DesignerDraft, ValidationErrors> {
        let mut errors = Vec::new();
        let full_name = self.full_name.trim();
        let chars = full_name.chars().count();
        if chars == 0 {
            errors.push(ValidationError::NameRequired);
        } else if chars < DESIGNER_NAME_MIN_CHARS {
            errors.push(ValidationError::NameTooShort {
                min: DESIGNER_NAME_MIN_CHARS,
            });
        } else if chars > DESIGNER_NAME_MAX_CHARS {
            errors.push(ValidationError::NameTooLong {
                max: DESIGNER_NAME_MAX_CHARS,
            });
        }

        // NaN fails both comparisons and lands here too.
        if !(MIN_WORKING_HOURS..=MAX_WORKING_HOURS).contains(&self.working_hours) {
            errors.push(ValidationError::WorkingHoursOutOfRange {
                value: self.working_hours,
                min: MIN_WORKING_HOURS,
                max: MAX_WORKING_HOURS,
            });
        }

        ValidationErrors(errors).into_result(|| DesignerDraft {
            full_name: full_name.to_string(),
            working_hours: self.working_hours,
        })
    }

    pub fn validate_patch(&self) -> Result<DesignerPatch, ValidationErrors> {
        self.validate().map(|draft| DesignerPatch {
            full_name: Some(draft.full_name),
            working_hours: Some(draft.working_hours),
        })
    }
}

/// Editable fields of the selected object, as raw form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertiesForm {
    pub name: String,
    pub designer_id: String,
    pub size: String,
    pub shape: String,
    pub color: String,
}

impl PropertiesForm {
    pub fn from_object(object: &SceneObject) -> Self {
        Self {
            name: object.name.clone(),
            designer_id: object.designer_id.to_string(),
            size: object.size.to_string(),
            shape: object.shape.to_string(),
            color: object.color.clone(),
        }
    }

    pub fn is_dirty(&self, object: &SceneObject) -> bool {
        *self != Self::from_object(object)
    }

    /// Position is never part of the patch; it only changes through drags.
    pub fn validate(&self) -> Result<ObjectPatch, ValidationErrors> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::NameRequired);
        } else if name.chars().count() > OBJECT_NAME_MAX_CHARS {
            errors.push(ValidationError::NameTooLong {
                max: OBJECT_NAME_MAX_CHARS,
            });
        }

        let designer_id = RecordId::new(self.designer_id.trim());
        if designer_id.is_empty() {
            errors.push(ValidationError::DesignerRequired);
        }

        let size = self
            .size
            .parse::<ObjectSize>()
            .map_err(|err| errors.push(ValidationError::UnknownSize(err.0)))
            .ok();
        let shape = self
            .shape
            .parse::<ObjectShape>()
            .map_err(|err| errors.push(ValidationError::UnknownShape(err.0)))
            .ok();

        let color = self.color.trim();
        if color.is_empty() {
            errors.push(ValidationError::ColorRequired);
        }

        ValidationErrors(errors).into_result(|| ObjectPatch {
            name: Some(name.to_string()),
            designer_id: Some(designer_id),
            color: Some(color.to_string()),
            position: None,
            size,
            shape,
        })
    }
}
