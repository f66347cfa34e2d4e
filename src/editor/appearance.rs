//! Per-frame visual feedback for scene objects. Nothing here touches the
//! record stores; positions computed here are transient.

use super::color::Rgb;
use super::selection::InteractionPhase;
use crate::model::{ObjectShape, RecordId, SceneObject};
use glam::Vec3;
use std::time::Duration;

pub const HOVER_LIGHTEN: f32 = 0.35;
pub const SELECTED_EMISSIVE_INTENSITY: f32 = 0.3;
const FLOAT_FREQUENCY_PER_MS: f64 = 0.003;
const FLOAT_AMPLITUDE: f32 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectAppearance {
    pub id: RecordId,
    pub shape: ObjectShape,
    pub scale: f32,
    /// Centre of the rendered shape this frame.
    pub center: Vec3,
    pub color: String,
    pub emissive: String,
    pub emissive_intensity: f32,
    /// White edge outline around the selected object.
    pub outline: bool,
}

/// Vertical bob of the selected object at `elapsed` since the scene started.
pub fn float_offset(elapsed: Duration) -> f32 {
    let millis = elapsed.as_secs_f64() * 1000.0;
    (millis * FLOAT_FREQUENCY_PER_MS).sin() as f32 * FLOAT_AMPLITUDE
}

/// Hovered objects blend toward white in linear light; unparsable colours
/// are passed through.
pub fn hover_color(color: &str) -> String {
    match color.parse::<Rgb>() {
        Ok(rgb) => rgb.lerp(Rgb::WHITE, HOVER_LIGHTEN).to_hex(),
        Err(_) => color.to_string(),
    }
}

/// Appearance of `object` in `phase`. `drag_center` is the transient centre
/// while the object is being dragged.
pub fn appearance(
    object: &SceneObject,
    phase: InteractionPhase,
    elapsed: Duration,
    drag_center: Option<Vec3>,
) -> ObjectAppearance {
    let rest = object.resting_center();
    let black = Rgb::BLACK.to_hex();

    let (center, color, emissive, emissive_intensity, outline) = match phase {
        InteractionPhase::Idle => (rest, object.color.clone(), black, 0.0, false),
        InteractionPhase::Hovered => (rest, hover_color(&object.color), black, 0.0, false),
        InteractionPhase::Selected => (
            rest + Vec3::Y * float_offset(elapsed),
            Rgb::WHITE.to_hex(),
            object.color.clone(),
            SELECTED_EMISSIVE_INTENSITY,
            true,
        ),
        InteractionPhase::Dragging => (
            drag_center.unwrap_or(rest),
            Rgb::WHITE.to_hex(),
            object.color.clone(),
            SELECTED_EMISSIVE_INTENSITY,
            true,
        ),
    };

    ObjectAppearance {
        id: object.id.clone(),
        shape: object.shape,
        scale: object.scale(),
        center,
        color,
        emissive,
        emissive_intensity,
        outline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectSize, Position};

    fn object() -> SceneObject {
        SceneObject {
            id: RecordId::from("o1"),
            name: "Object 1".into(),
            designer_id: RecordId::from("d1"),
            color: "#000000".into(),
            position: Position::new(1.0, 0.0, 1.0),
            size: ObjectSize::Small,
            shape: ObjectShape::Sphere,
        }
    }

    #[test]
    fn hover_lightens_toward_white() {
        let look = appearance(&object(), InteractionPhase::Hovered, Duration::ZERO, None);
        assert_eq!(look.color, "#a0a0a0");
        assert!(!look.outline);
    }

    #[test]
    fn selected_is_white_outlined_and_bobs() {
        let object = object();
        let rest = object.resting_center();
        let elapsed = Duration::from_millis(500);
        let look = appearance(&object, InteractionPhase::Selected, elapsed, None);

        assert_eq!(look.color, "#ffffff");
        assert_eq!(look.emissive, "#000000");
        assert!(look.outline);
        assert!((look.center.y - (rest.y + float_offset(elapsed))).abs() < 1.0e-6);
        assert!(float_offset(elapsed).abs() <= FLOAT_AMPLITUDE);
    }

    #[test]
    fn dragging_uses_transient_center_without_bobbing() {
        let transient = Vec3::new(4.0, 0.2, -1.0);
        let look = appearance(
            &object(),
            InteractionPhase::Dragging,
            Duration::from_millis(321),
            Some(transient),
        );
        assert_eq!(look.center, transient);
    }

    #[test]
    fn idle_keeps_stored_color_and_rest_position() {
        let object = object();
        let look = appearance(&object, InteractionPhase::Idle, Duration::from_secs(3), None);
        assert_eq!(look.color, object.color);
        assert_eq!(look.center, object.resting_center());
        assert_eq!(look.scale, 0.4);
    }

    #[test]
    fn unparsable_hover_color_passes_through() {
        assert_eq!(hover_color("rebeccapurple"), "rebeccapurple");
    }
}
