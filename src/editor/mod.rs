pub mod appearance;
pub mod color;
pub mod drag;
pub mod geometry;
pub mod placement;
pub mod selection;

pub use appearance::{ObjectAppearance, appearance};
pub use drag::DragSession;
pub use geometry::{Plane, Ray};
pub use placement::{PALETTE, PendingPlacement};
pub use selection::{EditorState, InteractionPhase};
