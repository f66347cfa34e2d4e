//! Designer management and an interactive 3D object editor over a
//! key-value persisted record store.

pub mod api;
pub mod config;
pub mod editor;
pub mod model;
pub mod records;
pub mod session;
pub mod storage;
pub mod validation;

pub use api::{ApiError, DashboardApi, LocalApi};
pub use config::DashboardConfig;
pub use model::{Designer, ObjectShape, ObjectSize, Position, RecordId, SceneObject};
pub use records::LocalBackend;
pub use session::{EditorSession, SessionError, SessionStatus};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
