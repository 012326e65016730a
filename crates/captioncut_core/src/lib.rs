//! Subtitle clip editing with linear undo/redo and drag reordering.

pub mod commands;
pub mod drag;
pub mod editing;
pub mod error;
pub mod history;
pub mod ids;
pub mod project;
pub mod selection;
pub mod session;
pub mod settings;
pub mod store;
pub mod types;

pub use error::{CoreError, Result};
pub use history::{Command, History};
pub use session::EditorSession;
pub use settings::EditorSettings;
pub use store::{ClipStore, EditorPort, StoreEvent};
pub use types::{Clip, Project, Word};
