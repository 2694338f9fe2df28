pub mod config;
pub mod editing;
pub mod editor;
pub mod error;
pub mod frame;
pub mod interaction;
pub mod overlap;
pub mod playhead;
pub mod projector;
pub mod ruler;
pub mod scene;
pub mod types;
pub mod viewport;

pub use config::EditorConfig;
pub use editor::{SceneSnapshot, TimelineEditor};
pub use error::{CoreError, Result};
