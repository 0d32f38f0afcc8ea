pub mod commands;
pub mod input;
pub mod selection;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use commands::EditorIntent;
pub use input::InputEvent;
pub use selection::Selection;
pub use session::{EditorConfig, MindMapEditor};
pub use shortcuts::ShortcutMap;
pub use tools::PointerTool;
