pub mod render;
pub mod theme;

pub use render::{render, QUIT_COMMAND, SAVE_COMMAND};
pub use theme::{Theme, Tone};
