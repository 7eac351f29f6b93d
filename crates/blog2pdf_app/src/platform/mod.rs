pub mod app;
pub mod effects;
pub mod session;
pub mod ui;

pub use app::{run_interactive, run_once};
pub use session::{Session, SessionError};
