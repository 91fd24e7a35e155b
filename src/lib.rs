pub mod app;
pub mod core;
pub mod gameplay;
pub mod interaction;
pub mod physics;
pub mod rendering;

// Curated re-exports
pub use app::cli::CliArgs;
pub use app::game::{ConfigReport, GamePlugin};
pub use core::components::{Answer, HomePosition, Matched, Slot};
pub use core::config::{GameConfig, WindowConfig};
pub use interaction::drag::{DragController, DragHost, DragSettings};
