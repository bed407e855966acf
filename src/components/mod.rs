pub mod ui;

mod auth_overlay;
mod editor;
mod header;
mod sidebar;

pub use auth_overlay::AuthOverlay;
pub use editor::Editor;
pub use header::Header;
pub use sidebar::Sidebar;
