mod drawer;
mod pack;
mod sidebar;
mod views;

pub use drawer::DrawerSheet;
pub use pack::PackPanel;
pub use sidebar::sidebar;
pub use views::view_pane;
