pub mod collate;
pub mod config;
pub mod dataset;
pub mod debounce;
pub mod drawer;
pub mod drill;
pub mod error;
pub mod explorer;
pub mod filter;
pub mod hierarchy;
pub mod history;
pub mod labels;
pub mod pack;
pub mod permalink;
pub mod share;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use atlas_types::*;
pub use config::AtlasConfigExt;
pub use dataset::{Dataset, DatasetIndex, FacetOption, LoaderConfig};
#[cfg(not(target_arch = "wasm32"))]
pub use dataset::{DataSource, load};
pub use debounce::Debouncer;
pub use drawer::{DrawerContent, DrawerMachine};
pub use drill::{Breadcrumb, TreemapCrumb, TreemapNavigator, WheelNavigator};
pub use error::{ClipboardError, ConfigError, LoadError, PackError};
pub use explorer::{AtlasEvent, AtlasSession, Explorer, Redraw, Screen, ViewBody, ViewModel};
pub use filter::{FilterChange, FilterManager, FilterObserver, Propagation};
pub use hierarchy::{BubblePolicy, aggregate, aggregate_one_level, treemap_tree, wheel_tree};
pub use history::{HistoryPort, MemoryHistory};
pub use pack::{PackEntry, PackSelection};
pub use share::{Clipboard, MemoryClipboard, ShareFeedback};
