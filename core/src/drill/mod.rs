//! Drill-down navigation for the hierarchical views
//!
//! Navigators own the view-local focus and translate clicks into silent
//! filter mutations, so the visualization can animate its own transition
//! instead of being torn down by a full re-render. Focus never reaches the
//! permalink.

mod treemap;
mod wheel;

use serde::Serialize;

pub use treemap::{TreemapCrumb, TreemapNavigator};
pub use wheel::{CenterLabel, ROOT_CRUMB, WheelCrumb, WheelNavigator};

/// One breadcrumb segment as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb<T> {
    pub label: String,
    /// Where clicking the crumb navigates
    pub target: T,
    /// The current location; rendered without a click affordance
    pub active: bool,
}

fn plural(count: usize, singular: &str) -> String {
    if count == 1 {
        singular.to_string()
    } else {
        format!("{singular}s")
    }
}
