mod app;
mod browser;
mod components;

use tracing::Level;

fn main() {
    // Only fails when a subscriber is already installed
    let _ = dioxus_logger::init(Level::INFO);
    dioxus::launch(app::App);
}
