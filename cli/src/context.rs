use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use atlas_core::dataset::{self, DataSource};
use atlas_core::{
    AtlasConfig, AtlasEvent, AtlasSession, Explorer, LoaderConfig, MemoryClipboard, MemoryHistory,
    Redraw, ShareFeedback,
};

/// Holds all state for the terminal session.
///
/// Time is virtual: debounces and the drawer delay run to completion after
/// every command, so each prompt sees the settled state.
pub struct CliContext {
    pub config: AtlasConfig,
    /// Explicit config file; `None` means the confy default location
    pub config_path: Option<PathBuf>,
    pub session: AtlasSession,
    pub history: MemoryHistory,
    pub clipboard: MemoryClipboard,
    pub width: u32,
    clock: Duration,
}

impl CliContext {
    pub fn new(config: AtlasConfig, config_path: Option<PathBuf>, width: u32) -> Self {
        Self {
            config,
            config_path,
            session: AtlasSession::Loading,
            history: MemoryHistory::new("/"),
            clipboard: MemoryClipboard::default(),
            width,
            clock: Duration::ZERO,
        }
    }

    pub fn now(&self) -> Duration {
        self.clock
    }

    /// Fetch a dataset and start a fresh explorer over it. Returns the record count.
    pub async fn load(&mut self, location: &str, permalink: Option<&str>) -> Result<usize, String> {
        let source = DataSource::parse(location);
        self.session = AtlasSession::Loading;

        match dataset::load(&source, &LoaderConfig::from(&self.config)).await {
            Ok(dataset) => {
                let count = dataset.len();
                self.history = MemoryHistory::new("/");
                let mut explorer = Explorer::new(
                    Rc::new(dataset),
                    Box::new(self.history.clone()),
                    self.config.clone(),
                    "/",
                    self.width,
                );
                if let Some(query) = permalink {
                    explorer.restore_permalink(query);
                }
                self.session = AtlasSession::Ready(Box::new(explorer));
                Ok(count)
            }
            Err(e) => {
                let message = e.to_string();
                self.session = AtlasSession::Failed(e);
                Err(message)
            }
        }
    }

    pub fn explorer(&mut self) -> Result<&mut Explorer, String> {
        self.session
            .explorer_mut()
            .ok_or_else(|| "No dataset loaded. Use `load <path-or-url>` first.".to_string())
    }

    /// Copy the current permalink to the session clipboard.
    pub fn share(&mut self, origin: &str) -> Result<ShareFeedback, String> {
        let explorer = self
            .session
            .explorer_mut()
            .ok_or_else(|| "No dataset loaded. Use `load <path-or-url>` first.".to_string())?;
        Ok(explorer.share(&mut self.clipboard, origin))
    }

    /// Apply an event, then let every pending timer fire.
    pub fn dispatch(&mut self, event: AtlasEvent) -> Result<Redraw, String> {
        let now = self.clock;
        let redraw = self.explorer()?.handle(now, event);
        Ok(redraw.max(self.run_timers()?))
    }

    fn run_timers(&mut self) -> Result<Redraw, String> {
        let mut redraw = Redraw::None;
        let mut clock = self.clock;
        let explorer = self.session.explorer_mut().ok_or("No dataset loaded")?;
        while let Some(deadline) = explorer.next_deadline() {
            clock = clock.max(deadline);
            redraw = redraw.max(explorer.tick(clock));
        }
        self.clock = clock;
        Ok(redraw)
    }
}
