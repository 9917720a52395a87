//! Shared open/closed state of the assets side panel.
//!
//! Constructed once by the application and handed to every consumer; clones
//! share the same state and subscribers see every change.

use std::sync::Arc;

use tokio::sync::watch;

#[derive(Clone, Debug)]
pub struct AssetsPanel {
    state: Arc<watch::Sender<bool>>,
}

impl AssetsPanel {
    pub fn new(open: bool) -> Self {
        let (state, _) = watch::channel(open);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn is_open(&self) -> bool {
        *self.state.borrow()
    }

    pub fn open(&self) {
        self.set(true);
    }

    pub fn close(&self) {
        self.set(false);
    }

    /// Flip the panel and return the new state.
    pub fn toggle(&self) -> bool {
        let mut now_open = false;
        self.state.send_modify(|open| {
            *open = !*open;
            now_open = *open;
        });
        now_open
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    fn set(&self, open: bool) {
        self.state.send_if_modified(|current| {
            let changed = *current != open;
            *current = open;
            changed
        });
    }
}

impl Default for AssetsPanel {
    fn default() -> Self {
        Self::new(false)
    }
}
