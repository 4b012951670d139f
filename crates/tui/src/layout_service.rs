//! Owner of page-shell layout signals.

use tokio::sync::watch;
use tracing::debug;

/// Holds the "sidebar open" signal shared with the navigation panel.
#[derive(Debug)]
pub struct LayoutService {
    sidebar_open: watch::Sender<bool>,
}

impl LayoutService {
    pub fn new(sidebar_open: bool) -> Self {
        let (sender, _) = watch::channel(sidebar_open);
        Self { sidebar_open: sender }
    }

    /// Read handle on the signal; observers see every later change.
    pub fn sidebar_open(&self) -> watch::Receiver<bool> {
        self.sidebar_open.subscribe()
    }

    pub fn is_sidebar_open(&self) -> bool {
        *self.sidebar_open.borrow()
    }

    pub fn toggle_sidebar(&self) {
        self.sidebar_open.send_modify(|open| *open = !*open);
        debug!(open = self.is_sidebar_open(), "sidebar toggled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observers_see_toggles() {
        let layout = LayoutService::new(true);
        let observer = layout.sidebar_open();

        layout.toggle_sidebar();
        assert!(!*observer.borrow());

        layout.toggle_sidebar();
        assert!(*observer.borrow());
        assert!(layout.is_sidebar_open());
    }
}
