use crate::messaging::{Message, TabId};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Page served by the side panel.
pub const SIDE_PANEL_PATH: &str = "side-panel/index.html";

/// The browser surfaces the dispatcher drives: tabs and the side panel.
#[cfg_attr(test, mockall::automock)]
pub trait BrowserHost: Send + Sync {
    fn enable_side_panel(&self, path: &str);

    fn open_side_panel(&self, tab: TabId);

    /// Delivers a message to the extractor running in `tab`.
    fn send_to_tab(&self, tab: TabId, message: Message);

    fn active_tab_url(&self) -> Option<String>;
}

#[derive(Debug, Default)]
struct LocalHostState {
    panel_path: Option<String>,
    open_panels: Vec<TabId>,
    active_tab: Option<TabId>,
}

/// In-process host: each tab is a channel to its `PageExtractor`.
#[derive(Debug, Default)]
pub struct LocalHost {
    tabs: HashMap<TabId, (String, mpsc::Sender<Message>)>,
    state: Mutex<LocalHostState>,
}

impl LocalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tab showing `url`; the most recently added tab is the active one.
    pub fn add_tab(&mut self, tab: TabId, url: &str, inbox: mpsc::Sender<Message>) {
        self.tabs.insert(tab, (url.to_string(), inbox));
        if let Ok(mut state) = self.state.lock() {
            state.active_tab = Some(tab);
        }
    }

    pub fn is_panel_open(&self, tab: TabId) -> bool {
        self.state
            .lock()
            .map(|state| state.open_panels.contains(&tab))
            .unwrap_or(false)
    }

    pub fn panel_path(&self) -> Option<String> {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.panel_path.clone())
    }
}

impl BrowserHost for LocalHost {
    fn enable_side_panel(&self, path: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.panel_path = Some(path.to_string());
        }
    }

    fn open_side_panel(&self, tab: TabId) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.panel_path.is_none() {
            log::warn!("Side panel opened for tab {} before it was enabled", tab);
        }
        if !state.open_panels.contains(&tab) {
            state.open_panels.push(tab);
        }
    }

    fn send_to_tab(&self, tab: TabId, message: Message) {
        match self.tabs.get(&tab) {
            Some((_, inbox)) => {
                if let Err(e) = inbox.try_send(message) {
                    log::warn!("Could not deliver message to tab {}: {}", tab, e);
                }
            }
            None => log::warn!("No such tab: {}", tab),
        }
    }

    fn active_tab_url(&self) -> Option<String> {
        let active = self.state.lock().ok()?.active_tab?;
        self.tabs.get(&active).map(|(url, _)| url.clone())
    }
}
