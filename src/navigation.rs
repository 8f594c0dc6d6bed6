use std::sync::Mutex;
use tracing::{info, warn};
use url::Url;

/// Side effects a page can have on whatever hosts it.
pub trait Navigator: Send + Sync {
    fn redirect(&self, location: &str);
    fn alert(&self, message: &str);
    fn open(&self, url: &Url);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Redirect(String),
    Alert(String),
    Open(String),
}

/// Keeps every side effect in order instead of performing it.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    events: Mutex<Vec<NavigationEvent>>,
}

impl RecordingNavigator {
    fn push(&self, event: NavigationEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(_) => warn!("navigation log poisoned, dropping {event:?}"),
        }
    }

    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                NavigationEvent::Redirect(location) => Some(location),
                _ => None,
            })
            .collect()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                NavigationEvent::Alert(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn opened(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                NavigationEvent::Open(url) => Some(url),
                _ => None,
            })
            .collect()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, location: &str) {
        self.push(NavigationEvent::Redirect(location.to_string()));
    }

    fn alert(&self, message: &str) {
        self.push(NavigationEvent::Alert(message.to_string()));
    }

    fn open(&self, url: &Url) {
        self.push(NavigationEvent::Open(url.to_string()));
    }
}

/// Host used by the command line front end.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn redirect(&self, location: &str) {
        info!(location, "redirect requested");
        eprintln!("Not signed in. Run `tracker login` ({location}).");
    }

    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    fn open(&self, url: &Url) {
        info!(%url, "download requested");
        println!("Download: {url}");
    }
}
