//! Navigation collaborator
//!
//! The editor reads its version token from the current location and moves
//! between screens through [`Navigator`]. [`HistoryNavigator`] is an in-memory
//! history stack used by the CLI and the tests.

use parking_lot::RwLock;
use url::Url;

use crate::api::query_string;

/// Whether a navigation adds a history entry or overwrites the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    Replace,
}

/// Outcome of the unsaved-changes check run before leaving the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveDecision {
    Proceed,
    ConfirmUnsavedChanges,
}

pub trait Navigator: Send + Sync {
    /// Query parameter of the current location.
    fn query_param(&self, name: &str) -> Option<String>;

    /// Set the current location's query to exactly `name=value`, replacing
    /// the current history entry.
    fn replace_query(&self, name: &str, value: &str);

    fn navigate(&self, url: &str, mode: HistoryMode);
}

/// In-memory history of relative URLs. The last entry is the current location.
#[derive(Debug)]
pub struct HistoryNavigator {
    entries: RwLock<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            entries: RwLock::new(vec![start.into()]),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.entries.read().last().cloned()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.read().clone()
    }

    fn parse(location: &str) -> Option<Url> {
        Url::parse("http://localhost/")
            .ok()?
            .join(location.trim_start_matches('/'))
            .ok()
    }
}

impl Navigator for HistoryNavigator {
    fn query_param(&self, name: &str) -> Option<String> {
        let current = self.current()?;
        let url = Self::parse(&current)?;
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    fn replace_query(&self, name: &str, value: &str) {
        let mut entries = self.entries.write();
        let path = entries
            .last()
            .map(|current| current.split('?').next().unwrap_or_default().to_string())
            .unwrap_or_default();
        let location = format!("{path}{}", query_string(&[(name, value)]));
        match entries.last_mut() {
            Some(current) => *current = location,
            None => entries.push(location),
        }
    }

    fn navigate(&self, url: &str, mode: HistoryMode) {
        let mut entries = self.entries.write();
        match (mode, entries.last_mut()) {
            (HistoryMode::Replace, Some(current)) => *current = url.to_string(),
            _ => entries.push(url.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_query_params_from_current_entry() {
        let nav = HistoryNavigator::new("config/gauge?v=abc%2F1&other=x");
        assert_eq!(nav.query_param("v").as_deref(), Some("abc/1"));
        assert_eq!(nav.query_param("missing"), None);
    }

    #[test]
    fn replace_query_rewrites_in_place() {
        let nav = HistoryNavigator::new("config/gauge-list");
        nav.navigate("config/gauge", HistoryMode::Push);
        nav.replace_query("v", "7");
        assert_eq!(nav.entries(), vec!["config/gauge-list", "config/gauge?v=7"]);
        assert_eq!(nav.query_param("v").as_deref(), Some("7"));
    }

    #[test]
    fn replace_navigation_overwrites_current_entry() {
        let nav = HistoryNavigator::new("config/gauge?v=1");
        nav.navigate("config/gauge-list", HistoryMode::Replace);
        assert_eq!(nav.entries(), vec!["config/gauge-list"]);
        nav.navigate("config/gauge", HistoryMode::Push);
        assert_eq!(nav.current().as_deref(), Some("config/gauge"));
        assert_eq!(nav.entries().len(), 2);
    }
}
