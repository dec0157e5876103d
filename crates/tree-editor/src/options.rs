//! Configuration options for an editor.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration options for an [`Editor`](crate::Editor).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct EditorOptions {
    /// Start with the root directory expanded.
    pub expand_root: bool,

    /// Log every event through the `log` facade at info level.
    pub log_events: bool,
}

impl EditorOptions {
    /// Create new editor options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the root directory expanded or collapsed.
    pub fn expand_root(mut self, expanded: bool) -> Self {
        self.expand_root = expanded;
        self
    }

    /// Enable or disable the event logger.
    pub fn log_events(mut self, enabled: bool) -> Self {
        self.log_events = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = EditorOptions::new().expand_root(true).log_events(true);
        assert!(options.expand_root);
        assert!(options.log_events);
        assert_eq!(EditorOptions::new(), EditorOptions::default());
        assert!(!EditorOptions::default().expand_root);
    }
}
