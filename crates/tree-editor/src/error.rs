//! Error conditions raised by tree and event-bus operations

use derive_more::Display;

/// Errors returned by the tree editor core
///
/// Every variant is raised before any state is changed, except `Handler`,
/// which reports a subscriber failing after the mutation it was told about.
#[derive(Debug, Display)]
pub enum TreeError {
    /// A call received an argument it cannot work with
    #[display(fmt = "invalid argument: {}", _0)]
    InvalidArgument(String),

    /// A sibling with the same name already exists
    #[display(fmt = "an item named `{}` already exists in this directory", name)]
    DuplicateName { name: String },

    /// The node already has a parent and must be removed from it first
    #[display(fmt = "`{}` is already attached to a directory", name)]
    Attached { name: String },

    /// A directory cannot be placed inside its own subtree
    #[display(fmt = "cannot place `{}` inside its own subtree", name)]
    Cycle { name: String },

    /// An event subscriber returned an error
    #[display(fmt = "event handler failed: {}", _0)]
    Handler(anyhow::Error),
}

impl TreeError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        TreeError::InvalidArgument(message.into())
    }

    /// Returns true if this error rejected a name collision
    pub fn is_duplicate_name(&self) -> bool {
        matches!(self, TreeError::DuplicateName { .. })
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TreeError::Handler(err) => Some(&**err),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T, E = TreeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display() {
        let err = TreeError::DuplicateName {
            name: "a.txt".into(),
        };
        assert_eq!(
            err.to_string(),
            "an item named `a.txt` already exists in this directory"
        );
        assert!(err.is_duplicate_name());

        let err = TreeError::invalid("event name must not be empty");
        assert_eq!(
            err.to_string(),
            "invalid argument: event name must not be empty"
        );
        assert!(!err.is_duplicate_name());
    }

    #[test]
    fn test_handler_source() {
        let err = TreeError::Handler(anyhow::anyhow!("view went away"));
        assert_eq!(err.to_string(), "event handler failed: view went away");
        assert_eq!(err.source().unwrap().to_string(), "view went away");

        assert!(TreeError::Cycle { name: "src".into() }.source().is_none());
    }
}
