//! Tree Editor Library
//!
//! The headless core of a hierarchical file/directory editor: a tree of
//! files and directories that keeps names unique, depths consistent and
//! siblings ordered, and reports every change through a synchronous event
//! bus so any view can stay in sync.
//!
//! # Core Concepts
//!
//! - **Editor**: Owns the root directory, the event bus and the selection
//! - **Leaf / Container**: Files and directories, both [`TreeNode`]s
//! - **EventBus**: Named publish/subscribe with "any" handlers
//! - **PromptHost**: The embedding view's dialog surface
//!
//! # Example
//!
//! ```
//! use tree_editor::prelude::*;
//!
//! let editor = Editor::new(Headless);
//! let src = editor.new_directory("src", Metadata::new());
//! editor.root().add(src.clone()).unwrap();
//! src.add(editor.new_file("main.ts", "", Metadata::new())).unwrap();
//! src.set_name("lib").unwrap();
//!
//! for node in editor.root().walk(TraversalOrder::PreOrder) {
//!     println!("{:indent$}{}", "", node.name(), indent = node.depth() * 2);
//! }
//! assert!(editor.find_by_path("root/lib/main.ts").is_some());
//! ```

pub mod diagnostics;
pub mod editor;
pub mod error;
pub mod event;
pub mod options;
pub mod prompt;
pub mod tree;

pub use editor::{Affordances, Editor, ROOT_NAME};
pub use error::{Result, TreeError};
pub use event::{Change, Event, EventBus, EventKind, HandlerId, Payload};
pub use options::EditorOptions;
pub use prompt::{Headless, PromptHost, PromptOutcome, PromptReply, PromptRequest, QueuedPrompts};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::tree::prelude::*;
    pub use crate::{
        Affordances, Change, Editor, EditorOptions, Event, EventBus, EventKind, HandlerId,
        Headless, Payload, PromptHost, PromptOutcome, PromptReply, PromptRequest, QueuedPrompts,
        TreeError,
    };
}
