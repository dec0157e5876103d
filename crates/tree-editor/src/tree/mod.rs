//! Tree data model: files, directories and their invariants
//!
//! Nodes are reference-counted handles. A directory owns its children; each
//! child keeps a weak back-pointer to its directory, used only for lookup.

mod container;
mod node;
mod traits;

pub use container::{presentation_order, Container, UNTITLED};
pub use node::{Leaf, Metadata, Node, NodeKind};
pub use traits::{TraversalOrder, TreeNode, TreeWalker};

/// Re-export common types for convenience
pub mod prelude {
    pub use super::{
        Container, Leaf, Metadata, Node, NodeKind, TraversalOrder, TreeNode, TreeWalker,
    };
}
