//! Core node types for the tree model

use crate::error::Result;
use crate::event::{Change, EventKind, Payload, WeakBus};
use crate::tree::{Container, TreeNode};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque key-value data attached to a node
pub type Metadata = BTreeMap<String, String>;

/// The type/kind of a node in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeKind {
    /// A container node - can have children (a directory)
    Container,
    /// A leaf node - cannot have children (a file)
    Leaf,
}

impl NodeKind {
    /// Returns true if this is a container node
    pub const fn is_container(self) -> bool {
        matches!(self, NodeKind::Container)
    }

    /// Returns true if this is a leaf node
    pub const fn is_leaf(self) -> bool {
        matches!(self, NodeKind::Leaf)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Container => write!(f, "Container"),
            NodeKind::Leaf => write!(f, "Leaf"),
        }
    }
}

pub(crate) struct NodeCell {
    pub(crate) name: RefCell<String>,
    pub(crate) depth: Cell<usize>,
    pub(crate) metadata: RefCell<Metadata>,
    /// Owning directory; dangling for the root and detached nodes
    pub(crate) parent: RefCell<Weak<NodeCell>>,
    pub(crate) bus: WeakBus,
    pub(crate) is_root: bool,
    pub(crate) data: NodeData,
}

pub(crate) enum NodeData {
    Leaf(LeafData),
    Container(Branch),
}

pub(crate) struct LeafData {
    pub(crate) content: RefCell<String>,
}

pub(crate) struct Branch {
    pub(crate) children: RefCell<HashMap<String, Node>>,
    pub(crate) expanded: Cell<bool>,
}

/// Shared handle to a file or directory
///
/// Handles compare by identity: two handles are equal when they refer to the
/// same node, regardless of name or content.
#[derive(Clone)]
pub struct Node(pub(crate) Rc<NodeCell>);

impl Node {
    pub(crate) fn from_parts(
        bus: WeakBus,
        name: String,
        metadata: Metadata,
        is_root: bool,
        data: NodeData,
    ) -> Self {
        Node(Rc::new(NodeCell {
            name: RefCell::new(name),
            depth: Cell::new(0),
            metadata: RefCell::new(metadata),
            parent: RefCell::new(Weak::new()),
            bus,
            is_root,
            data,
        }))
    }

    /// View this node as a file
    pub fn as_leaf(&self) -> Option<Leaf> {
        match self.0.data {
            NodeData::Leaf(_) => Some(Leaf(self.clone())),
            NodeData::Container(_) => None,
        }
    }

    /// View this node as a directory
    pub fn as_container(&self) -> Option<Container> {
        match self.0.data {
            NodeData::Container(_) => Some(Container(self.clone())),
            NodeData::Leaf(_) => None,
        }
    }

    /// Returns true if this node is a file
    pub fn is_leaf(&self) -> bool {
        matches!(self.0.data, NodeData::Leaf(_))
    }

    /// Returns true if this node is a directory
    pub fn is_container(&self) -> bool {
        matches!(self.0.data, NodeData::Container(_))
    }

    /// Set the depth of this node and recompute it for the whole subtree
    pub(crate) fn set_depth(&self, depth: usize) {
        self.0.depth.set(depth);
        if let NodeData::Container(branch) = &self.0.data {
            for child in branch.children.borrow().values() {
                child.set_depth(depth + 1);
            }
        }
    }

    pub(crate) fn emit(&self, kind: EventKind, payload: Payload) -> Result<()> {
        self.0.bus.emit(kind, self, payload)
    }

    pub(crate) fn same_bus(&self, other: &Node) -> bool {
        self.0.bus.same_as(&other.0.bus)
    }
}

impl TreeNode for Node {
    fn as_node(&self) -> &Node {
        self
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Rc::as_ptr(&self.0), state)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind())
            .field("name", &*self.0.name.borrow())
            .field("depth", &self.0.depth.get())
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name.borrow())
    }
}

impl From<Leaf> for Node {
    fn from(leaf: Leaf) -> Self {
        leaf.0
    }
}

impl From<Container> for Node {
    fn from(container: Container) -> Self {
        container.0
    }
}

/// A file: a named node holding string content
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Leaf(pub(crate) Node);

impl Leaf {
    pub(crate) fn new(bus: WeakBus, name: String, content: String, metadata: Metadata) -> Self {
        Leaf(Node::from_parts(
            bus,
            name,
            metadata,
            false,
            NodeData::Leaf(LeafData {
                content: RefCell::new(content),
            }),
        ))
    }

    fn data(&self) -> &LeafData {
        match &self.0 .0.data {
            NodeData::Leaf(data) => data,
            NodeData::Container(_) => unreachable!("leaf handle over a directory"),
        }
    }

    pub fn content(&self) -> String {
        self.data().content.borrow().clone()
    }

    /// Replace the file content and emit `content`
    pub fn set_content(&self, content: impl Into<String>) -> Result<()> {
        let current = content.into();
        let previous = self.data().content.replace(current.clone());
        self.0
            .emit(EventKind::Content, Payload::Content(Change { current, previous }))
    }

    /// Everything after the last `.` of the name, empty if there is none
    pub fn extension(&self) -> String {
        let name = self.0 .0.name.borrow();
        match name.rfind('.') {
            Some(index) => name[index + 1..].to_string(),
            None => String::new(),
        }
    }
}

impl TreeNode for Leaf {
    fn as_node(&self) -> &Node {
        &self.0
    }
}

impl fmt::Debug for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}
