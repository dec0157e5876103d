//! Directory nodes: child placement, ordering and uniqueness

use crate::error::{Result, TreeError};
use crate::event::{EventKind, Payload, WeakBus};
use crate::tree::node::{Branch, NodeData};
use crate::tree::{Metadata, Node, NodeKind, TreeNode};
use log::debug;
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Name handed out by [`Container::untitled`] before any suffix is added
pub const UNTITLED: &str = "untitled";

/// A directory: a named node owning uniquely named children
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Container(pub(crate) Node);

impl Container {
    pub(crate) fn new(bus: WeakBus, name: String, metadata: Metadata, is_root: bool) -> Self {
        Container(Node::from_parts(
            bus,
            name,
            metadata,
            is_root,
            NodeData::Container(Branch {
                children: RefCell::new(HashMap::new()),
                expanded: Cell::new(false),
            }),
        ))
    }

    fn branch(&self) -> &Branch {
        match &self.0 .0.data {
            NodeData::Container(branch) => branch,
            NodeData::Leaf(_) => unreachable!("directory handle over a leaf"),
        }
    }

    /// Attach a detached node as a child of this directory
    ///
    /// Sets the node's parent and depth (cascading through its subtree), then
    /// emits `add` with this directory as context and the node as payload.
    ///
    /// # Errors
    ///
    /// Nothing is changed when the call fails:
    /// - `InvalidArgument` for the root or a node from another editor
    /// - `Attached` if the node already has a parent
    /// - `Cycle` if the node is this directory or one of its ancestors
    /// - `DuplicateName` if a child already uses the node's name
    pub fn add(&self, node: impl Into<Node>) -> Result<()> {
        let node = node.into();
        let name = node.name();

        if node.is_root() {
            return Err(TreeError::invalid("the root directory cannot be attached"));
        }
        if !node.same_bus(&self.0) {
            return Err(TreeError::invalid(format!(
                "`{}` belongs to a different editor",
                name
            )));
        }
        if node.parent().is_some() {
            return Err(TreeError::Attached { name });
        }
        if node == self.0 || self.is_descendant_of(&node) {
            return Err(TreeError::Cycle { name });
        }

        {
            let mut children = self.branch().children.borrow_mut();
            if children.contains_key(&name) {
                return Err(TreeError::DuplicateName { name });
            }
            children.insert(name.clone(), node.clone());
        }
        *node.0.parent.borrow_mut() = Rc::downgrade(&self.0 .0);
        node.set_depth(self.depth() + 1);

        debug!("added `{}` to `{}`", name, self.path());
        self.0.emit(EventKind::Add, Payload::Node(node))
    }

    /// Detach a child from this directory
    ///
    /// Returns `Ok(false)` without emitting anything if `node` is not a
    /// current child. The detached subtree keeps its shape and becomes its own
    /// root at depth 0; resetting the depths visits every node of the removed
    /// subtree, so the call is O(subtree size), like [`add`](Self::add).
    pub fn remove(&self, node: &impl TreeNode) -> Result<bool> {
        let node = node.as_node();
        let name = node.name();

        let removed = {
            let mut children = self.branch().children.borrow_mut();
            if !children.get(&name).is_some_and(|child| child == node) {
                return Ok(false);
            }
            children.remove(&name)
        };
        let Some(removed) = removed else {
            return Ok(false);
        };

        *removed.0.parent.borrow_mut() = Default::default();
        removed.set_depth(0);

        debug!("removed `{}` from `{}`", name, self.path());
        self.0.emit(EventKind::Remove, Payload::Node(removed))?;
        Ok(true)
    }

    /// Children in presentation order
    ///
    /// Directories come before files; within a kind names ascend by ordinal
    /// comparison. The order is recomputed on every call.
    pub fn children(&self) -> Vec<Node> {
        let mut children: Vec<Node> = self.branch().children.borrow().values().cloned().collect();
        children.sort_by(presentation_order);
        children
    }

    /// Look up a direct child by name
    pub fn child(&self, name: &str) -> Option<Node> {
        self.branch().children.borrow().get(name).cloned()
    }

    /// Position of `node` among the children in presentation order
    pub fn index_of(&self, node: &impl TreeNode) -> Option<usize> {
        let node = node.as_node();
        self.children().iter().position(|child| child == node)
    }

    /// Returns true if `node` is a direct child of this directory
    pub fn contains(&self, node: &impl TreeNode) -> bool {
        node.parent().as_ref() == Some(self)
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.branch().children.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.branch().children.borrow().is_empty()
    }

    /// Resolve a slash separated path relative to this directory
    ///
    /// Empty components are skipped, so `"src//main.ts"` and `"src/main.ts"`
    /// resolve alike. An empty path resolves to the directory itself.
    pub fn find(&self, path: &str) -> Option<Node> {
        let mut current = self.0.clone();
        for component in path.split('/').filter(|c| !c.is_empty()) {
            let next = current.as_container()?.child(component)?;
            current = next;
        }
        Some(current)
    }

    /// First free placeholder name: `untitled`, `untitled1`, `untitled2`, ...
    pub fn untitled(&self) -> String {
        let children = self.branch().children.borrow();
        if !children.contains_key(UNTITLED) {
            return UNTITLED.to_string();
        }
        let mut index = 1usize;
        loop {
            let candidate = format!("{}{}", UNTITLED, index);
            if !children.contains_key(&candidate) {
                return candidate;
            }
            index += 1;
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.branch().expanded.get()
    }

    /// Show or hide the children in the view
    ///
    /// Emits `expand` or `collapse` only when the flag actually changes.
    pub fn set_expanded(&self, expanded: bool) -> Result<()> {
        let branch = self.branch();
        if branch.expanded.get() == expanded {
            return Ok(());
        }
        branch.expanded.set(expanded);
        let kind = if expanded {
            EventKind::Expand
        } else {
            EventKind::Collapse
        };
        self.0.emit(kind, Payload::None)
    }

    /// Shorthand for `set_expanded(true)`
    pub fn expand(&self) -> Result<()> {
        self.set_expanded(true)
    }

    /// Shorthand for `set_expanded(false)`
    pub fn collapse(&self) -> Result<()> {
        self.set_expanded(false)
    }

    /// Flip the expanded flag, emitting `expand` or `collapse`
    pub fn toggle(&self) -> Result<()> {
        self.set_expanded(!self.is_expanded())
    }

    /// Set the flag before any subscriber exists
    pub(crate) fn preset_expanded(&self, expanded: bool) {
        self.branch().expanded.set(expanded);
    }
}

impl TreeNode for Container {
    fn as_node(&self) -> &Node {
        &self.0
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// Sibling order used for presentation
///
/// Directories sort before files, then names ascend.
pub fn presentation_order(a: &Node, b: &Node) -> Ordering {
    match (a.kind(), b.kind()) {
        (NodeKind::Container, NodeKind::Leaf) => Ordering::Less,
        (NodeKind::Leaf, NodeKind::Container) => Ordering::Greater,
        _ => a.0.name.borrow().cmp(&*b.0.name.borrow()),
    }
}
