//! Common node contract and tree traversal

use crate::error::{Result, TreeError};
use crate::event::{Change, EventKind, Payload};
use crate::tree::node::NodeData;
use crate::tree::{Container, Metadata, Node, NodeKind};
use log::debug;
use std::collections::VecDeque;

/// Behaviour shared by files and directories
///
/// Implementors only provide [`as_node`](TreeNode::as_node); everything else
/// is derived from the shared node handle.
///
/// # Example
///
/// ```
/// use tree_editor::prelude::*;
///
/// let editor = Editor::new(Headless);
/// let src = editor.new_directory("src", Metadata::new());
/// editor.root().add(src.clone()).unwrap();
///
/// assert_eq!(src.depth(), 1);
/// assert_eq!(src.path(), "root/src");
/// ```
pub trait TreeNode {
    /// The untyped handle behind this node
    fn as_node(&self) -> &Node;

    /// Whether this node is a file or a directory
    fn kind(&self) -> NodeKind {
        match self.as_node().0.data {
            NodeData::Leaf(_) => NodeKind::Leaf,
            NodeData::Container(_) => NodeKind::Container,
        }
    }

    /// Name of this node, unique among its siblings
    fn name(&self) -> String {
        self.as_node().0.name.borrow().clone()
    }

    /// Number of ancestor directories (root = 0)
    fn depth(&self) -> usize {
        self.as_node().0.depth.get()
    }

    /// A copy of the node's key-value metadata
    fn metadata(&self) -> Metadata {
        self.as_node().0.metadata.borrow().clone()
    }

    /// The owning directory, `None` for the root and detached nodes
    fn parent(&self) -> Option<Container> {
        self.as_node().0.parent.borrow().upgrade().map(|cell| Container(Node(cell)))
    }

    /// Returns true for an editor's root directory
    fn is_root(&self) -> bool {
        self.as_node().0.is_root
    }

    /// Returns true if following parents from this node ends at a root
    fn is_attached(&self) -> bool {
        match self.ancestors().last() {
            Some(top) => top.is_root(),
            None => self.is_root(),
        }
    }

    /// Rename the node and emit `rename`
    ///
    /// Setting the current name again still emits.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for the root, whose name is fixed
    /// - `DuplicateName` if a sibling already uses `name`; the node keeps its
    ///   old name
    fn set_name(&self, name: impl Into<String>) -> Result<()> {
        let node = self.as_node();
        if node.is_root() {
            return Err(TreeError::invalid("the root directory cannot be renamed"));
        }
        let current = name.into();
        let previous = node.name();

        if current != previous {
            if let Some(parent) = node.parent() {
                if let NodeData::Container(branch) = &parent.0 .0.data {
                    let mut siblings = branch.children.borrow_mut();
                    if siblings.contains_key(&current) {
                        return Err(TreeError::DuplicateName { name: current });
                    }
                    if let Some(entry) = siblings.remove(&previous) {
                        siblings.insert(current.clone(), entry);
                    }
                }
            }
            *node.0.name.borrow_mut() = current.clone();
        }

        debug!("renamed `{}` to `{}`", previous, current);
        node.emit(EventKind::Rename, Payload::Name(Change { current, previous }))
    }

    /// Replace the metadata and emit `metadata`
    fn set_metadata(&self, metadata: Metadata) -> Result<()> {
        let node = self.as_node();
        let previous = node.0.metadata.replace(metadata.clone());
        node.emit(
            EventKind::Metadata,
            Payload::Metadata(Change {
                current: metadata,
                previous,
            }),
        )
    }

    /// Make this node the editor's selection by emitting `select`
    ///
    /// Nodes outside an editor's tree cannot be selected; the call is a no-op.
    fn select(&self) -> Result<()> {
        if !self.is_attached() {
            return Ok(());
        }
        self.as_node().emit(EventKind::Select, Payload::None)
    }

    /// Slash separated names from the top of the tree down to this node
    fn path(&self) -> String {
        let mut components: Vec<String> = self.ancestors().iter().map(|a| a.name()).collect();
        components.reverse();
        components.push(self.name());
        components.join("/")
    }

    /// All ancestors of this node, from parent to the top of the tree
    fn ancestors(&self) -> Vec<Container> {
        let mut ancestors = Vec::new();
        let mut current = self.parent();
        while let Some(parent) = current {
            current = parent.parent();
            ancestors.push(parent);
        }
        ancestors
    }

    /// Returns true if `ancestor` is a strict ancestor of this node
    fn is_descendant_of(&self, ancestor: &impl TreeNode) -> bool {
        let ancestor = ancestor.as_node();
        self.ancestors().iter().any(|a| a.as_node() == ancestor)
    }

    /// Walk the subtree rooted at this node
    fn walk(&self, order: TraversalOrder) -> TreeWalker {
        TreeWalker::new(self.as_node().clone(), order)
    }

    /// Clone the untyped handle behind this node
    fn to_node(&self) -> Node {
        self.as_node().clone()
    }
}

/// Traversal order for walking the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Visit parent before children (top-down)
    PreOrder,
    /// Visit children before parent (bottom-up)
    PostOrder,
    /// Visit level by level (breadth-first)
    BreadthFirst,
}

/// Iterator over a subtree
///
/// Siblings are visited in presentation order. The walker reads children
/// lazily, so structural changes made while iterating show up in the parts
/// not visited yet.
pub struct TreeWalker {
    order: TraversalOrder,
    /// Nodes still to visit; the flag marks post-order nodes whose children
    /// were already queued
    pending: VecDeque<(Node, bool)>,
}

impl TreeWalker {
    /// Create a new tree walker starting from the given node
    pub fn new(start: Node, order: TraversalOrder) -> Self {
        let mut pending = VecDeque::new();
        pending.push_back((start, false));
        Self { order, pending }
    }

    fn next_preorder(&mut self) -> Option<Node> {
        let (current, _) = self.pending.pop_back()?;

        // Add children in reverse order so they're popped in correct order
        for child in children_of(&current).into_iter().rev() {
            self.pending.push_back((child, false));
        }

        Some(current)
    }

    fn next_postorder(&mut self) -> Option<Node> {
        while let Some((current, expanded)) = self.pending.pop_back() {
            if expanded {
                return Some(current);
            }

            let children = children_of(&current);
            self.pending.push_back((current, true));
            for child in children.into_iter().rev() {
                self.pending.push_back((child, false));
            }
        }
        None
    }

    fn next_breadthfirst(&mut self) -> Option<Node> {
        let (current, _) = self.pending.pop_front()?;
        self.pending
            .extend(children_of(&current).into_iter().map(|child| (child, false)));
        Some(current)
    }
}

impl Iterator for TreeWalker {
    type Item = Node;

    fn next(&mut self) -> Option<Self::Item> {
        match self.order {
            TraversalOrder::PreOrder => self.next_preorder(),
            TraversalOrder::PostOrder => self.next_postorder(),
            TraversalOrder::BreadthFirst => self.next_breadthfirst(),
        }
    }
}

fn children_of(node: &Node) -> Vec<Node> {
    node.as_container()
        .map(|container| container.children())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventBus;
    use crate::tree::Leaf;

    // root/
    //   dir1/
    //     dir2/
    //       file3.txt
    //     file2.txt
    //   file1.txt
    fn sample() -> (EventBus, Container) {
        let bus = EventBus::new();
        let dir = |name: &str| Container::new(bus.downgrade(), name.into(), Metadata::new(), false);
        let file =
            |name: &str| Leaf::new(bus.downgrade(), name.into(), String::new(), Metadata::new());

        let root = Container::new(bus.downgrade(), "root".into(), Metadata::new(), true);
        let dir1 = dir("dir1");
        let dir2 = dir("dir2");
        root.add(file("file1.txt")).unwrap();
        root.add(dir1.clone()).unwrap();
        dir1.add(file("file2.txt")).unwrap();
        dir1.add(dir2.clone()).unwrap();
        dir2.add(file("file3.txt")).unwrap();
        (bus, root)
    }

    fn names(walker: TreeWalker) -> Vec<String> {
        walker.map(|node| node.name()).collect()
    }

    #[test]
    fn test_tree_traversal_preorder() {
        let (_bus, root) = sample();
        assert_eq!(
            names(root.walk(TraversalOrder::PreOrder)),
            vec!["root", "dir1", "dir2", "file3.txt", "file2.txt", "file1.txt"]
        );
    }

    #[test]
    fn test_tree_traversal_postorder() {
        let (_bus, root) = sample();
        assert_eq!(
            names(root.walk(TraversalOrder::PostOrder)),
            vec!["file3.txt", "dir2", "file2.txt", "dir1", "file1.txt", "root"]
        );
    }

    #[test]
    fn test_tree_traversal_breadth_first() {
        let (_bus, root) = sample();
        assert_eq!(
            names(root.walk(TraversalOrder::BreadthFirst)),
            vec!["root", "dir1", "file1.txt", "dir2", "file2.txt", "file3.txt"]
        );
    }

    #[test]
    fn test_tree_path_and_depth() {
        let (_bus, root) = sample();
        let file3 = root.find("dir1/dir2/file3.txt").unwrap();

        assert_eq!(file3.path(), "root/dir1/dir2/file3.txt");
        assert_eq!(file3.depth(), 3);
        assert_eq!(root.depth(), 0);
        assert!(file3.is_descendant_of(&root));
        assert!(!root.is_descendant_of(&file3));
        assert_eq!(
            file3.ancestors().iter().map(|a| a.name()).collect::<Vec<_>>(),
            vec!["dir2", "dir1", "root"]
        );
    }

    #[test]
    fn test_is_attached() {
        let (bus, root) = sample();
        let stray = Leaf::new(bus.downgrade(), "stray".into(), String::new(), Metadata::new());
        assert!(root.is_attached());
        assert!(root.find("dir1/file2.txt").unwrap().is_attached());
        assert!(!stray.is_attached());

        let dir1 = root.child("dir1").unwrap();
        root.remove(&dir1).unwrap();
        assert!(!dir1.is_attached());
        assert!(!root.find("").unwrap().is_descendant_of(&dir1));
    }

    #[test]
    fn test_set_name_rekeys_parent() {
        let (_bus, root) = sample();
        let dir1 = root.child("dir1").unwrap();

        dir1.set_name("lib").unwrap();
        assert!(root.child("dir1").is_none());
        assert_eq!(root.child("lib"), Some(dir1.clone()));

        let err = dir1.set_name("file1.txt").unwrap_err();
        assert!(err.is_duplicate_name());
        assert_eq!(dir1.name(), "lib");
        assert_eq!(root.len(), 2);
    }

    #[test]
    fn test_root_name_is_fixed() {
        let (_bus, root) = sample();
        assert!(matches!(
            root.set_name("project"),
            Err(TreeError::InvalidArgument(_))
        ));
        assert_eq!(root.name(), "root");
        assert_eq!(root.find("dir1/dir2").unwrap().path(), "root/dir1/dir2");
    }

    #[test]
    fn test_same_value_writes_still_emit() {
        let (bus, root) = sample();
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = std::rc::Rc::clone(&seen);
        bus.on_any(move |event| {
            sink.borrow_mut().push(event.name.to_string());
            Ok(())
        });

        let dir1 = root.child("dir1").unwrap();
        dir1.set_name("dir1").unwrap();
        dir1.set_metadata(Metadata::new()).unwrap();

        assert_eq!(*seen.borrow(), vec!["rename", "metadata"]);
        assert_eq!(root.child("dir1"), Some(dir1));
        assert_eq!(root.len(), 2);
    }

    #[test]
    fn test_set_metadata_reports_previous_metadata() {
        let (bus, root) = sample();
        let seen = std::rc::Rc::new(std::cell::RefCell::new(None));
        let sink = std::rc::Rc::clone(&seen);
        bus.on(EventKind::Metadata, move |event| {
            *sink.borrow_mut() = event.payload.metadata_change().cloned();
            Ok(())
        })
        .unwrap();

        let first: Metadata = [("lang".to_string(), "rust".to_string())].into();
        root.set_metadata(first.clone()).unwrap();
        let second: Metadata = [("lang".to_string(), "ts".to_string())].into();
        root.set_metadata(second.clone()).unwrap();

        assert_eq!(
            seen.borrow().clone(),
            Some(Change {
                current: second.clone(),
                previous: first
            })
        );
        assert_eq!(root.metadata(), second);
    }
}
