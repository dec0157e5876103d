//! The editor: root directory, event bus, selection and workflows

use crate::diagnostics;
use crate::error::Result;
use crate::event::{Event, EventBus, EventKind, HandlerId, Payload};
use crate::options::EditorOptions;
use crate::prompt::{PromptHost, PromptOutcome, PromptReply, PromptRequest};
use crate::tree::{Container, Leaf, Metadata, Node, TreeNode};
use log::debug;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Name of every editor's root directory
pub const ROOT_NAME: &str = "root";

/// Which toolbar actions make sense for the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    /// New files and directories can be created in the selection
    pub can_create: bool,
    /// The selection can be deleted
    pub can_delete: bool,
}

/// Root aggregate of a tree editor
///
/// Owns the root directory, the event bus every node reports to, the current
/// selection and the host surface used for prompts.
///
/// # Example
///
/// ```
/// use tree_editor::prelude::*;
///
/// let editor = Editor::new(Headless);
/// editor
///     .on(EventKind::Add, |event| {
///         println!("{} added to {}", event.payload.node().unwrap(), event.context);
///         Ok(())
///     })
///     .unwrap();
///
/// let file = editor.new_file("main.ts", "", Metadata::new());
/// editor.root().add(file.clone()).unwrap();
/// file.select().unwrap();
///
/// assert_eq!(editor.selected(), file.to_node());
/// assert_eq!(file.extension(), "ts");
/// ```
pub struct Editor {
    bus: EventBus,
    root: Container,
    selection: Rc<RefCell<Node>>,
    host: Box<dyn PromptHost>,
    options: EditorOptions,
}

impl Editor {
    /// Create an editor with default options, bound to `host` for prompts
    pub fn new(host: impl PromptHost + 'static) -> Self {
        Self::with_options(host, EditorOptions::default())
    }

    pub fn with_options(host: impl PromptHost + 'static, options: EditorOptions) -> Self {
        let bus = EventBus::new();
        let root = Container::new(bus.downgrade(), ROOT_NAME.to_string(), Metadata::new(), true);
        root.preset_expanded(options.expand_root);

        let selection = Rc::new(RefCell::new(root.to_node()));
        track_selection(&bus, &root, &selection);
        if options.log_events {
            diagnostics::attach_event_logger(&bus);
        }

        debug!("editor created with {:?}", options);
        Self {
            bus,
            root,
            selection,
            host: Box::new(host),
            options,
        }
    }

    /// The root directory, named `root` at depth 0
    pub fn root(&self) -> &Container {
        &self.root
    }

    /// The bus every node of this editor reports to
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// The currently selected node, the root until something else is selected
    pub fn selected(&self) -> Node {
        self.selection.borrow().clone()
    }

    pub fn affordances(&self) -> Affordances {
        let selected = self.selected();
        Affordances {
            can_create: selected.is_container(),
            can_delete: !selected.is_root(),
        }
    }

    /// See [`EventBus::on`]
    pub fn on<F>(&self, event: impl AsRef<str>, handler: F) -> Result<HandlerId>
    where
        F: Fn(&Event<'_>) -> anyhow::Result<()> + 'static,
    {
        self.bus.on(event, handler)
    }

    /// See [`EventBus::off`]
    pub fn off(&self, event: impl AsRef<str>, id: HandlerId) -> Result<()> {
        self.bus.off(event, id)
    }

    /// See [`EventBus::on_any`]
    pub fn on_any<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&Event<'_>) -> anyhow::Result<()> + 'static,
    {
        self.bus.on_any(handler)
    }

    pub fn off_any(&self, id: HandlerId) {
        self.bus.off_any(id)
    }

    /// See [`EventBus::emit`]
    pub fn emit(&self, event: impl AsRef<str>, context: &impl TreeNode, payload: Payload) -> Result<()> {
        self.bus.emit(event, context.as_node(), payload)
    }

    /// Create a detached file bound to this editor
    pub fn new_file(
        &self,
        name: impl Into<String>,
        content: impl Into<String>,
        metadata: Metadata,
    ) -> Leaf {
        Leaf::new(self.bus.downgrade(), name.into(), content.into(), metadata)
    }

    /// Create a detached directory bound to this editor
    pub fn new_directory(&self, name: impl Into<String>, metadata: Metadata) -> Container {
        Container::new(self.bus.downgrade(), name.into(), metadata, false)
    }

    /// Rename `node`; see [`TreeNode::set_name`]
    pub fn rename(&self, node: &impl TreeNode, name: impl Into<String>) -> Result<()> {
        node.set_name(name)
    }

    /// Remove `node` from its directory
    ///
    /// The root and detached nodes cannot be deleted; the call returns
    /// `Ok(false)` for them.
    pub fn delete(&self, node: &impl TreeNode) -> Result<bool> {
        match node.parent() {
            Some(parent) => parent.remove(node),
            None => Ok(false),
        }
    }

    /// Resolve a path as produced by [`TreeNode::path`], e.g. `root/src/main.ts`
    ///
    /// The path must start with the root's name; a leading `/` is ignored.
    pub fn find_by_path(&self, path: &str) -> Option<Node> {
        let root_name = self.root.name();
        let relative = match path.trim_start_matches('/').strip_prefix(root_name.as_str())? {
            "" => "",
            rest => rest.strip_prefix('/')?,
        };
        self.root.find(relative)
    }

    /// Ask the host for a string
    ///
    /// `reply` runs at most once, when the host answers.
    pub fn prompt<F>(&self, message: impl Into<String>, initial_value: impl Into<String>, reply: F)
    where
        F: FnOnce(PromptOutcome) -> Result<()> + 'static,
    {
        let request = PromptRequest {
            message: message.into(),
            initial_value: initial_value.into(),
        };
        debug!("prompting `{}`", request.message);
        self.host.prompt(request, PromptReply::new(reply));
    }

    /// Ask for a file name and create the file in `directory`
    pub fn prompt_new_file(&self, directory: &Container) {
        let bus = self.bus.downgrade();
        let directory = directory.clone();
        let initial = directory.untitled();
        self.prompt("New file name:", initial, move |outcome| match outcome {
            PromptOutcome::Submitted(name) => {
                directory.add(Leaf::new(bus, name, String::new(), Metadata::new()))
            }
            PromptOutcome::Cancelled => Ok(()),
        });
    }

    /// Ask for a directory name and create it in `directory`
    pub fn prompt_new_directory(&self, directory: &Container) {
        let bus = self.bus.downgrade();
        let directory = directory.clone();
        let initial = directory.untitled();
        self.prompt("New directory name:", initial, move |outcome| match outcome {
            PromptOutcome::Submitted(name) => {
                directory.add(Container::new(bus, name, Metadata::new(), false))
            }
            PromptOutcome::Cancelled => Ok(()),
        });
    }

    /// Ask for a new name for `node`
    pub fn prompt_rename(&self, node: &impl TreeNode) {
        let node = node.to_node();
        let initial = node.name();
        self.prompt("New name:", initial, move |outcome| match outcome {
            PromptOutcome::Submitted(name) => node.set_name(name),
            PromptOutcome::Cancelled => Ok(()),
        });
    }

    /// Create an untitled file in the selected directory
    ///
    /// Returns `None` when a file is selected.
    pub fn new_file_in_selection(&self) -> Result<Option<Leaf>> {
        let Some(directory) = self.selected().as_container() else {
            return Ok(None);
        };
        let file = self.new_file(directory.untitled(), "", Metadata::new());
        directory.add(file.clone())?;
        Ok(Some(file))
    }

    /// Create an untitled directory in the selected directory
    ///
    /// Returns `None` when a file is selected.
    pub fn new_directory_in_selection(&self) -> Result<Option<Container>> {
        let Some(directory) = self.selected().as_container() else {
            return Ok(None);
        };
        let created = self.new_directory(directory.untitled(), Metadata::new());
        directory.add(created.clone())?;
        Ok(Some(created))
    }

    /// Delete the selected node; the selection falls back to the root
    pub fn delete_selection(&self) -> Result<bool> {
        self.delete(&self.selected())
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("root", &self.root)
            .field("selected", &*self.selection.borrow())
            .field("bus", &self.bus)
            .field("options", &self.options)
            .finish()
    }
}

/// Keep `selection` in sync with `select` events and fall back to the root
/// when the selected node leaves the tree
///
/// Registered before any user handler, so subscribers always observe the
/// updated selection.
fn track_selection(bus: &EventBus, root: &Container, selection: &Rc<RefCell<Node>>) {
    let slot = Rc::clone(selection);
    bus.register(EventKind::Select.as_str(), move |event| {
        *slot.borrow_mut() = event.context.clone();
        Ok(())
    });

    let slot = Rc::clone(selection);
    let root = root.clone();
    bus.register(EventKind::Remove.as_str(), move |event| {
        let Some(removed) = event.payload.node() else {
            return Ok(());
        };
        let selected = slot.borrow().clone();
        if &selected == removed || selected.is_descendant_of(removed) {
            debug!("selection `{}` removed, falling back to root", selected);
            root.select()?;
        }
        Ok(())
    });
}
