//! Synchronous publish/subscribe bus shared by an editor and its nodes
//!
//! Handlers run in registration order on the caller's stack. Specific
//! handlers for an event name run first, then the "any" handlers. The first
//! handler returning an error stops the emission and the error is handed to
//! whoever triggered it.

use crate::error::{Result, TreeError};
use crate::tree::{Metadata, Node};
use derive_more::Display;
use log::trace;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Names of the events emitted by the tree itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum EventKind {
    /// A node was attached to a directory
    #[display(fmt = "add")]
    Add,
    /// A node was detached from a directory
    #[display(fmt = "remove")]
    Remove,
    /// A node became the selection
    #[display(fmt = "select")]
    Select,
    /// A directory was expanded
    #[display(fmt = "expand")]
    Expand,
    /// A directory was collapsed
    #[display(fmt = "collapse")]
    Collapse,
    /// A node changed its name
    #[display(fmt = "rename")]
    Rename,
    /// A file changed its content
    #[display(fmt = "content")]
    Content,
    /// A node replaced its metadata
    #[display(fmt = "metadata")]
    Metadata,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::Add,
        EventKind::Remove,
        EventKind::Select,
        EventKind::Expand,
        EventKind::Collapse,
        EventKind::Rename,
        EventKind::Content,
        EventKind::Metadata,
    ];

    /// The event name used on the bus
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::Add => "add",
            EventKind::Remove => "remove",
            EventKind::Select => "select",
            EventKind::Expand => "expand",
            EventKind::Collapse => "collapse",
            EventKind::Rename => "rename",
            EventKind::Content => "content",
            EventKind::Metadata => "metadata",
        }
    }

    /// Look up a built-in event by its bus name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl AsRef<str> for EventKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Old and new value of a property
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Change<T> {
    pub current: T,
    pub previous: T,
}

/// Data carried by an event
#[derive(Debug, Clone)]
pub enum Payload {
    None,
    /// The node that was added or removed
    Node(Node),
    Name(Change<String>),
    Content(Change<String>),
    Metadata(Change<Metadata>),
}

impl Payload {
    /// The added or removed node, for `add` and `remove`
    pub fn node(&self) -> Option<&Node> {
        match self {
            Payload::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Old and new name, for `rename`
    pub fn name_change(&self) -> Option<&Change<String>> {
        match self {
            Payload::Name(change) => Some(change),
            _ => None,
        }
    }

    /// Old and new file content, for `content`
    pub fn content_change(&self) -> Option<&Change<String>> {
        match self {
            Payload::Content(change) => Some(change),
            _ => None,
        }
    }

    /// Old and new metadata, for `metadata`
    pub fn metadata_change(&self) -> Option<&Change<Metadata>> {
        match self {
            Payload::Metadata(change) => Some(change),
            _ => None,
        }
    }
}

/// A single emission as seen by a handler
#[derive(Debug)]
pub struct Event<'a> {
    /// Event name as passed to `emit`
    pub name: &'a str,
    /// The node the event happened on
    pub context: &'a Node,
    pub payload: &'a Payload,
}

impl Event<'_> {
    /// The built-in kind of this event, `None` for host-defined names
    pub fn kind(&self) -> Option<EventKind> {
        EventKind::from_name(self.name)
    }
}

/// Token returned on subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "HandlerId({})", _0)]
pub struct HandlerId(u64);

type Handler = Rc<dyn Fn(&Event<'_>) -> anyhow::Result<()>>;
type HandlerList = SmallVec<[Handler; 4]>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    named: HashMap<String, Vec<(HandlerId, Handler)>>,
    any: Vec<(HandlerId, Handler)>,
}

impl Registry {
    fn allocate(&mut self) -> HandlerId {
        self.next_id += 1;
        HandlerId(self.next_id)
    }
}

/// Event bus owned by an [`Editor`](crate::Editor)
///
/// Cloning the bus clones a handle to the same registry.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<Registry>>,
}

impl EventBus {
    /// Create a bus with no handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event`
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the event name is empty or blank.
    pub fn on<F>(&self, event: impl AsRef<str>, handler: F) -> Result<HandlerId>
    where
        F: Fn(&Event<'_>) -> anyhow::Result<()> + 'static,
    {
        let event = event.as_ref();
        validate(event)?;
        Ok(self.register(event, handler))
    }

    /// Remove a handler registered with [`on`](Self::on)
    ///
    /// Unknown ids are ignored.
    pub fn off(&self, event: impl AsRef<str>, id: HandlerId) -> Result<()> {
        let event = event.as_ref();
        validate(event)?;

        let mut registry = self.inner.borrow_mut();
        if let Some(handlers) = registry.named.get_mut(event) {
            handlers.retain(|(handler_id, _)| *handler_id != id);
            if handlers.is_empty() {
                registry.named.remove(event);
            }
        }
        Ok(())
    }

    /// Register a handler that sees every event
    pub fn on_any<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&Event<'_>) -> anyhow::Result<()> + 'static,
    {
        let handler: Handler = Rc::new(handler);
        let mut registry = self.inner.borrow_mut();
        let id = registry.allocate();
        registry.any.push((id, handler));
        id
    }

    /// Remove a handler registered with [`on_any`](Self::on_any)
    ///
    /// Unknown ids are ignored.
    pub fn off_any(&self, id: HandlerId) {
        self.inner
            .borrow_mut()
            .any
            .retain(|(handler_id, _)| *handler_id != id);
    }

    /// Invoke every handler for `event`, then every "any" handler
    ///
    /// The handler list is captured when the emission starts, so handlers
    /// added or removed by a running handler apply from the next emission.
    pub fn emit(&self, event: impl AsRef<str>, context: &Node, payload: Payload) -> Result<()> {
        let name = event.as_ref();
        validate(name)?;

        let (named, any) = self.snapshot(name);
        trace!(
            "emit `{}` on `{}` ({} handlers, {} any)",
            name,
            context,
            named.len(),
            any.len()
        );

        let event = Event {
            name,
            context,
            payload: &payload,
        };
        for handler in named.iter().chain(any.iter()) {
            (**handler)(&event).map_err(TreeError::Handler)?;
        }
        Ok(())
    }

    /// Number of handlers registered for `event`
    pub fn handler_count(&self, event: impl AsRef<str>) -> usize {
        self.inner
            .borrow()
            .named
            .get(event.as_ref())
            .map_or(0, Vec::len)
    }

    /// Number of handlers registered with [`on_any`](Self::on_any)
    pub fn any_handler_count(&self) -> usize {
        self.inner.borrow().any.len()
    }

    pub(crate) fn register<F>(&self, event: &str, handler: F) -> HandlerId
    where
        F: Fn(&Event<'_>) -> anyhow::Result<()> + 'static,
    {
        let handler: Handler = Rc::new(handler);
        let mut registry = self.inner.borrow_mut();
        let id = registry.allocate();
        registry
            .named
            .entry(event.to_string())
            .or_default()
            .push((id, handler));
        id
    }

    pub(crate) fn downgrade(&self) -> WeakBus {
        WeakBus(Rc::downgrade(&self.inner))
    }

    fn snapshot(&self, name: &str) -> (HandlerList, HandlerList) {
        let registry = self.inner.borrow();
        let named = registry
            .named
            .get(name)
            .map(|handlers| handlers.iter().map(|(_, h)| Rc::clone(h)).collect())
            .unwrap_or_default();
        let any = registry.any.iter().map(|(_, h)| Rc::clone(h)).collect();
        (named, any)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.inner.borrow();
        let mut names: Vec<_> = registry.named.keys().collect();
        names.sort();
        f.debug_struct("EventBus")
            .field("events", &names)
            .field("any", &registry.any.len())
            .finish()
    }
}

/// Non-owning bus handle stored on every node
///
/// Nodes outliving their editor emit into nothing.
#[derive(Clone, Default)]
pub(crate) struct WeakBus(Weak<RefCell<Registry>>);

impl WeakBus {
    pub(crate) fn emit(&self, kind: EventKind, context: &Node, payload: Payload) -> Result<()> {
        match self.0.upgrade() {
            Some(inner) => EventBus { inner }.emit(kind, context, payload),
            None => Ok(()),
        }
    }

    pub(crate) fn same_as(&self, other: &WeakBus) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

fn validate(event: &str) -> Result<()> {
    if event.trim().is_empty() {
        return Err(TreeError::invalid("event name must not be empty"));
    }
    Ok(())
}
