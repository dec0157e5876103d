//! Prompt dialogs provided by the embedding view
//!
//! The core never draws a dialog. It hands a [`PromptRequest`] and a one-shot
//! [`PromptReply`] to the [`PromptHost`] and carries on; the host answers
//! whenever the user does.

use crate::error::Result;
use log::{debug, warn};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// What the host should ask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    /// Label shown next to the input, e.g. `New file name:`
    pub message: String,
    /// Pre-filled, pre-selected input value
    pub initial_value: String,
}

/// How the user closed a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Cancelled,
    Submitted(String),
}

/// One-shot continuation for a prompt
///
/// Answering consumes the reply, so a prompt is resolved at most once.
/// Dropping it unanswered is the same as never closing the dialog.
pub struct PromptReply(Box<dyn FnOnce(PromptOutcome) -> Result<()>>);

impl PromptReply {
    pub fn new<F>(reply: F) -> Self
    where
        F: FnOnce(PromptOutcome) -> Result<()> + 'static,
    {
        PromptReply(Box::new(reply))
    }

    /// Deliver the outcome and run the workflow waiting on it
    ///
    /// Returns whatever the workflow returned, e.g. `DuplicateName` when the
    /// submitted name is taken.
    pub fn resolve(self, outcome: PromptOutcome) -> Result<()> {
        (self.0)(outcome)
    }

    pub fn submit(self, value: impl Into<String>) -> Result<()> {
        self.resolve(PromptOutcome::Submitted(value.into()))
    }

    pub fn cancel(self) -> Result<()> {
        self.resolve(PromptOutcome::Cancelled)
    }
}

impl fmt::Debug for PromptReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PromptReply")
    }
}

/// The host surface an [`Editor`](crate::Editor) is bound to
pub trait PromptHost {
    /// Show a prompt and resolve `reply` once the user answers
    fn prompt(&self, request: PromptRequest, reply: PromptReply);
}

impl<T: PromptHost + ?Sized> PromptHost for Rc<T> {
    fn prompt(&self, request: PromptRequest, reply: PromptReply) {
        (**self).prompt(request, reply)
    }
}

/// Host without any dialog surface: every prompt is cancelled immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl PromptHost for Headless {
    fn prompt(&self, request: PromptRequest, reply: PromptReply) {
        debug!("no prompt surface, cancelling `{}`", request.message);
        if let Err(err) = reply.cancel() {
            warn!("cancelled prompt `{}` failed: {}", request.message, err);
        }
    }
}

/// Host that parks prompts until the embedding UI gets to them
///
/// Share it with the editor through an `Rc` and drain it from the UI loop.
#[derive(Debug, Default)]
pub struct QueuedPrompts {
    pending: RefCell<VecDeque<(PromptRequest, PromptReply)>>,
}

impl QueuedPrompts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// The oldest unanswered request, left in the queue
    pub fn peek(&self) -> Option<PromptRequest> {
        self.pending.borrow().front().map(|(request, _)| request.clone())
    }

    /// Take the oldest unanswered prompt out of the queue
    pub fn pop(&self) -> Option<(PromptRequest, PromptReply)> {
        self.pending.borrow_mut().pop_front()
    }
}

impl PromptHost for QueuedPrompts {
    fn prompt(&self, request: PromptRequest, reply: PromptReply) {
        debug!("queued prompt `{}`", request.message);
        self.pending.borrow_mut().push_back((request, reply));
    }
}
