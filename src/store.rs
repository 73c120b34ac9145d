use std::fmt;

use tracing::{debug, info, warn};

use crate::error::{DraftError, Result};
use crate::model::InvoiceDraft;
use crate::mutation::DraftAction;

type Listener = Box<dyn FnMut(Option<&InvoiceDraft>)>;

/// Holds the one invoice draft being edited.
///
/// The store is an ordinary owned value: the front end creates one per
/// editing session and passes it by reference. Writes go through `&mut self`,
/// so edits are applied strictly in the order they are dispatched.
#[derive(Default)]
pub struct DraftStore {
    current: Option<InvoiceDraft>,
    revision: u64,
    listeners: Vec<Listener>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draft(draft: InvoiceDraft) -> Self {
        let mut store = Self::new();
        store.set_current(draft);
        store
    }

    /// Replaces the whole draft, discarding any unsaved edits.
    pub fn set_current(&mut self, draft: InvoiceDraft) {
        info!(number = %draft.number, items = draft.line_items.len(), "loaded draft");
        self.current = Some(draft);
        self.changed();
    }

    pub fn current(&self) -> Option<&InvoiceDraft> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        if self.current.take().is_some() {
            debug!("cleared draft");
            self.changed();
        }
    }

    /// Applies `action` to the current draft. On error the draft is left as it was.
    pub fn dispatch(&mut self, action: DraftAction) -> Result<&InvoiceDraft> {
        let draft = self.current.as_ref().ok_or(DraftError::NoDraftLoaded)?;
        match action.apply(draft) {
            Ok(next) => {
                debug!(action = action.name(), items = next.line_items.len(), "applied edit");
                self.current = Some(next);
                self.changed();
                self.current.as_ref().ok_or(DraftError::NoDraftLoaded)
            }
            Err(e) => {
                warn!(action = action.name(), error = %e, "rejected edit");
                Err(e.into())
            }
        }
    }

    /// Number of replacements so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers a callback run after every change to the draft.
    pub fn subscribe(&mut self, listener: impl FnMut(Option<&InvoiceDraft>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn changed(&mut self) {
        self.revision += 1;
        let current = self.current.as_ref();
        for listener in &mut self.listeners {
            listener(current);
        }
    }
}

impl fmt::Debug for DraftStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraftStore")
            .field("current", &self.current)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
