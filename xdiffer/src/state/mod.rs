//! Shared UI state of a comparison view.
//!
//! `UiState` is created once by the composition root of a view and handed
//! to every component that needs it (usually behind an `Rc`). It holds the
//! changes the user has applied and the diff node currently selected. Both
//! are observable; subscribers run synchronously inside the mutating call.
//!
//! The state is single-threaded by construction and is not `Send`.
//!
//! The display-mode constants enumerate the modes a view can be in. Which
//! mode is active, and how it changes, is up to the view.

mod edits;
mod observable;

pub use edits::{AppliedEdits, EditEvent};
pub use observable::{Observable, Subscription};

use log::trace;

use crate::diff_tree::DiffNodeHandle;
use crate::error::Error;

/// Editing the documents.
pub const STATE_EDIT: u8 = 0;
/// Viewing the diff of the documents.
pub const STATE_COMPARE: u8 = 1;
/// Previewing the result of the applied edits.
pub const STATE_PREVIEW: u8 = 2;

/// Typed form of the display-mode constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    Edit,
    Compare,
    Preview,
}

impl From<DisplayMode> for u8 {
    fn from(mode: DisplayMode) -> u8 {
        match mode {
            DisplayMode::Edit => STATE_EDIT,
            DisplayMode::Compare => STATE_COMPARE,
            DisplayMode::Preview => STATE_PREVIEW,
        }
    }
}

impl TryFrom<u8> for DisplayMode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            STATE_EDIT => Ok(DisplayMode::Edit),
            STATE_COMPARE => Ok(DisplayMode::Compare),
            STATE_PREVIEW => Ok(DisplayMode::Preview),
            other => Err(Error::InvalidDisplayMode(other)),
        }
    }
}

/// State shared between the components of one comparison view.
#[derive(Debug, Default)]
pub struct UiState {
    applied_edits: AppliedEdits,
    current_diff_node: Observable<Option<DiffNodeHandle>>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The changes applied so far. The map is mutated directly.
    pub fn applied_edits(&self) -> &AppliedEdits {
        &self.applied_edits
    }

    /// Returns the selected diff node, if any.
    pub fn current_diff_node(&self) -> Option<DiffNodeHandle> {
        self.current_diff_node.get()
    }

    /// Replaces the selected diff node. The handle is not validated against
    /// any tree.
    pub fn set_current_diff_node(&self, node: Option<DiffNodeHandle>) {
        trace!(
            "current diff node: {}",
            node.as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "none".to_string())
        );
        self.current_diff_node.set(node);
    }

    /// Calls `callback` on every selection change.
    pub fn subscribe_current_diff_node(
        &self,
        callback: impl Fn(&Option<DiffNodeHandle>) + 'static,
    ) -> Subscription {
        self.current_diff_node.subscribe(callback)
    }

    pub fn unsubscribe_current_diff_node(&self, subscription: Subscription) -> bool {
        self.current_diff_node.unsubscribe(subscription)
    }
}
