//! Explicit application state passed to render and mutated by gestures.

use crate::model::item::{Item, ItemId};
use crate::model::session::{Identity, OwnerId};
use crate::model::view::{SortOrder, ViewState};

/// Persistence flavour the controller was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Single implicit owner, slot storage, no sort selector.
    Local,
    /// Authenticated owners, document storage, sortable.
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Remote variant with no active identity.
    Unauthenticated,
    Authenticated(Identity),
    /// Local variant; entered at startup and never left.
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub variant: Variant,
    pub phase: Phase,
    pub view: ViewState,
    /// Displayed items: the last query result under the active filter/sort.
    pub items: Vec<Item>,
    /// Set when the collection of a new session could not be loaded; `items`
    /// is then unknown rather than empty. Cleared by the next successful load.
    pub load_error: Option<String>,
}

impl AppState {
    pub fn local() -> Self {
        Self {
            variant: Variant::Local,
            phase: Phase::Ready,
            view: ViewState::default(),
            items: Vec::new(),
            load_error: None,
        }
    }

    pub fn remote() -> Self {
        Self {
            variant: Variant::Remote,
            phase: Phase::Unauthenticated,
            view: ViewState::default(),
            items: Vec::new(),
            load_error: None,
        }
    }

    /// Owner whose collection is visible, if any.
    pub fn owner(&self) -> Option<OwnerId> {
        match &self.phase {
            Phase::Unauthenticated => None,
            Phase::Authenticated(identity) => Some(identity.uid.clone()),
            Phase::Ready => Some(OwnerId::local()),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.phase {
            Phase::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    /// Sort key sent to the store; the local variant keeps storage order.
    pub fn effective_sort(&self) -> Option<SortOrder> {
        match self.variant {
            Variant::Local => None,
            Variant::Remote => Some(self.view.sort),
        }
    }

    pub fn find_item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Drops the edit state when its item is no longer displayed.
    pub fn prune_editing(&mut self) {
        let dangling = self
            .view
            .editing
            .as_ref()
            .is_some_and(|edit| self.find_item(&edit.id).is_none());
        if dangling {
            self.view.editing = None;
        }
    }
}
