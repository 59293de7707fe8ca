//! Gesture handling for the task list.
//!
//! # Responsibility
//! - Validate gesture input before any collaborator call.
//! - Issue at most one store or identity call per gesture.
//! - Re-derive displayed items after every successful mutation.
//!
//! # Invariants
//! - Failed collaborator calls never change `AppState`; the one exception is
//!   a failed load after a session change, kept as `AppState::load_error`.
//! - Session transitions are handled only from subscription events.
//! - Item text and credentials never reach the logs.

use crate::controller::render::{render, ViewModel};
use crate::controller::state::{AppState, Phase, Variant};
use crate::identity::provider::{AuthResult, IdentityProvider};
use crate::model::item::{ItemId, ItemPatch, NewItem};
use crate::model::session::{Identity, SessionChanged};
use crate::model::view::{EditState, SortOrder, ViewFilter};
use crate::repo::item_repo::{ItemListQuery, ItemStore, StoreResult};
use log::{debug, info, warn};
use std::sync::mpsc::{channel, Receiver};

pub const EMPTY_EDIT_ALERT: &str = "Task text cannot be empty.";

/// User-visible result of one gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// State changed (or was re-derived) successfully.
    Applied,
    /// Rejected locally without any collaborator call; nothing to show.
    Ignored,
    /// Blocking message for the user.
    Alert(String),
    /// Diagnostic-only notice; the UI stays silent.
    Console(String),
}

impl Feedback {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Alert(message) | Self::Console(message) => Some(message),
            Self::Applied | Self::Ignored => None,
        }
    }
}

/// Shell-originated events, for hosts that forward gestures generically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    Add(String),
    Toggle(ItemId),
    BeginEdit(ItemId),
    CommitEdit { id: ItemId, text: String },
    CancelEdit,
    Delete(ItemId),
    Refresh,
    SetFilter(ViewFilter),
    SetSort(SortOrder),
    SignUp { email: String, password: String },
    SignIn { email: String, password: String },
    SignOut,
}

pub type BoxedIdentityProvider = Box<dyn IdentityProvider + Send>;

struct SessionLink {
    provider: BoxedIdentityProvider,
    events: Receiver<SessionChanged>,
}

/// Task list state machine over an item store and an optional identity
/// provider.
pub struct TaskController<S: ItemStore> {
    state: AppState,
    store: S,
    session: Option<SessionLink>,
}

impl<S: ItemStore> TaskController<S> {
    /// Builds the single-state local variant and loads the stored items.
    pub fn local(store: S) -> StoreResult<Self> {
        let mut controller = Self {
            state: AppState::local(),
            store,
            session: None,
        };
        controller.reload()?;
        info!(
            "event=controller_start module=controller status=ok variant=local item_count={}",
            controller.state.items.len()
        );
        Ok(controller)
    }

    /// Builds the remote variant and registers the one session subscription.
    ///
    /// The provider's immediate notification decides the starting phase. A
    /// resumed session whose items fail to load starts with
    /// `AppState::load_error` set.
    pub fn remote(mut provider: BoxedIdentityProvider, store: S) -> Self {
        let (sender, events) = channel();
        provider.subscribe(sender);

        let mut controller = Self {
            state: AppState::remote(),
            store,
            session: Some(SessionLink { provider, events }),
        };
        let feedback = controller.pump();
        info!(
            "event=controller_start module=controller status={} variant=remote signed_in={}",
            status_label(&feedback),
            controller.state.identity().is_some()
        );
        controller
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tears the controller down, handing back the item store.
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn view(&self) -> ViewModel {
        render(&self.state)
    }

    /// Handles every queued session notification in arrival order.
    ///
    /// Returns the feedback of the last transition, or `Ignored` when the
    /// queue was empty.
    pub fn pump(&mut self) -> Feedback {
        let mut pending = Vec::new();
        if let Some(link) = &self.session {
            pending.extend(link.events.try_iter());
        }

        let mut feedback = Feedback::Ignored;
        for SessionChanged(identity) in pending {
            feedback = self.on_session_changed(identity);
        }
        feedback
    }

    /// Explicit session transition handler.
    ///
    /// Has no effect on the local variant.
    pub fn on_session_changed(&mut self, identity: Option<Identity>) -> Feedback {
        if self.state.variant == Variant::Local {
            return Feedback::Ignored;
        }

        self.state.view.editing = None;
        self.state.items.clear();
        self.state.load_error = None;
        match identity {
            Some(identity) => {
                self.state.phase = Phase::Authenticated(identity);
                match self.reload() {
                    Ok(()) => {
                        info!(
                            "event=session_changed module=controller status=ok phase=authenticated item_count={}",
                            self.state.items.len()
                        );
                        Feedback::Applied
                    }
                    Err(err) => {
                        warn!(
                            "event=session_changed module=controller status=error phase=authenticated error={err}"
                        );
                        let message = format!("Could not load tasks: {err}");
                        self.state.load_error = Some(message.clone());
                        Feedback::Alert(message)
                    }
                }
            }
            None => {
                self.state.phase = Phase::Unauthenticated;
                info!("event=session_changed module=controller status=ok phase=unauthenticated");
                Feedback::Applied
            }
        }
    }

    pub fn dispatch(&mut self, gesture: Gesture) -> Feedback {
        match gesture {
            Gesture::Add(text) => self.add(&text),
            Gesture::Toggle(id) => self.toggle(&id),
            Gesture::BeginEdit(id) => self.begin_edit(&id),
            Gesture::CommitEdit { id, text } => self.commit_edit(&id, &text),
            Gesture::CancelEdit => self.cancel_edit(),
            Gesture::Delete(id) => self.delete(&id),
            Gesture::Refresh => self.refresh(),
            Gesture::SetFilter(filter) => self.set_filter(filter),
            Gesture::SetSort(sort) => self.set_sort(sort),
            Gesture::SignUp { email, password } => self.sign_up(&email, &password),
            Gesture::SignIn { email, password } => self.sign_in(&email, &password),
            Gesture::SignOut => self.sign_out(),
        }
    }

    /// Adds an incomplete item. Empty input or no visible collection is a
    /// silent no-op.
    pub fn add(&mut self, text: &str) -> Feedback {
        let Some(owner) = self.state.owner() else {
            return Feedback::Ignored;
        };
        let Ok(item) = NewItem::parse(text) else {
            return Feedback::Ignored;
        };

        match self.store.add_item(&owner, &item) {
            Ok(id) => {
                debug!("event=gesture_add module=controller status=ok item_id={id}");
                self.settle()
            }
            Err(err) => {
                warn!("event=gesture_add module=controller status=error error={err}");
                Feedback::Alert(format!("Could not add task: {err}"))
            }
        }
    }

    /// Flips the completed flag of a displayed item.
    pub fn toggle(&mut self, id: &ItemId) -> Feedback {
        let Some(owner) = self.state.owner() else {
            return Feedback::Ignored;
        };
        let Some(current) = self.state.find_item(id).map(|item| item.completed) else {
            warn!("event=gesture_toggle module=controller status=error error_code=not_displayed item_id={id}");
            return Feedback::Console(format!("item not found: {id}"));
        };

        match self
            .store
            .update_item(&owner, id, &ItemPatch::completed(!current))
        {
            Ok(()) => {
                debug!("event=gesture_toggle module=controller status=ok item_id={id} completed={}", !current);
                self.settle()
            }
            Err(err) => {
                warn!("event=gesture_toggle module=controller status=error item_id={id} error={err}");
                Feedback::Console(format!("Could not update task: {err}"))
            }
        }
    }

    /// Puts one displayed item into inline edit, replacing any other edit.
    pub fn begin_edit(&mut self, id: &ItemId) -> Feedback {
        if self.state.owner().is_none() {
            return Feedback::Ignored;
        }
        let Some(item) = self.state.find_item(id) else {
            return Feedback::Console(format!("item not found: {id}"));
        };

        self.state.view.editing = Some(EditState {
            id: item.id.clone(),
            draft: item.text.clone(),
        });
        Feedback::Applied
    }

    /// Saves the edited text. Empty input alerts and keeps the editor open.
    pub fn commit_edit(&mut self, id: &ItemId, text: &str) -> Feedback {
        let Some(owner) = self.state.owner() else {
            return Feedback::Ignored;
        };
        let is_editing = self
            .state
            .view
            .editing
            .as_ref()
            .is_some_and(|edit| &edit.id == id);
        if !is_editing {
            return Feedback::Ignored;
        }

        let Ok(patch) = ItemPatch::text(text) else {
            return Feedback::Alert(EMPTY_EDIT_ALERT.to_string());
        };

        match self.store.update_item(&owner, id, &patch) {
            Ok(()) => {
                debug!("event=gesture_edit module=controller status=ok item_id={id}");
                self.state.view.editing = None;
                self.settle()
            }
            Err(err) => {
                warn!("event=gesture_edit module=controller status=error item_id={id} error={err}");
                Feedback::Console(format!("Could not update task: {err}"))
            }
        }
    }

    pub fn cancel_edit(&mut self) -> Feedback {
        match self.state.view.editing.take() {
            Some(_) => Feedback::Applied,
            None => Feedback::Ignored,
        }
    }

    pub fn delete(&mut self, id: &ItemId) -> Feedback {
        let Some(owner) = self.state.owner() else {
            return Feedback::Ignored;
        };

        match self.store.delete_item(&owner, id) {
            Ok(()) => {
                debug!("event=gesture_delete module=controller status=ok item_id={id}");
                self.settle()
            }
            Err(err) => {
                warn!("event=gesture_delete module=controller status=error item_id={id} error={err}");
                Feedback::Console(format!("Could not delete task: {err}"))
            }
        }
    }

    /// Re-queries the visible collection, e.g. after a failed session load.
    pub fn refresh(&mut self) -> Feedback {
        if self.state.owner().is_none() {
            return Feedback::Ignored;
        }
        match self.reload() {
            Ok(()) => Feedback::Applied,
            Err(err) => {
                warn!("event=refresh module=controller status=error error={err}");
                let message = format!("Could not load tasks: {err}");
                if self.state.load_error.is_some() {
                    self.state.load_error = Some(message.clone());
                    Feedback::Alert(message)
                } else {
                    Feedback::Console(message)
                }
            }
        }
    }

    pub fn set_filter(&mut self, filter: ViewFilter) -> Feedback {
        self.state.view.filter = filter;
        debug!("event=set_filter module=controller status=ok filter={}", filter.as_str());
        self.settle()
    }

    /// Changes creation-time ordering. The local variant has no sort.
    pub fn set_sort(&mut self, sort: SortOrder) -> Feedback {
        if self.state.variant == Variant::Local {
            return Feedback::Ignored;
        }
        self.state.view.sort = sort;
        debug!("event=set_sort module=controller status=ok sort={}", sort.as_str());
        self.settle()
    }

    pub fn sign_up(&mut self, email: &str, password: &str) -> Feedback {
        self.with_provider("sign_up", |provider| {
            provider.sign_up(email, password).map(|_| ())
        })
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> Feedback {
        self.with_provider("sign_in", |provider| {
            provider.sign_in(email, password).map(|_| ())
        })
    }

    pub fn sign_out(&mut self) -> Feedback {
        self.with_provider("sign_out", |provider| provider.sign_out())
    }

    fn with_provider(
        &mut self,
        action: &'static str,
        call: impl FnOnce(&mut dyn IdentityProvider) -> AuthResult<()>,
    ) -> Feedback {
        let Some(link) = self.session.as_mut() else {
            return Feedback::Ignored;
        };

        match call(link.provider.as_mut()) {
            Ok(()) => {
                let feedback = self.pump();
                match feedback {
                    // Provider accepted but produced no transition.
                    Feedback::Ignored => Feedback::Applied,
                    other => other,
                }
            }
            Err(err) => {
                warn!("event=auth_{action} module=controller status=error error={err}");
                Feedback::Alert(err.to_string())
            }
        }
    }

    /// Re-derives displayed items after a successful mutation or view change.
    fn settle(&mut self) -> Feedback {
        match self.reload() {
            Ok(()) => Feedback::Applied,
            Err(err) => {
                warn!("event=reload module=controller status=error error={err}");
                Feedback::Console(format!("Could not reload tasks: {err}"))
            }
        }
    }

    fn reload(&mut self) -> StoreResult<()> {
        let Some(owner) = self.state.owner() else {
            self.state.items.clear();
            return Ok(());
        };
        let query = ItemListQuery::new(self.state.view.filter, self.state.effective_sort());
        self.state.items = self.store.list_items(&owner, &query)?;
        self.state.load_error = None;
        self.state.prune_editing();
        Ok(())
    }
}

fn status_label(feedback: &Feedback) -> &'static str {
    match feedback {
        Feedback::Applied | Feedback::Ignored => "ok",
        Feedback::Alert(_) | Feedback::Console(_) => "error",
    }
}
