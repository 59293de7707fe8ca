//! Pure rendering of `AppState` into a view model.

use crate::controller::state::{AppState, Phase, Variant};
use crate::model::item::{Item, ItemId};
use crate::model::view::{SortOrder, ViewFilter};

pub const EMPTY_LIST_MESSAGE: &str = "No tasks.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub id: ItemId,
    pub text: String,
    pub completed: bool,
    /// Input value when this row shows the inline editor.
    pub editing: Option<String>,
}

impl ItemRow {
    /// Style class for the row element.
    pub fn class_name(&self) -> &'static str {
        if self.completed {
            "todo-item completed"
        } else {
            "todo-item"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Item(ItemRow),
    Placeholder(&'static str),
}

impl Row {
    pub fn as_item(&self) -> Option<&ItemRow> {
        match self {
            Self::Item(row) => Some(row),
            Self::Placeholder(_) => None,
        }
    }
}

/// Everything a shell needs to paint one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub signed_in_email: Option<String>,
    pub auth_form_visible: bool,
    pub entry_visible: bool,
    pub sort_selector_visible: bool,
    pub filter: ViewFilter,
    pub sort: Option<SortOrder>,
    pub rows: Vec<Row>,
    /// Blocking message shown instead of the list while it is unknown.
    pub load_error: Option<String>,
}

impl ViewModel {
    pub fn item_rows(&self) -> impl Iterator<Item = &ItemRow> {
        self.rows.iter().filter_map(Row::as_item)
    }

    /// Texts of the displayed item rows, in display order.
    pub fn texts(&self) -> Vec<&str> {
        self.item_rows().map(|row| row.text.as_str()).collect()
    }

    pub fn shows_placeholder(&self) -> bool {
        matches!(self.rows.as_slice(), [Row::Placeholder(_)])
    }
}

pub fn render(state: &AppState) -> ViewModel {
    let signed_in = !matches!(state.phase, Phase::Unauthenticated);
    let list_known = signed_in && state.load_error.is_none();
    let rows = if list_known {
        render_rows(&state.items, state)
    } else {
        Vec::new()
    };

    ViewModel {
        signed_in_email: state.identity().map(|identity| identity.email.clone()),
        auth_form_visible: !signed_in,
        entry_visible: list_known,
        sort_selector_visible: signed_in && state.variant == Variant::Remote,
        filter: state.view.filter,
        sort: state.effective_sort(),
        rows,
        load_error: state.load_error.clone().filter(|_| signed_in),
    }
}

/// One row per item in the given order; a lone placeholder when empty.
pub fn render_rows(items: &[Item], state: &AppState) -> Vec<Row> {
    if items.is_empty() {
        return vec![Row::Placeholder(EMPTY_LIST_MESSAGE)];
    }

    items
        .iter()
        .map(|item| {
            let editing = state
                .view
                .editing
                .as_ref()
                .filter(|edit| edit.id == item.id)
                .map(|edit| edit.draft.clone());
            Row::Item(ItemRow {
                id: item.id.clone(),
                text: item.text.clone(),
                completed: item.completed,
                editing,
            })
        })
        .collect()
}
