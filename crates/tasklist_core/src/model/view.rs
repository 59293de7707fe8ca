//! Process-local view state.

use crate::model::item::ItemId;

/// Completion predicate selecting the displayed subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewFilter {
    #[default]
    All,
    Completed,
    Active,
}

impl ViewFilter {
    /// Parses shell-facing filter names.
    ///
    /// `pending` is accepted as an alias of `active`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "completed" => Some(Self::Completed),
            "active" | "pending" => Some(Self::Active),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Active => "active",
        }
    }

    /// Equality constraint on `completed`, or `None` for no restriction.
    pub fn completed_constraint(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Completed => Some(true),
            Self::Active => Some(false),
        }
    }

    pub fn matches(self, completed: bool) -> bool {
        self.completed_constraint()
            .map_or(true, |expected| expected == completed)
    }
}

/// Creation-time ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "newest" | "desc" => Some(Self::NewestFirst),
            "oldest" | "asc" => Some(Self::OldestFirst),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewestFirst => "newest",
            Self::OldestFirst => "oldest",
        }
    }
}

/// Inline edit in progress for exactly one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub id: ItemId,
    /// Input value shown in the row editor.
    pub draft: String,
}

/// Controller view state. Resets to defaults on reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub filter: ViewFilter,
    pub sort: SortOrder,
    pub editing: Option<EditState>,
}
