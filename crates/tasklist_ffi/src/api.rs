//! FFI use-case API for the UI shell.
//!
//! # Responsibility
//! - Hold the one process-wide controller the shell talks to.
//! - Forward gestures and return a fresh view snapshot after each one.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Gestures are serialized behind one lock; each runs to completion.
//! - Every gesture response carries the view to repaint.

use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_controller,
    AppConfig, AppController, Feedback, ItemId, Row, SortOrder, StorageConfig, ViewFilter,
    ViewModel, DEFAULT_SLOT_KEY,
};

const DEFAULT_DB_FILE_NAME: &str = "tasklist.sqlite3";
const DB_PATH_ENV: &str = "TASKLIST_DB_PATH";

static APP: Mutex<Option<AppController>> = Mutex::new(None);

/// One rendered task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// Row style class (`todo-item` plus `completed` when done).
    pub class_name: String,
    /// Inline editor value when this row is being edited.
    pub editing_draft: Option<String>,
}

/// Frame snapshot for the shell to paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub signed_in_email: Option<String>,
    pub auth_form_visible: bool,
    pub entry_visible: bool,
    pub sort_selector_visible: bool,
    pub filter: String,
    pub sort: Option<String>,
    pub rows: Vec<TaskRow>,
    /// Set instead of `rows` when the visible list is empty.
    pub placeholder: Option<String>,
    /// Set while the signed-in collection could not be loaded.
    pub load_error: Option<String>,
}

/// Envelope returned by every gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResponse {
    /// False when the gesture failed or the app is not open.
    pub ok: bool,
    /// Message the shell must show as a blocking alert.
    pub alert: Option<String>,
    /// Diagnostic text; empty on plain success.
    pub message: String,
    pub view: Option<TaskView>,
}

impl TaskResponse {
    fn not_open() -> Self {
        Self {
            ok: false,
            alert: None,
            message: "task list is not open".to_string(),
            view: None,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            alert: None,
            message: message.into(),
            view: None,
        }
    }

    fn from_feedback(feedback: Feedback, view: ViewModel) -> Self {
        let view = Some(to_task_view(view));
        match feedback {
            Feedback::Applied => Self {
                ok: true,
                alert: None,
                message: String::new(),
                view,
            },
            Feedback::Ignored => Self {
                ok: true,
                alert: None,
                message: "ignored".to_string(),
                view,
            },
            Feedback::Alert(message) => Self {
                ok: false,
                alert: Some(message.clone()),
                message,
                view,
            },
            Feedback::Console(message) => Self {
                ok: false,
                alert: None,
                message,
                view,
            },
        }
    }
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Starts rolling file logs. Returns an empty string on success.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`.
/// - Reconfiguration returns an error message instead of switching.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opens the no-auth variant storing its slot inside `dir`.
#[flutter_rust_bridge::frb(sync)]
pub fn open_local(dir: String) -> TaskResponse {
    let dir = dir.trim();
    if dir.is_empty() {
        return TaskResponse::failure("open_local failed: dir cannot be empty");
    }
    open_with(&StorageConfig::Local {
        dir: PathBuf::from(dir),
        key: DEFAULT_SLOT_KEY.to_string(),
    })
}

/// Opens the authenticated variant.
///
/// `db_path = None` falls back to `TASKLIST_DB_PATH`, then to a file in the
/// system temp directory.
#[flutter_rust_bridge::frb(sync)]
pub fn open_remote(db_path: Option<String>) -> TaskResponse {
    open_with(&StorageConfig::Remote {
        db_path: resolve_db_path(db_path),
    })
}

/// Opens the variant described by a JSON config file, starting logging when
/// the config names a log directory.
#[flutter_rust_bridge::frb(sync)]
pub fn open_from_config(path: String) -> TaskResponse {
    let config = match AppConfig::load(path.trim()) {
        Ok(config) => config,
        Err(err) => return TaskResponse::failure(format!("open_from_config failed: {err}")),
    };

    if let Some(log_dir) = config.log_dir.as_ref().and_then(|dir| dir.to_str()) {
        if let Err(err) = init_logging_inner(config.effective_log_level(), log_dir) {
            return TaskResponse::failure(format!("open_from_config failed: {err}"));
        }
    }
    open_with(&config.storage)
}

/// Drops the open controller. Returns whether one was open.
#[flutter_rust_bridge::frb(sync)]
pub fn close_app() -> bool {
    lock_app().take().is_some()
}

#[flutter_rust_bridge::frb(sync)]
pub fn current_view() -> TaskResponse {
    with_app(|_| Feedback::Applied)
}

#[flutter_rust_bridge::frb(sync)]
pub fn sign_up(email: String, password: String) -> TaskResponse {
    with_app(|app| app.sign_up(&email, &password))
}

#[flutter_rust_bridge::frb(sync)]
pub fn sign_in(email: String, password: String) -> TaskResponse {
    with_app(|app| app.sign_in(&email, &password))
}

#[flutter_rust_bridge::frb(sync)]
pub fn sign_out() -> TaskResponse {
    with_app(|app| app.sign_out())
}

#[flutter_rust_bridge::frb(sync)]
pub fn add_task(text: String) -> TaskResponse {
    with_app(|app| app.add(&text))
}

#[flutter_rust_bridge::frb(sync)]
pub fn toggle_task(id: String) -> TaskResponse {
    with_app(|app| app.toggle(&ItemId::new(id)))
}

#[flutter_rust_bridge::frb(sync)]
pub fn begin_edit(id: String) -> TaskResponse {
    with_app(|app| app.begin_edit(&ItemId::new(id)))
}

/// Saves an inline edit; the shell calls this on the save button or Enter.
#[flutter_rust_bridge::frb(sync)]
pub fn commit_edit(id: String, text: String) -> TaskResponse {
    with_app(|app| app.commit_edit(&ItemId::new(id), &text))
}

#[flutter_rust_bridge::frb(sync)]
pub fn cancel_edit() -> TaskResponse {
    with_app(|app| app.cancel_edit())
}

#[flutter_rust_bridge::frb(sync)]
pub fn delete_task(id: String) -> TaskResponse {
    with_app(|app| app.delete(&ItemId::new(id)))
}

/// Re-queries the visible collection, e.g. after a failed load.
#[flutter_rust_bridge::frb(sync)]
pub fn refresh_tasks() -> TaskResponse {
    with_app(|app| app.refresh())
}

/// Accepts `all`, `active`/`pending`, or `completed`.
#[flutter_rust_bridge::frb(sync)]
pub fn set_filter(value: String) -> TaskResponse {
    let Some(filter) = ViewFilter::parse(&value) else {
        return with_app(|_| Feedback::Console(format!("unknown filter `{}`", value.trim())));
    };
    with_app(|app| app.set_filter(filter))
}

/// Accepts `newest`/`desc` or `oldest`/`asc`.
#[flutter_rust_bridge::frb(sync)]
pub fn set_sort(value: String) -> TaskResponse {
    let Some(sort) = SortOrder::parse(&value) else {
        return with_app(|_| Feedback::Console(format!("unknown sort `{}`", value.trim())));
    };
    with_app(|app| app.set_sort(sort))
}

fn open_with(storage: &StorageConfig) -> TaskResponse {
    match open_controller(storage) {
        Ok(controller) => {
            let view = controller.view();
            *lock_app() = Some(controller);
            open_response(view)
        }
        Err(err) => {
            warn!("event=ffi_open module=ffi status=error error={err}");
            TaskResponse::failure(format!("open failed: {err}"))
        }
    }
}

/// A resumed session may open with its collection unloaded; that is
/// reported as an alert.
fn open_response(view: ViewModel) -> TaskResponse {
    let feedback = view
        .load_error
        .clone()
        .map_or(Feedback::Applied, Feedback::Alert);
    TaskResponse::from_feedback(feedback, view)
}

fn with_app(gesture: impl FnOnce(&mut AppController) -> Feedback) -> TaskResponse {
    let mut guard = lock_app();
    let Some(app) = guard.as_mut() else {
        return TaskResponse::not_open();
    };
    let feedback = gesture(app);
    TaskResponse::from_feedback(feedback, app.view())
}

/// Recovers the controller from a poisoned lock; every gesture leaves it
/// consistent on failure.
fn lock_app() -> MutexGuard<'static, Option<AppController>> {
    APP.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn resolve_db_path(db_path: Option<String>) -> PathBuf {
    let explicit = db_path
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty());
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

fn to_task_view(view: ViewModel) -> TaskView {
    let mut rows = Vec::with_capacity(view.rows.len());
    let mut placeholder = None;
    for row in view.rows {
        match row {
            Row::Item(row) => rows.push(TaskRow {
                class_name: row.class_name().to_string(),
                id: row.id.to_string(),
                text: row.text,
                completed: row.completed,
                editing_draft: row.editing,
            }),
            Row::Placeholder(message) => placeholder = Some(message.to_string()),
        }
    }

    TaskView {
        signed_in_email: view.signed_in_email,
        auth_form_visible: view.auth_form_visible,
        entry_visible: view.entry_visible,
        sort_selector_visible: view.sort_selector_visible,
        filter: view.filter.as_str().to_string(),
        sort: view.sort.map(|sort| sort.as_str().to_string()),
        rows,
        placeholder,
        load_error: view.load_error,
    }
}
