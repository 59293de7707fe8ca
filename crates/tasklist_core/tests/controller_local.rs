use tasklist_core::{
    Feedback, Gesture, ItemId, LocalItemStore, MemorySlot, Phase, Row, SortOrder,
    TaskController, ViewFilter, EMPTY_EDIT_ALERT, EMPTY_LIST_MESSAGE,
};

type LocalController = TaskController<LocalItemStore<MemorySlot>>;

fn controller() -> LocalController {
    TaskController::local(LocalItemStore::open(MemorySlot::new()).unwrap()).unwrap()
}

fn id_of(controller: &LocalController, text: &str) -> ItemId {
    controller
        .state()
        .items
        .iter()
        .find(|item| item.text == text)
        .map(|item| item.id.clone())
        .unwrap()
}

#[test]
fn starts_ready_with_placeholder_row() {
    let controller = controller();
    assert_eq!(controller.state().phase, Phase::Ready);

    let view = controller.view();
    assert!(view.entry_visible);
    assert!(!view.auth_form_visible);
    assert!(!view.sort_selector_visible);
    assert_eq!(view.rows, vec![Row::Placeholder(EMPTY_LIST_MESSAGE)]);
}

#[test]
fn add_appends_one_incomplete_row() {
    let mut controller = controller();
    assert_eq!(controller.add("Buy milk"), Feedback::Applied);
    assert_eq!(controller.add("  Walk dog "), Feedback::Applied);

    let view = controller.view();
    assert_eq!(view.texts(), vec!["Buy milk", "Walk dog"]);
    assert!(view.item_rows().all(|row| !row.completed));
}

#[test]
fn blank_add_is_a_silent_noop() {
    let mut controller = controller();
    controller.add("keep");
    let before = controller.view();

    assert_eq!(controller.add(""), Feedback::Ignored);
    assert_eq!(controller.add("   "), Feedback::Ignored);
    assert_eq!(controller.view(), before);
    assert_eq!(controller.store().len(), 1);
}

#[test]
fn toggle_twice_restores_completion() {
    let mut controller = controller();
    controller.add("Buy milk");
    let id = id_of(&controller, "Buy milk");

    controller.toggle(&id);
    assert!(controller.view().item_rows().next().unwrap().completed);
    controller.toggle(&id);
    assert!(!controller.view().item_rows().next().unwrap().completed);
}

#[test]
fn delete_removes_item_and_unknown_id_only_logs() {
    let mut controller = controller();
    controller.add("a");
    controller.add("b");
    let a = id_of(&controller, "a");

    assert_eq!(controller.delete(&a), Feedback::Applied);
    assert_eq!(controller.view().texts(), vec!["b"]);

    let feedback = controller.delete(&a);
    assert!(matches!(feedback, Feedback::Console(_)), "{feedback:?}");
    assert_eq!(controller.view().texts(), vec!["b"]);

    let b = id_of(&controller, "b");
    controller.delete(&b);
    assert!(controller.view().shows_placeholder());
}

#[test]
fn empty_edit_alerts_and_keeps_editor_open() {
    let mut controller = controller();
    controller.add("original");
    let id = id_of(&controller, "original");

    assert_eq!(controller.begin_edit(&id), Feedback::Applied);
    assert_eq!(
        controller.commit_edit(&id, "   "),
        Feedback::Alert(EMPTY_EDIT_ALERT.to_string())
    );

    let view = controller.view();
    let row = view.item_rows().next().unwrap();
    assert_eq!(row.text, "original");
    assert_eq!(row.editing.as_deref(), Some("original"));
}

#[test]
fn edit_changes_only_text() {
    let mut controller = controller();
    controller.add("first");
    controller.add("second");
    let id = id_of(&controller, "first");
    controller.toggle(&id);
    let before = controller.state().items[0].clone();

    controller.begin_edit(&id);
    assert_eq!(controller.commit_edit(&id, " renamed "), Feedback::Applied);

    let after = controller.state().items[0].clone();
    assert_eq!(after.id, before.id);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.completed);
    assert_eq!(after.text, "renamed");
    assert_eq!(controller.view().texts(), vec!["renamed", "second"]);
    assert!(controller.state().view.editing.is_none());
}

#[test]
fn only_one_item_is_edited_at_a_time() {
    let mut controller = controller();
    controller.add("a");
    controller.add("b");
    let a = id_of(&controller, "a");
    let b = id_of(&controller, "b");

    controller.begin_edit(&a);
    controller.begin_edit(&b);
    let editing = controller
        .view()
        .item_rows()
        .filter(|row| row.editing.is_some())
        .map(|row| row.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(editing, vec![b.clone()]);

    assert_eq!(controller.commit_edit(&a, "stale"), Feedback::Ignored);
    assert_eq!(controller.cancel_edit(), Feedback::Applied);
    assert_eq!(controller.cancel_edit(), Feedback::Ignored);
}

#[test]
fn filters_select_subsets_and_all_restores() {
    let mut controller = controller();
    controller.add("Buy milk");
    controller.add("Walk dog");
    let milk = id_of(&controller, "Buy milk");
    controller.toggle(&milk);

    controller.set_filter(ViewFilter::Active);
    assert_eq!(controller.view().texts(), vec!["Walk dog"]);

    controller.set_filter(ViewFilter::Completed);
    let view = controller.view();
    assert_eq!(view.texts(), vec!["Buy milk"]);
    assert!(view.item_rows().all(|row| row.completed));

    controller.set_filter(ViewFilter::All);
    assert_eq!(controller.view().texts(), vec!["Buy milk", "Walk dog"]);
}

#[test]
fn toggle_under_filter_removes_row_immediately() {
    let mut controller = controller();
    controller.add("a");
    controller.set_filter(ViewFilter::Active);
    let a = id_of(&controller, "a");

    controller.toggle(&a);
    assert!(controller.view().shows_placeholder());
}

#[test]
fn add_under_completed_filter_persists_without_showing() {
    let mut controller = controller();
    controller.set_filter(ViewFilter::Completed);

    assert_eq!(controller.add("hidden"), Feedback::Applied);
    assert!(controller.view().shows_placeholder());
    assert_eq!(controller.store().len(), 1);

    controller.set_filter(ViewFilter::All);
    assert_eq!(controller.view().texts(), vec!["hidden"]);
}

#[test]
fn local_variant_has_no_sort_or_auth() {
    let mut controller = controller();
    assert_eq!(controller.set_sort(SortOrder::OldestFirst), Feedback::Ignored);
    assert_eq!(controller.sign_in("a@example.com", "secret1"), Feedback::Ignored);
    assert_eq!(controller.sign_out(), Feedback::Ignored);
    assert_eq!(controller.on_session_changed(None), Feedback::Ignored);
    assert_eq!(controller.state().phase, Phase::Ready);
}

#[test]
fn dispatch_routes_gestures() {
    let mut controller = controller();
    controller.dispatch(Gesture::Add("Buy milk".to_string()));
    let id = id_of(&controller, "Buy milk");
    controller.dispatch(Gesture::Toggle(id.clone()));
    controller.dispatch(Gesture::BeginEdit(id.clone()));
    controller.dispatch(Gesture::CommitEdit {
        id: id.clone(),
        text: "Buy oat milk".to_string(),
    });
    controller.dispatch(Gesture::SetFilter(ViewFilter::Completed));

    assert_eq!(controller.view().texts(), vec!["Buy oat milk"]);
    controller.dispatch(Gesture::Delete(id));
    assert!(controller.view().shows_placeholder());
}

#[test]
fn reopening_the_slot_restores_items() {
    let mut controller = controller();
    controller.add("persist me");
    let id = id_of(&controller, "persist me");
    controller.toggle(&id);

    let slot = controller.into_store().into_slot();
    let reopened = TaskController::local(LocalItemStore::open(slot).unwrap()).unwrap();
    let view = reopened.view();
    assert_eq!(view.texts(), vec!["persist me"]);
    assert!(view.item_rows().next().unwrap().completed);
    assert_eq!(reopened.state().view.filter, ViewFilter::All);
}
