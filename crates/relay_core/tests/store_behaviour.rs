use relay_core::{Attachment, ItemResult, ItemStatus, ItemStore, PayloadRef};
use serde_json::json;

fn attachment(name: &str) -> Attachment {
    Attachment {
        display_name: name.to_string(),
        payload: PayloadRef::Text(String::new()),
    }
}

#[test]
fn rows_iterate_in_insertion_order() {
    let mut store = ItemStore::default();
    let _ = store.insert_pending(vec![attachment("z.pdf"), attachment("a.pdf")]);
    let _ = store.insert_pending(vec![attachment("m.pdf")]);

    let names: Vec<_> = store.iter().map(|record| record.display_name.clone()).collect();
    assert_eq!(names, vec!["z.pdf", "a.pdf", "m.pdf"]);
}

#[test]
fn removing_a_row_also_drops_its_selection() {
    let mut store = ItemStore::default();
    let ids = store.insert_pending(vec![attachment("a.pdf"), attachment("b.pdf")]);
    assert!(store.toggle_selected(ids[0]));
    assert!(store.toggle_selected(ids[1]));
    assert_eq!(store.selected_count(), 2);

    assert!(store.remove(ids[0]));
    assert_eq!(store.selected_count(), 1);
    assert!(!store.is_selected(ids[0]));
    assert_eq!(store.len(), 1);
}

#[test]
fn clearing_drops_rows_and_selection() {
    let mut store = ItemStore::default();
    let ids = store.insert_pending(vec![attachment("a.pdf")]);
    let _ = store.toggle_selected(ids[0]);

    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.selected_count(), 0);
}

#[test]
fn toggling_an_unknown_id_does_nothing() {
    let mut store = ItemStore::default();
    assert!(!store.toggle_selected(17));
    assert_eq!(store.selected_count(), 0);
}

#[test]
fn toggle_all_selects_everything_then_clears() {
    let mut store = ItemStore::default();
    let _ = store.insert_pending(vec![attachment("a.pdf"), attachment("b.pdf")]);

    store.toggle_all();
    assert_eq!(store.selected_count(), 2);
    store.toggle_all();
    assert_eq!(store.selected_count(), 0);
}

#[test]
fn pending_only_error_marking_skips_resolved_rows() {
    let mut store = ItemStore::default();
    let ids = store.insert_pending(vec![attachment("a.pdf"), attachment("b.pdf")]);
    store.mark_processed(
        ids[0],
        ItemResult {
            primary: json!({"Total": "1"}),
            line_items: vec![json!({"Total": "1"})],
        },
    );

    store.mark_error_if_pending(&ids, "timed out");

    assert_eq!(store.get(ids[0]).unwrap().status, ItemStatus::Processed);
    assert_eq!(store.get(ids[1]).unwrap().status, ItemStatus::Error);
}

#[test]
fn processing_replaces_a_previous_error() {
    let mut store = ItemStore::default();
    let ids = store.insert_pending(vec![attachment("a.pdf")]);
    store.mark_error(&ids, "first attempt failed");

    store.mark_pending(&ids);
    assert_eq!(store.get(ids[0]).unwrap().status, ItemStatus::Pending);
    assert!(store.get(ids[0]).unwrap().error.is_none());

    store.mark_processed(
        ids[0],
        ItemResult {
            primary: json!({"Total": "2"}),
            line_items: vec![json!({"Total": "2"})],
        },
    );
    let record = store.get(ids[0]).unwrap();
    assert_eq!(record.status, ItemStatus::Processed);
    assert!(record.error.is_none());
}
