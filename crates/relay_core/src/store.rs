use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde_json::Value;

pub type RecordId = u64;

/// Opaque handle to the raw bytes or text of a submitted item. The core never
/// dereferences it; the platform resolves it when building the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadRef {
    File(PathBuf),
    Text(String),
}

/// One file or text blob the user has attached but not yet submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub display_name: String,
    pub payload: PayloadRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Unprocessed,
    Pending,
    Processed,
    Error,
}

/// Extraction result for one row: the first payload entry as the primary
/// record plus the full group as line items, in payload order.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemResult {
    pub primary: Value,
    pub line_items: Vec<Value>,
}

/// The durable, UI-visible row for one submitted item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub id: RecordId,
    pub display_name: String,
    pub payload: PayloadRef,
    pub status: ItemStatus,
    pub result: Option<ItemResult>,
    pub error: Option<String>,
}

/// Ordered collection of item rows, keyed by ascending record id so iteration
/// order is insertion order. The only shared mutable surface of the
/// coordinator; presentation reads snapshots and issues explicit actions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemStore {
    records: BTreeMap<RecordId, ItemRecord>,
    selected: BTreeSet<RecordId>,
    next_id: RecordId,
}

impl ItemStore {
    /// Inserts one pending row per attachment, in input order, and returns
    /// the assigned record ids.
    pub fn insert_pending(&mut self, attachments: Vec<Attachment>) -> Vec<RecordId> {
        let mut ids = Vec::with_capacity(attachments.len());
        for attachment in attachments {
            self.next_id += 1;
            let id = self.next_id;
            self.records.insert(
                id,
                ItemRecord {
                    id,
                    display_name: attachment.display_name,
                    payload: attachment.payload,
                    status: ItemStatus::Pending,
                    result: None,
                    error: None,
                },
            );
            ids.push(id);
        }
        ids
    }

    pub fn mark_error(&mut self, ids: &[RecordId], message: &str) {
        for id in ids {
            if let Some(record) = self.records.get_mut(id) {
                record.status = ItemStatus::Error;
                record.error = Some(message.to_string());
            }
        }
    }

    /// Like `mark_error`, but leaves rows another job already resolved alone.
    pub fn mark_error_if_pending(&mut self, ids: &[RecordId], message: &str) {
        for id in ids {
            if let Some(record) = self.records.get_mut(id) {
                if record.status == ItemStatus::Pending {
                    record.status = ItemStatus::Error;
                    record.error = Some(message.to_string());
                }
            }
        }
    }

    /// Replaces any previous result, so re-applying a payload is idempotent.
    pub fn mark_processed(&mut self, id: RecordId, result: ItemResult) {
        if let Some(record) = self.records.get_mut(&id) {
            record.status = ItemStatus::Processed;
            record.result = Some(result);
            record.error = None;
        }
    }

    pub fn mark_pending(&mut self, ids: &[RecordId]) {
        for id in ids {
            if let Some(record) = self.records.get_mut(id) {
                record.status = ItemStatus::Pending;
                record.error = None;
            }
        }
    }

    pub fn remove(&mut self, id: RecordId) -> bool {
        self.selected.remove(&id);
        self.records.remove(&id).is_some()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.selected.clear();
    }

    /// Returns false when the id is unknown; selection never references a
    /// removed row.
    pub fn toggle_selected(&mut self, id: RecordId) -> bool {
        if !self.records.contains_key(&id) {
            return false;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        true
    }

    /// Selects every row, or clears the selection when everything is already
    /// selected.
    pub fn toggle_all(&mut self) {
        if self.selected.len() == self.records.len() {
            self.selected.clear();
        } else {
            self.selected = self.records.keys().copied().collect();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selected.iter().copied().collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selected.contains(&id)
    }

    pub fn get(&self, id: RecordId) -> Option<&ItemRecord> {
        self.records.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
