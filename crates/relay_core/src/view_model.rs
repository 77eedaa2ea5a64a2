use serde_json::Value;

use crate::{ItemStatus, RecordId};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub signed_in: bool,
    pub user_name: Option<String>,
    pub auth_error: Option<String>,
    /// Display names of attachments staged in the upload dialog.
    pub staged: Vec<String>,
    pub rows: Vec<ItemRowView>,
    pub selected_count: usize,
    /// Rows eligible for the re-process action.
    pub unprocessed_count: usize,
    pub active_jobs: usize,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRowView {
    pub record_id: RecordId,
    pub display_name: String,
    pub status: ItemStatus,
    pub selected: bool,
    pub error: Option<String>,
    /// First extraction entry of the row's group, opaque to the core.
    pub primary: Option<Value>,
    pub line_item_count: usize,
}
