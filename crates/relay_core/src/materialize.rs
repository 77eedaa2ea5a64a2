//! Maps a completed job payload back onto the originally submitted rows.

use crate::store::{ItemResult, ItemStore};
use crate::{JobMember, ResultEntry};

/// Message shown on rows the completed payload had no entries for.
pub const NO_RESULT_MESSAGE: &str = "no result for this item";

/// Applies `entries` to the job's member rows.
///
/// Entries sharing a file name form one group in payload order. The first
/// entry of a group becomes the row's primary record and the whole group its
/// line items. A member without a group becomes an error row; extra entries
/// without a member are ignored. Replaying the same payload replaces results
/// rather than appending, so the mapping is idempotent.
pub fn materialize(store: &mut ItemStore, members: &[JobMember], entries: &[ResultEntry]) {
    for member in members {
        let group: Vec<&ResultEntry> = entries
            .iter()
            .filter(|entry| entry.file_name == member.display_name)
            .collect();
        match group.first() {
            None => store.mark_error(&[member.record_id], NO_RESULT_MESSAGE),
            Some(first) => {
                let result = ItemResult {
                    primary: first.fields.clone(),
                    line_items: group.iter().map(|entry| entry.fields.clone()).collect(),
                };
                store.mark_processed(member.record_id, result);
            }
        }
    }
}
