use futures::future::join_all;
use shared::domain::TodoId;
use tracing::{info, warn};

use crate::store::TodoStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDeleteOutcome {
    pub deleted: Vec<TodoId>,
    pub failed: Vec<TodoId>,
}

impl BulkDeleteOutcome {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Deletes every id concurrently and waits for all requests to settle.
///
/// A failure never cancels the other requests. Results are matched back to
/// the id at the same position in `ids`.
pub async fn delete_all_settled<S>(store: &S, ids: &[TodoId]) -> BulkDeleteOutcome
where
    S: TodoStore + ?Sized,
{
    let results = join_all(ids.iter().map(|&id| store.delete(id))).await;

    let mut outcome = BulkDeleteOutcome::default();
    for (&id, result) in ids.iter().zip(results) {
        match result {
            Ok(()) => outcome.deleted.push(id),
            Err(err) => {
                warn!(todo_id = id.0, "bulk delete failed: {err:#}");
                outcome.failed.push(id);
            }
        }
    }

    info!(
        deleted = outcome.deleted.len(),
        failed = outcome.failed.len(),
        "bulk delete settled"
    );
    outcome
}

#[cfg(test)]
#[path = "tests/bulk_tests.rs"]
mod tests;
