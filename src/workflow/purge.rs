use std::collections::BTreeSet;

use crate::db::Repository;
use crate::error::Result;

use super::{confirm, Console, Notice, Outcome, Pending};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeReport {
    /// Requested ids with no stored row, ascending.
    pub not_in_store: Vec<i64>,
    pub outcome: Outcome,
}

impl PurgeReport {
    pub fn deleted(&self) -> usize {
        self.outcome.changed()
    }
}

/// Delete the requested stored articles after the user confirms, then
/// renumber what is left so ids run from 1 without gaps.
pub async fn purge<C: Console + ?Sized>(
    requested: &BTreeSet<i64>,
    repo: &Repository,
    console: &mut C,
) -> Result<PurgeReport> {
    let wanted: Vec<i64> = requested.iter().copied().collect();
    let candidates = repo.find_by_ids(&wanted).await?;

    let not_in_store: Vec<i64> = wanted
        .into_iter()
        .filter(|id| !candidates.iter().any(|row| row.id == *id))
        .collect();
    for id in &not_in_store {
        console.notice(Notice::NotInStore(*id));
    }

    if candidates.is_empty() {
        console.notice(Notice::NothingToDelete);
        return Ok(PurgeReport {
            not_in_store,
            outcome: Outcome::NothingToDo,
        });
    }

    console.show_pending(Pending::Delete(&candidates));
    if !confirm(console)? {
        console.notice(Notice::NoneDeleted);
        return Ok(PurgeReport {
            not_in_store,
            outcome: Outcome::Declined,
        });
    }

    let mut deleted = 0;
    for row in &candidates {
        if repo.delete_by_id(row.id).await? {
            deleted += 1;
        }
    }
    let renumbered = repo.compact_ids().await?;
    tracing::info!(deleted, renumbered, "Purge finished");
    console.notice(Notice::Deleted(deleted));

    Ok(PurgeReport {
        not_in_store,
        outcome: Outcome::Applied(deleted),
    })
}
