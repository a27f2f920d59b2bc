//! The two store-mutating workflows and the confirmation step they share.
//!
//! Workflows never print. Everything the user should see goes through a
//! [`Console`], which also supplies the answer to the confirmation question.

use std::fmt;

use crate::error::Result;
use crate::models::{ArticleRecord, StoredArticle};

mod purge;
mod sync;

pub use purge::{purge, PurgeReport};
pub use sync::{sync, SyncReport};

/// Status lines emitted while a workflow runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
    /// Requested source ids that the latest scrape does not contain.
    NotInListing(&'a [i64]),
    AlreadyStored(&'a ArticleRecord),
    /// Same url as an earlier article of this request.
    DuplicateInListing(&'a ArticleRecord),
    NotInStore(i64),
    NothingToAdd,
    NothingToDelete,
    Added(usize),
    Deleted(usize),
    NoneAdded,
    NoneDeleted,
}

impl fmt::Display for Notice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NotInListing(ids) => {
                let ids: Vec<String> = ids.iter().map(|id| format!("#{id}")).collect();
                write!(f, "Article {} not in the homepage articles list.", ids.join(" "))
            }
            Notice::AlreadyStored(record) => {
                write!(f, "Article #{} already in database", record.source_id)
            }
            Notice::DuplicateInListing(record) => write!(
                f,
                "Article #{} has the same link as an article already selected",
                record.source_id
            ),
            Notice::NotInStore(id) => write!(f, "Article #{id} not in database"),
            Notice::NothingToAdd => f.write_str("No article to be added."),
            Notice::NothingToDelete => f.write_str("No article to be deleted."),
            Notice::Added(n) => write!(f, "Added: {n} article(s)."),
            Notice::Deleted(n) => write!(f, "Deleted: {n} article(s)."),
            Notice::NoneAdded => f.write_str("No article has been added."),
            Notice::NoneDeleted => f.write_str("No article has been deleted."),
        }
    }
}

/// Rows awaiting confirmation.
#[derive(Debug, Clone, Copy)]
pub enum Pending<'a> {
    Insert(&'a [ArticleRecord]),
    Delete(&'a [StoredArticle]),
}

/// The user-facing side of a workflow.
pub trait Console {
    fn notice(&mut self, notice: Notice<'_>);

    fn show_pending(&mut self, pending: Pending<'_>);

    /// Ask "Are you sure?" and read one line. `None` means input is closed.
    fn read_answer(&mut self) -> Result<Option<String>>;
}

/// How a single answer to the confirmation question reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
    Retry,
}

impl Confirmation {
    pub fn parse(answer: &str) -> Self {
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => Confirmation::Confirmed,
            "n" | "no" => Confirmation::Declined,
            _ => Confirmation::Retry,
        }
    }
}

/// Ask until the answer is a yes or a no. Closed input counts as no.
pub fn confirm<C: Console + ?Sized>(console: &mut C) -> Result<bool> {
    loop {
        let Some(answer) = console.read_answer()? else {
            tracing::debug!("Confirmation cancelled by end of input");
            return Ok(false);
        };
        match Confirmation::parse(&answer) {
            Confirmation::Confirmed => return Ok(true),
            Confirmation::Declined => return Ok(false),
            Confirmation::Retry => continue,
        }
    }
}

/// What a workflow ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was left to act on, so no question was asked.
    NothingToDo,
    Declined,
    Applied(usize),
}

impl Outcome {
    pub fn changed(&self) -> usize {
        match self {
            Outcome::Applied(n) => *n,
            _ => 0,
        }
    }
}
