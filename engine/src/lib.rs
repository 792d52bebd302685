pub mod controller;
pub mod export;
pub mod ingest;
pub mod pairing;
pub mod reducer;

use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub use controller::{RoundSummary, Tournament};
pub use reducer::{ByePolicy, DuelReducer, JudgeOutcome, Phase};

pub type EngineResult<T> = Result<T, TournamentError>;

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

/// Opaque identity of an item. Assigned once at ingestion, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A raw candidate as it comes out of ingestion, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entry {
    pub title: String,
    pub artist: String,
}

impl Entry {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self { title: title.into(), artist: artist.into() }
    }
}

/// A ranked candidate. Equality is by id only.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub artist: String,
}

impl Item {
    pub fn from_entry(entry: Entry) -> Self {
        Self { id: ItemId::new(), title: entry.title, artist: entry.artist }
    }

    pub fn label(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

/// Candidates still alive, in order.
pub type Pool = Vec<Item>;

/// One duel. `right` is `None` when the left item has a bye.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelPair {
    pub left: Item,
    pub right: Option<Item>,
}

impl DuelPair {
    pub fn is_bye(&self) -> bool {
        self.right.is_none()
    }

    /// Number of pool items this pair accounts for.
    pub fn width(&self) -> usize {
        if self.is_bye() { 1 } else { 2 }
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.left.id == id || self.right.as_ref().is_some_and(|r| r.id == id)
    }

    /// Resolve `pick` against this pair, returning the eligible item it names.
    pub fn eligible(&self, pick: ItemId) -> Option<&Item> {
        if self.left.id == pick {
            return Some(&self.left);
        }
        self.right.as_ref().filter(|r| r.id == pick)
    }
}

/// The pairings for one elimination round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bracket {
    pub pairs: Vec<DuelPair>,
}

impl Bracket {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Total number of pool items covered by the bracket.
    pub fn item_count(&self) -> usize {
        self.pairs.iter().map(DuelPair::width).sum()
    }

    pub fn bye_count(&self) -> usize {
        self.pairs.iter().filter(|p| p.is_bye()).count()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TournamentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid selection: {0} is not part of the current duel")]
    InvalidSelection(ItemId),
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
    #[error("tournament is not finished yet")]
    NotFinished,
    #[error("nothing to undo in this round")]
    NothingToUndo,
    #[error("no round in progress")]
    NoRoundInProgress,
    #[error("could not read entries: {0}")]
    Ingest(String),
    #[error("could not export shortlist: {0}")]
    Export(String),
}
