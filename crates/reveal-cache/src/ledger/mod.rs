//! Vote ledger storage

mod vote_ledger;

pub use vote_ledger::{VoteCounts, VoteLedgerStore};
