//! Backing-store trait (port) - the interface the counting core needs

mod store;

pub use store::{AtomicKv, StoreError, StoreResult};
