//! Incremental highlight sync.
//!
//! A run lists the reader's notebooks, keeps those updated at or after the
//! watermark (the newest `Date` already in the store), and rewrites one page
//! per selected book:
//!
//! ```text
//! selector -> for each book: delete old page -> fetch chapters + bookmarks
//!          -> builder -> create page (100 blocks) -> append remaining chunks
//! ```

mod builder;
mod orchestrator;
mod remote;
mod report;
mod selector;
#[cfg(test)]
mod testing;

pub use orchestrator::{SyncContext, SyncOrchestrator};
pub use remote::{DocumentStore, PageRef, ReadingSource};
