//! Seams between the sync logic and the two remote services.

use chrono::{DateTime, Utc};

use crate::error::{FetchOutcome, SyncError};
use crate::models::{Book, Bookmark, ChapterMap, ContentBlock};

/// A page that already exists in the document store.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRef {
    pub id: String,
}

/// Read-only source of books and highlights.
pub trait ReadingSource {
    /// Lists every book with notes. Authentication failures are fatal.
    async fn list_notebooks(&self) -> Result<Vec<Book>, SyncError>;

    /// Lists the highlights of one book. Failures degrade to `Empty`.
    async fn list_bookmarks(&self, book_id: &str) -> FetchOutcome<Vec<Bookmark>>;

    /// Fetches the chapter map of one book. Failures degrade to `Empty`.
    async fn chapter_info(&self, book_id: &str) -> FetchOutcome<ChapterMap>;
}

/// Database of synced book pages.
pub trait DocumentStore {
    async fn query_pages_by_book_id(&self, book_id: &str) -> Result<Vec<PageRef>, SyncError>;

    async fn delete_page(&self, page_id: &str) -> Result<(), SyncError>;

    /// Most recent non-empty `Date` property across all pages.
    async fn query_latest_sync_date(&self) -> Result<Option<DateTime<Utc>>, SyncError>;

    /// Creates the page for `book` with up to 100 initial children and
    /// returns its id.
    async fn create_page(&self, book: &Book, children: &[ContentBlock])
        -> Result<String, SyncError>;

    /// Appends up to 100 children to an existing page.
    async fn append_children(
        &self,
        page_id: &str,
        children: &[ContentBlock],
    ) -> Result<(), SyncError>;
}
