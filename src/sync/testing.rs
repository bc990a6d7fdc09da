//! In-memory stand-ins for the remote services.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::orchestrator::MAX_CHILDREN_PER_WRITE;
use super::remote::{DocumentStore, PageRef, ReadingSource};
use crate::error::{EmptyReason, FetchOutcome, SyncError};
use crate::models::{Book, Bookmark, ChapterMap, ContentBlock};

#[derive(Debug, Default)]
pub struct FakeSource {
    books: Vec<Book>,
    bookmarks: HashMap<String, FetchOutcome<Vec<Bookmark>>>,
    chapters: HashMap<String, ChapterMap>,
    reject: bool,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(mut self, book: Book, bookmarks: Vec<Bookmark>) -> Self {
        self.bookmarks
            .insert(book.id.clone(), FetchOutcome::Fetched(bookmarks));
        self.books.push(book);
        self
    }

    pub fn with_chapters(mut self, book_id: &str, chapters: ChapterMap) -> Self {
        self.chapters.insert(book_id.to_string(), chapters);
        self
    }

    pub fn with_failed_bookmarks(mut self, book_id: &str, reason: EmptyReason) -> Self {
        self.bookmarks
            .insert(book_id.to_string(), FetchOutcome::Empty(reason));
        self
    }

    pub fn reject_credentials(mut self) -> Self {
        self.reject = true;
        self
    }
}

impl ReadingSource for FakeSource {
    async fn list_notebooks(&self) -> Result<Vec<Book>, SyncError> {
        if self.reject {
            return Err(SyncError::Auth {
                service: "weread",
                message: "errcode -2012: login timeout".to_string(),
            });
        }
        Ok(self.books.clone())
    }

    async fn list_bookmarks(&self, book_id: &str) -> FetchOutcome<Vec<Bookmark>> {
        self.bookmarks
            .get(book_id)
            .cloned()
            .unwrap_or(FetchOutcome::Fetched(Vec::new()))
    }

    async fn chapter_info(&self, book_id: &str) -> FetchOutcome<ChapterMap> {
        match self.chapters.get(book_id) {
            Some(chapters) => FetchOutcome::Fetched(chapters.clone()),
            None => FetchOutcome::Empty(EmptyReason::Malformed("no chapter infos".to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Query { book_id: String },
    Delete { page_id: String },
    Create { book_id: String, children: usize },
    Append { page_id: String, children: usize },
}

#[derive(Debug, Clone)]
pub struct FakePage {
    pub id: String,
    pub book: Book,
    pub blocks: Vec<ContentBlock>,
}

#[derive(Debug, Default)]
struct StoreState {
    pages: Vec<FakePage>,
    calls: Vec<StoreCall>,
    created: usize,
    seeded: usize,
}

/// Records every call; the page `Date` is the book's sort timestamp.
#[derive(Debug, Default)]
pub struct FakeStore {
    state: Mutex<StoreState>,
    fail_create: Option<String>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_create_for(mut self, book_id: &str) -> Self {
        self.fail_create = Some(book_id.to_string());
        self
    }

    /// Adds a page left over from an earlier run without recording a call.
    pub fn seed_page(&self, book_id: &str, date: DateTime<Utc>) {
        let mut state = self.state.lock().unwrap();
        state.seeded += 1;
        let id = format!("seed-{}", state.seeded);
        state.pages.push(FakePage {
            id,
            book: Book::new(book_id, "seeded", date),
            blocks: Vec::new(),
        });
    }

    pub fn pages(&self) -> Vec<FakePage> {
        self.state.lock().unwrap().pages.clone()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().unwrap().calls.clone()
    }
}

impl DocumentStore for FakeStore {
    async fn query_pages_by_book_id(&self, book_id: &str) -> Result<Vec<PageRef>, SyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Query {
            book_id: book_id.to_string(),
        });
        Ok(state
            .pages
            .iter()
            .filter(|page| page.book.id == book_id)
            .map(|page| PageRef {
                id: page.id.clone(),
            })
            .collect())
    }

    async fn delete_page(&self, page_id: &str) -> Result<(), SyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Delete {
            page_id: page_id.to_string(),
        });
        state.pages.retain(|page| page.id != page_id);
        Ok(())
    }

    async fn query_latest_sync_date(&self) -> Result<Option<DateTime<Utc>>, SyncError> {
        let state = self.state.lock().unwrap();
        Ok(state.pages.iter().map(|page| page.book.sort).max())
    }

    async fn create_page(
        &self,
        book: &Book,
        children: &[ContentBlock],
    ) -> Result<String, SyncError> {
        assert!(children.len() <= MAX_CHILDREN_PER_WRITE);
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Create {
            book_id: book.id.clone(),
            children: children.len(),
        });

        if self.fail_create.as_deref() == Some(book.id.as_str()) {
            return Err(SyncError::Status {
                service: "notion",
                status: 500,
                body: "internal error".to_string(),
            });
        }

        state.created += 1;
        let id = format!("page-{}", state.created);
        state.pages.push(FakePage {
            id: id.clone(),
            book: book.clone(),
            blocks: children.to_vec(),
        });
        Ok(id)
    }

    async fn append_children(
        &self,
        page_id: &str,
        children: &[ContentBlock],
    ) -> Result<(), SyncError> {
        assert!(!children.is_empty() && children.len() <= MAX_CHILDREN_PER_WRITE);
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Append {
            page_id: page_id.to_string(),
            children: children.len(),
        });
        let page = state
            .pages
            .iter_mut()
            .find(|page| page.id == page_id)
            .ok_or_else(|| SyncError::Status {
                service: "notion",
                status: 404,
                body: format!("no page {}", page_id),
            })?;
        page.blocks.extend_from_slice(children);
        Ok(())
    }
}
