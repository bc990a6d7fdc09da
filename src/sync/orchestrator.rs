use std::time::Duration;

use chrono::{DateTime, Utc};

use super::builder::build_document;
use super::remote::{DocumentStore, ReadingSource};
use super::report::{BookOutcome, SyncReport};
use super::selector::select_books_to_sync;
use crate::config::Config;
use crate::error::{FetchOutcome, SyncError};
use crate::models::{Book, ContentBlock};

/// Most children the store accepts in a single create or append call.
pub const MAX_CHILDREN_PER_WRITE: usize = 100;

/// Run-wide settings, built once at startup.
#[derive(Debug, Clone)]
pub struct SyncContext {
    /// Newest sync date already in the store; `None` on a first run.
    pub watermark: Option<DateTime<Utc>>,
    /// Delay before each mutating store call.
    pub pacing: Duration,
}

impl SyncContext {
    pub fn new(config: &Config, watermark: Option<DateTime<Utc>>) -> Self {
        Self {
            watermark,
            pacing: config.pacing(),
        }
    }
}

/// Drives a sync run one book at a time.
pub struct SyncOrchestrator<'a, R, S> {
    source: &'a R,
    store: &'a S,
}

impl<'a, R: ReadingSource, S: DocumentStore> SyncOrchestrator<'a, R, S> {
    pub fn new(source: &'a R, store: &'a S) -> Self {
        Self { source, store }
    }

    /// Syncs every book selected by the watermark, oldest first. The first
    /// store or authentication error aborts the run; books already written
    /// stay written.
    pub async fn run(&self, ctx: &SyncContext) -> Result<SyncReport, SyncError> {
        let books = self.source.list_notebooks().await?;
        let mut report = SyncReport {
            listed: books.len(),
            ..SyncReport::default()
        };

        let selected = select_books_to_sync(books, ctx.watermark);
        report.selected = selected.len();
        match ctx.watermark {
            Some(watermark) => tracing::info!(
                "{} of {} books updated since {}",
                report.selected,
                report.listed,
                watermark
            ),
            None => tracing::info!("No previous sync found, syncing all {} books", report.listed),
        }

        for book in &selected {
            let deleted = self.remove_existing(ctx, book).await?;
            report.pages_deleted += deleted;

            let outcome = self.sync_book(ctx, book).await?;
            match &outcome {
                BookOutcome::Synced { page_id, blocks } => {
                    tracing::info!("Synced {} into page {} ({} blocks)", book, page_id, blocks)
                }
                BookOutcome::Skipped(reason) => {
                    tracing::warn!("Skipped {}: bookmarks unavailable ({})", book, reason)
                }
            }
            report.record(&outcome);
        }

        Ok(report)
    }

    /// Deletes every page already tagged with the book's id.
    async fn remove_existing(&self, ctx: &SyncContext, book: &Book) -> Result<usize, SyncError> {
        pace(ctx).await;
        let pages = self.store.query_pages_by_book_id(&book.id).await?;

        for page in &pages {
            pace(ctx).await;
            tracing::debug!("Deleting page {} for book {}", page.id, book.id);
            self.store.delete_page(&page.id).await?;
        }

        Ok(pages.len())
    }

    /// Fetches, builds and writes one book's page.
    async fn sync_book(&self, ctx: &SyncContext, book: &Book) -> Result<BookOutcome, SyncError> {
        let chapters = match self.source.chapter_info(&book.id).await {
            FetchOutcome::Fetched(chapters) => Some(chapters),
            FetchOutcome::Empty(reason) => {
                tracing::warn!("No chapter data for {} ({}), using flat layout", book.id, reason);
                None
            }
        };

        let bookmarks = match self.source.list_bookmarks(&book.id).await {
            FetchOutcome::Fetched(bookmarks) => bookmarks,
            FetchOutcome::Empty(reason) => return Ok(BookOutcome::Skipped(reason)),
        };

        let blocks = build_document(bookmarks, chapters.as_ref());
        tracing::debug!(
            "Built {} blocks ({} highlights) for {}",
            blocks.len(),
            blocks.iter().filter(|block| block.is_callout()).count(),
            book.id
        );
        let page_id = self.write_page(ctx, book, &blocks).await?;

        Ok(BookOutcome::Synced {
            page_id,
            blocks: blocks.len(),
        })
    }

    /// Creates the page with the first chunk of blocks and appends the rest
    /// in order.
    async fn write_page(
        &self,
        ctx: &SyncContext,
        book: &Book,
        blocks: &[ContentBlock],
    ) -> Result<String, SyncError> {
        let mut chunks = blocks.chunks(MAX_CHILDREN_PER_WRITE);
        let first = chunks.next().unwrap_or_default();

        pace(ctx).await;
        let page_id = self.store.create_page(book, first).await?;

        for chunk in chunks {
            pace(ctx).await;
            tracing::debug!("Appending {} blocks to page {}", chunk.len(), page_id);
            self.store.append_children(&page_id, chunk).await?;
        }

        Ok(page_id)
    }
}

async fn pace(ctx: &SyncContext) {
    if !ctx.pacing.is_zero() {
        tokio::time::sleep(ctx.pacing).await;
    }
}
