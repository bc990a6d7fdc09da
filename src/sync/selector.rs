use chrono::{DateTime, Utc};

use crate::models::Book;

/// Returns the books to sync, oldest first.
///
/// Without a watermark every book is selected. Otherwise a book is selected
/// when its sort timestamp is at or after the watermark, so the book that
/// set the watermark is synced again.
pub fn select_books_to_sync(mut books: Vec<Book>, watermark: Option<DateTime<Utc>>) -> Vec<Book> {
    books.sort_by_key(|book| book.sort);

    match watermark {
        None => books,
        Some(watermark) => books
            .into_iter()
            .filter(|book| book.sort >= watermark)
            .collect(),
    }
}
