//! Wire shapes of WeRead responses.
//!
//! Every field is optional on the wire; defaults are applied when converting
//! into domain types.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error::{EmptyReason, FetchOutcome, SyncError};
use crate::models::{
    Book, Bookmark, ChapterInfo, ChapterMap, HighlightColor, HighlightStyle, ROOT_CHAPTER_ID,
};

/// Level given to chapters the service reports without one.
const DEFAULT_CHAPTER_LEVEL: i64 = 3;

#[derive(Debug, Deserialize)]
pub struct NotebooksResponse {
    pub books: Option<Vec<NotebookEntry>>,
    pub errcode: Option<i64>,
    pub errmsg: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebookEntry {
    pub book_id: Option<String>,
    pub sort: Option<i64>,
    pub book: Option<NotebookBook>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebookBook {
    pub book_id: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover: Option<String>,
}

impl NotebooksResponse {
    /// Converts the listing into books. A non-zero `errcode` is how the
    /// service reports an expired or invalid cookie.
    pub fn into_books(self) -> Result<Vec<Book>, SyncError> {
        if let Some(code) = self.errcode.filter(|code| *code != 0) {
            return Err(SyncError::Auth {
                service: "weread",
                message: format!(
                    "errcode {}: {}",
                    code,
                    self.errmsg.unwrap_or_else(|| "unknown".to_string())
                ),
            });
        }

        let entries = self.books.ok_or_else(|| SyncError::Decode {
            service: "weread",
            message: "notebook listing has no 'books' field".to_string(),
        })?;

        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                let book = entry.into_book();
                if book.is_none() {
                    tracing::warn!("Skipping notebook entry without a book id");
                }
                book
            })
            .collect())
    }
}

impl NotebookEntry {
    fn into_book(self) -> Option<Book> {
        let details = self.book.unwrap_or_default();
        let id = details.book_id.or(self.book_id)?;
        let sort = timestamp(self.sort.unwrap_or(0));

        Some(
            Book::new(id, details.title.unwrap_or_default(), sort)
                .with_author(details.author.unwrap_or_default())
                .with_cover(details.cover.unwrap_or_default()),
        )
    }
}

fn timestamp(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
pub struct BookmarkListResponse {
    pub updated: Option<Vec<BookmarkEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkEntry {
    pub book_id: Option<String>,
    pub chapter_uid: Option<i64>,
    pub mark_text: Option<String>,
    pub style: Option<i64>,
    pub color_style: Option<i64>,
    pub range: Option<RangeValue>,
}

/// The `range` field is usually `"start-end"` but older entries carry a bare
/// number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RangeValue {
    Number(i64),
    Text(String),
}

impl RangeValue {
    /// Start offset of the range; 0 when it cannot be parsed.
    pub fn start(&self) -> i64 {
        match self {
            RangeValue::Number(n) => *n,
            RangeValue::Text(text) => {
                let digits: String = text
                    .trim()
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                digits.parse().unwrap_or(0)
            }
        }
    }
}

impl BookmarkListResponse {
    pub fn into_bookmarks(self, book_id: &str) -> FetchOutcome<Vec<Bookmark>> {
        let Some(entries) = self.updated else {
            return FetchOutcome::Empty(EmptyReason::Malformed(
                "bookmark list has no 'updated' field".to_string(),
            ));
        };

        FetchOutcome::Fetched(
            entries
                .into_iter()
                .map(|entry| entry.into_bookmark(book_id))
                .collect(),
        )
    }
}

impl BookmarkEntry {
    fn into_bookmark(self, book_id: &str) -> Bookmark {
        let position = self.range.as_ref().map(RangeValue::start).unwrap_or(0);

        Bookmark::new(
            self.book_id.unwrap_or_else(|| book_id.to_string()),
            self.mark_text.unwrap_or_default(),
        )
        .in_chapter(self.chapter_uid.unwrap_or(ROOT_CHAPTER_ID), position)
        .with_style(self.style.and_then(HighlightStyle::from_code))
        .with_color(HighlightColor::from_code(self.color_style))
    }
}

#[derive(Debug, Deserialize)]
pub struct ChapterInfosResponse {
    pub data: Option<Vec<ChapterBookEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct ChapterBookEntry {
    pub updated: Option<Vec<ChapterEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterEntry {
    pub chapter_uid: Option<i64>,
    pub title: Option<String>,
    pub level: Option<i64>,
}

impl ChapterInfosResponse {
    /// Only a response describing exactly one book with an `updated` list is
    /// usable; every other shape means "no chapter data".
    pub fn into_chapter_map(self) -> Option<ChapterMap> {
        let mut data = self.data?;
        if data.len() != 1 {
            return None;
        }
        let entries = data.pop()?.updated?;

        Some(
            entries
                .into_iter()
                .filter_map(|entry| {
                    let chapter_id = entry.chapter_uid?;
                    Some((
                        chapter_id,
                        ChapterInfo::new(
                            chapter_id,
                            entry.title.unwrap_or_default(),
                            entry.level.unwrap_or(DEFAULT_CHAPTER_LEVEL),
                        ),
                    ))
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notebooks_into_books() {
        let json = r#"{
            "synckey": 1700000000,
            "books": [
                {"bookId": "100", "sort": 1700000000,
                 "book": {"bookId": "100", "title": "Dune", "author": "Frank Herbert",
                          "cover": "https://cdn.example.com/dune.jpg"}},
                {"bookId": "200", "sort": 1600000000,
                 "book": {"bookId": "200", "title": "Solaris", "author": null}}
            ]
        }"#;

        let response: NotebooksResponse = serde_json::from_str(json).unwrap();
        let books = response.into_books().unwrap();

        assert_eq!(books.len(), 2);
        assert_eq!(books[0].id, "100");
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].cover, "https://cdn.example.com/dune.jpg");
        assert_eq!(books[0].sort.timestamp(), 1700000000);
        assert_eq!(books[1].author, "");
        assert_eq!(books[1].cover, "");
    }

    #[test]
    fn test_notebook_entry_without_id_is_skipped() {
        let json = r#"{"books": [{"sort": 5, "book": {"title": "Untitled"}}]}"#;
        let response: NotebooksResponse = serde_json::from_str(json).unwrap();
        assert!(response.into_books().unwrap().is_empty());
    }

    #[test]
    fn test_notebooks_errcode_is_auth_error() {
        let json = r#"{"errcode": -2012, "errmsg": "login timeout"}"#;
        let response: NotebooksResponse = serde_json::from_str(json).unwrap();

        let err = response.into_books().unwrap_err();
        assert!(matches!(err, SyncError::Auth { .. }));
        assert!(err.to_string().contains("-2012"));
    }

    #[test]
    fn test_notebooks_missing_books_is_decode_error() {
        let response: NotebooksResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            response.into_books(),
            Err(SyncError::Decode { .. })
        ));
    }

    #[test]
    fn test_bookmarks_apply_defaults() {
        let json = r#"{
            "updated": [
                {"bookId": "100", "chapterUid": 7, "markText": "first",
                 "style": 1, "colorStyle": 4, "range": "120-180"},
                {"markText": "second"}
            ]
        }"#;

        let response: BookmarkListResponse = serde_json::from_str(json).unwrap();
        let FetchOutcome::Fetched(bookmarks) = response.into_bookmarks("100") else {
            panic!("expected bookmarks");
        };

        assert_eq!(bookmarks.len(), 2);
        assert_eq!(bookmarks[0].chapter_id, 7);
        assert_eq!(bookmarks[0].position, 120);
        assert_eq!(bookmarks[0].style, Some(HighlightStyle::Background));
        assert_eq!(bookmarks[0].color, HighlightColor::Green);

        assert_eq!(bookmarks[1].book_id, "100");
        assert_eq!(bookmarks[1].chapter_id, ROOT_CHAPTER_ID);
        assert_eq!(bookmarks[1].position, 0);
        assert_eq!(bookmarks[1].style, None);
        assert_eq!(bookmarks[1].color, HighlightColor::Default);
    }

    #[test]
    fn test_bookmarks_without_updated_are_malformed() {
        let response: BookmarkListResponse = serde_json::from_str(r#"{"errcode": 1}"#).unwrap();
        assert!(matches!(
            response.into_bookmarks("100"),
            FetchOutcome::Empty(EmptyReason::Malformed(_))
        ));
    }

    #[test]
    fn test_range_start() {
        assert_eq!(RangeValue::Text("42-99".to_string()).start(), 42);
        assert_eq!(RangeValue::Text(" 7".to_string()).start(), 7);
        assert_eq!(RangeValue::Text("abc".to_string()).start(), 0);
        assert_eq!(RangeValue::Number(15).start(), 15);
    }

    #[test]
    fn test_chapter_infos_single_book() {
        let json = r#"{
            "data": [{
                "bookId": "100",
                "updated": [
                    {"chapterUid": 1, "title": "Prologue", "level": 1},
                    {"chapterUid": 2, "title": "Arrakis", "level": 2},
                    {"chapterUid": 3, "title": "Untiered"},
                    {"title": "No id"}
                ]
            }]
        }"#;

        let response: ChapterInfosResponse = serde_json::from_str(json).unwrap();
        let chapters = response.into_chapter_map().unwrap();

        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[&1].title, "Prologue");
        assert_eq!(chapters[&2].level, 2);
        assert_eq!(chapters[&3].level, DEFAULT_CHAPTER_LEVEL);
    }

    #[test]
    fn test_chapter_infos_other_shapes_are_absent() {
        let two_books = r#"{"data": [{"bookId": "1", "updated": []}, {"bookId": "2", "updated": []}]}"#;
        let no_updated = r#"{"data": [{"bookId": "1"}]}"#;
        let no_data = r#"{}"#;

        for json in [two_books, no_updated, no_data] {
            let response: ChapterInfosResponse = serde_json::from_str(json).unwrap();
            assert!(response.into_chapter_map().is_none(), "{}", json);
        }
    }
}
