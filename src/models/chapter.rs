use std::collections::HashMap;

/// Table-of-contents entry for one chapter of a book.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterInfo {
    pub chapter_id: i64,
    pub title: String,
    /// Nesting depth as reported by the service; 1 is top level.
    pub level: i64,
}

impl ChapterInfo {
    pub fn new(chapter_id: i64, title: impl Into<String>, level: i64) -> Self {
        Self {
            chapter_id,
            title: title.into(),
            level,
        }
    }
}

/// Chapter lookup keyed by chapter id.
pub type ChapterMap = HashMap<i64, ChapterInfo>;
