use chrono::{DateTime, Utc};
use std::fmt;

/// A notebook entry from the reading service.
///
/// `sort` is the service's "last updated" timestamp for the book and is what
/// the incremental selector compares against the watermark.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub cover: String,
    pub sort: DateTime<Utc>,
}

impl Book {
    pub fn new(id: impl Into<String>, title: impl Into<String>, sort: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: String::new(),
            cover: String::new(),
            sort,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = cover.into();
        self
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.author.is_empty() {
            write!(f, "{} ({})", self.title, self.id)
        } else {
            write!(f, "{} by {} ({})", self.title, self.author, self.id)
        }
    }
}
