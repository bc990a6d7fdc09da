use super::{Bookmark, ChapterInfo, HighlightColor};

/// Heading depth in the output document. Deeper chapters clamp to `Three`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    One,
    Two,
    Three,
}

impl HeadingLevel {
    pub fn from_level(level: i64) -> Self {
        match level {
            1 => HeadingLevel::One,
            2 => HeadingLevel::Two,
            _ => HeadingLevel::Three,
        }
    }
}

/// One structural unit of a synced book page.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    TableOfContents,
    Heading {
        level: HeadingLevel,
        text: String,
    },
    Callout {
        text: String,
        icon: &'static str,
        color: HighlightColor,
    },
}

impl ContentBlock {
    pub fn heading(chapter: &ChapterInfo) -> Self {
        ContentBlock::Heading {
            level: HeadingLevel::from_level(chapter.level),
            text: chapter.title.clone(),
        }
    }

    pub fn callout(bookmark: &Bookmark) -> Self {
        ContentBlock::Callout {
            text: bookmark.text.clone(),
            icon: bookmark.icon(),
            color: bookmark.color,
        }
    }

    pub fn is_callout(&self) -> bool {
        matches!(self, ContentBlock::Callout { .. })
    }
}
