mod block;
mod book;
mod bookmark;
mod chapter;

pub use block::{ContentBlock, HeadingLevel};
pub use book::Book;
pub use bookmark::{Bookmark, HighlightColor, HighlightStyle, ROOT_CHAPTER_ID};
pub use chapter::{ChapterInfo, ChapterMap};
