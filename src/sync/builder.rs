use crate::models::{Bookmark, ChapterMap, ContentBlock};

/// Turns a book's highlights into page blocks.
///
/// Without a chapter map, each bookmark becomes a callout in the order given.
/// With one, bookmarks are sorted by (chapter, position), the page opens with
/// a table of contents, and each chapter's callouts are preceded by its
/// heading when the chapter is in the map.
pub fn build_document(bookmarks: Vec<Bookmark>, chapters: Option<&ChapterMap>) -> Vec<ContentBlock> {
    let Some(chapters) = chapters else {
        return bookmarks.iter().map(ContentBlock::callout).collect();
    };

    let mut bookmarks = bookmarks;
    bookmarks.sort_by_key(|bookmark| (bookmark.chapter_id, bookmark.position));

    let mut blocks = Vec::with_capacity(bookmarks.len() + 1);
    blocks.push(ContentBlock::TableOfContents);

    let mut current_chapter = None;
    for bookmark in &bookmarks {
        if current_chapter != Some(bookmark.chapter_id) {
            current_chapter = Some(bookmark.chapter_id);
            if let Some(chapter) = chapters.get(&bookmark.chapter_id) {
                blocks.push(ContentBlock::heading(chapter));
            }
        }
        blocks.push(ContentBlock::callout(bookmark));
    }

    blocks
}
