//! Notion JSON for pages, properties and blocks.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::models::{Book, ContentBlock, HeadingLevel};
use crate::sync::PageRef;

/// Notion rejects rich-text objects whose content exceeds this many characters.
pub const MAX_TEXT_LEN: usize = 2000;

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<PageObject>,
    #[serde(default)]
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageObject {
    pub id: String,
    #[serde(default)]
    pub properties: Value,
}

impl QueryResponse {
    /// Page refs from this batch, plus the cursor of the next batch when the
    /// store reports more results.
    pub fn into_page_refs(self) -> (Vec<PageRef>, Option<String>) {
        let pages = self
            .results
            .into_iter()
            .map(|page| PageRef { id: page.id })
            .collect();
        let next = self.next_cursor.filter(|_| self.has_more);
        (pages, next)
    }
}

impl PageObject {
    /// The `Date` property's start value, if set.
    pub fn date_start(&self) -> Option<&str> {
        self.properties
            .get("Date")?
            .get("date")?
            .get("start")?
            .as_str()
    }
}

/// Timestamp layouts without an offset, read as UTC.
const NAIVE_DATE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses a `Date` property start: an RFC 3339 timestamp, a timestamp
/// without offset (read as UTC), or a bare date (midnight UTC).
pub fn parse_sync_date(start: &str) -> Option<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(start) {
        return Some(datetime.with_timezone(&Utc));
    }
    for format in NAIVE_DATE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(start, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    let date = NaiveDate::parse_from_str(start, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

pub fn format_sync_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Splits `content` into rich-text objects of at most `MAX_TEXT_LEN` chars.
pub fn rich_text(content: &str) -> Value {
    let chars: Vec<char> = content.chars().collect();
    let segments: Vec<Value> = if chars.is_empty() {
        vec![text_object("")]
    } else {
        chars
            .chunks(MAX_TEXT_LEN)
            .map(|chunk| text_object(&chunk.iter().collect::<String>()))
            .collect()
    };
    Value::Array(segments)
}

fn text_object(content: &str) -> Value {
    json!({"type": "text", "text": {"content": content}})
}

pub fn block_json(block: &ContentBlock) -> Value {
    match block {
        ContentBlock::TableOfContents => json!({
            "type": "table_of_contents",
            "table_of_contents": {"color": "default"}
        }),
        ContentBlock::Heading { level, text } => {
            let kind = match level {
                HeadingLevel::One => "heading_1",
                HeadingLevel::Two => "heading_2",
                HeadingLevel::Three => "heading_3",
            };
            json!({
                "type": kind,
                kind: {
                    "rich_text": rich_text(text),
                    "color": "default",
                    "is_toggleable": false
                }
            })
        }
        ContentBlock::Callout { text, icon, color } => json!({
            "type": "callout",
            "callout": {
                "rich_text": rich_text(text),
                "icon": {"emoji": icon},
                "color": color.as_str()
            }
        }),
    }
}

pub fn blocks_json(blocks: &[ContentBlock]) -> Value {
    Value::Array(blocks.iter().map(block_json).collect())
}

fn page_properties(book: &Book) -> Value {
    let mut properties = Map::new();
    properties.insert("BookName".into(), json!({"title": rich_text(&book.title)}));
    properties.insert("BookId".into(), json!({"rich_text": rich_text(&book.id)}));
    properties.insert("Author".into(), json!({"rich_text": rich_text(&book.author)}));
    properties.insert(
        "Date".into(),
        json!({"date": {"start": format_sync_date(&book.sort)}}),
    );
    if !book.cover.is_empty() {
        properties.insert(
            "Cover".into(),
            json!({"files": [{
                "type": "external",
                "name": "Cover",
                "external": {"url": book.cover}
            }]}),
        );
    }
    Value::Object(properties)
}

/// Request body for creating a book page in `database_id`.
pub fn page_body(database_id: &str, book: &Book, children: &[ContentBlock]) -> Value {
    let mut body = Map::new();
    body.insert(
        "parent".into(),
        json!({"database_id": database_id, "type": "database_id"}),
    );
    if !book.cover.is_empty() {
        body.insert(
            "icon".into(),
            json!({"type": "external", "external": {"url": book.cover}}),
        );
    }
    body.insert("properties".into(), page_properties(book));
    body.insert("children".into(), blocks_json(children));
    Value::Object(body)
}

pub fn book_id_filter(book_id: &str) -> Value {
    json!({"property": "BookId", "rich_text": {"equals": book_id}})
}

pub fn latest_date_query() -> Value {
    json!({
        "filter": {"property": "Date", "date": {"is_not_empty": true}},
        "sorts": [{"property": "Date", "direction": "descending"}],
        "page_size": 1
    })
}
