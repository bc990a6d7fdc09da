use std::fmt;

/// Chapter id assigned to highlights the service returns without one.
pub const ROOT_CHAPTER_ID: i64 = 1;

/// How a passage was marked in the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightStyle {
    Underline,
    Background,
    Wavy,
}

impl HighlightStyle {
    /// Maps the service's numeric style code. Unknown codes yield `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(HighlightStyle::Underline),
            1 => Some(HighlightStyle::Background),
            2 => Some(HighlightStyle::Wavy),
            _ => None,
        }
    }
}

/// Highlight color, named the way the document store names text colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightColor {
    #[default]
    Default,
    Red,
    Purple,
    Blue,
    Green,
    Yellow,
}

impl HighlightColor {
    /// Maps the service's `colorStyle` code. 0, unknown and absent codes
    /// all fall back to `Default`.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => HighlightColor::Red,
            Some(2) => HighlightColor::Purple,
            Some(3) => HighlightColor::Blue,
            Some(4) => HighlightColor::Green,
            Some(5) => HighlightColor::Yellow,
            _ => HighlightColor::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightColor::Default => "default",
            HighlightColor::Red => "red",
            HighlightColor::Purple => "purple",
            HighlightColor::Blue => "blue",
            HighlightColor::Green => "green",
            HighlightColor::Yellow => "yellow",
        }
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single highlighted passage.
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub book_id: String,
    pub chapter_id: i64,
    pub text: String,
    pub style: Option<HighlightStyle>,
    pub color: HighlightColor,
    /// Start offset of the highlight within its chapter.
    pub position: i64,
}

impl Bookmark {
    pub fn new(book_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            chapter_id: ROOT_CHAPTER_ID,
            text: text.into(),
            style: None,
            color: HighlightColor::Default,
            position: 0,
        }
    }

    pub fn in_chapter(mut self, chapter_id: i64, position: i64) -> Self {
        self.chapter_id = chapter_id;
        self.position = position;
        self
    }

    pub fn with_style(mut self, style: Option<HighlightStyle>) -> Self {
        self.style = style;
        self
    }

    pub fn with_color(mut self, color: HighlightColor) -> Self {
        self.color = color;
        self
    }

    /// Emoji used as the callout icon for this highlight.
    pub fn icon(&self) -> &'static str {
        match self.style {
            Some(HighlightStyle::Underline) => "💡",
            Some(HighlightStyle::Background) => "⭐",
            _ => "🌟",
        }
    }
}
