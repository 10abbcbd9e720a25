use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Inline text spans produced by the tokenizer.
///
/// `*x*` and `_x_` both become `Italic`; which marker was used is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
    Italic(String),
    Code(String),
    Link { text: String, url: String },
    Image { alt: String, url: String },
}

impl Inline {
    pub fn kind(&self) -> InlineKind {
        match self {
            Inline::Text(_) => InlineKind::Text,
            Inline::Bold(_) => InlineKind::Bold,
            Inline::Italic(_) => InlineKind::Italic,
            Inline::Code(_) => InlineKind::Code,
            Inline::Link { .. } => InlineKind::Link,
            Inline::Image { .. } => InlineKind::Image,
        }
    }

    /// Display text; the alt text for images.
    pub fn text(&self) -> &str {
        match self {
            Inline::Text(text)
            | Inline::Bold(text)
            | Inline::Italic(text)
            | Inline::Code(text)
            | Inline::Link { text, .. } => text,
            Inline::Image { alt, .. } => alt,
        }
    }

    /// URL of a link or image; `None` for every other kind.
    pub fn target(&self) -> Option<&str> {
        match self {
            Inline::Link { url, .. } | Inline::Image { url, .. } => Some(url),
            _ => None,
        }
    }
}

/// The fixed set of inline span kinds, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineKind {
    Text,
    Bold,
    Italic,
    Code,
    Link,
    Image,
}

impl InlineKind {
    pub fn name(self) -> &'static str {
        match self {
            InlineKind::Text => "text",
            InlineKind::Bold => "bold",
            InlineKind::Italic => "italic",
            InlineKind::Code => "code",
            InlineKind::Link => "link",
            InlineKind::Image => "image",
        }
    }
}

impl fmt::Display for InlineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InlineKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(InlineKind::Text),
            "bold" => Ok(InlineKind::Bold),
            "italic" => Ok(InlineKind::Italic),
            "code" => Ok(InlineKind::Code),
            "link" => Ok(InlineKind::Link),
            "image" => Ok(InlineKind::Image),
            _ => Err(Error::UnknownInlineKind(s.to_string())),
        }
    }
}

/// Block-level kinds; a block's kind depends only on its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading(u8),
    Code,
    Quote,
    UnorderedList,
    OrderedList,
    Paragraph,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Heading(level) => write!(f, "heading{}", level),
            BlockKind::Code => f.write_str("code"),
            BlockKind::Quote => f.write_str("quote"),
            BlockKind::UnorderedList => f.write_str("unordered_list"),
            BlockKind::OrderedList => f.write_str("ordered_list"),
            BlockKind::Paragraph => f.write_str("paragraph"),
        }
    }
}

/// One blank-line-separated chunk of a document and its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub kind: BlockKind,
    pub text: &'a str,
}
