mod block;
mod config;
mod convert;
mod error;
mod html;
mod inline;
mod parser;
pub mod site;

pub use block::{Block, BlockKind, Inline, InlineKind};
pub use config::{Config, ConfigError};
pub use convert::{block_to_html, convert};
pub use error::{Error, Result};
pub use html::{Attributes, HtmlNode};
pub use inline::{inline_to_html, spans_of_kind, text_to_children, tokenize};
pub use parser::{classify, parse, segment};

/// Convert markdown to an HTML fragment wrapped in a single `div`.
pub fn markdown_to_html(markdown: &str) -> Result<String> {
    convert(markdown)?.render()
}
