use log::trace;

use crate::block::{Block, BlockKind};
use crate::error::Result;
use crate::html::HtmlNode;
use crate::inline::text_to_children;
use crate::parser;

/// Convert a whole document into a `div` holding one node per block.
pub fn convert(markdown: &str) -> Result<HtmlNode> {
    let children = parser::parse(markdown)
        .iter()
        .map(block_to_html)
        .collect::<Result<Vec<_>>>()?;
    Ok(HtmlNode::parent("div", children))
}

pub fn block_to_html(block: &Block) -> Result<HtmlNode> {
    trace!("converting {} block", block.kind);
    match block.kind {
        BlockKind::Heading(level) => heading_to_html(block.text, level),
        BlockKind::Paragraph => paragraph_to_html(block.text),
        BlockKind::Code => Ok(code_to_html(block.text)),
        BlockKind::Quote => quote_to_html(block.text),
        BlockKind::UnorderedList => list_to_html(block.text, "ul", unordered_item),
        BlockKind::OrderedList => list_to_html(block.text, "ol", ordered_item),
    }
}

fn heading_to_html(block: &str, level: u8) -> Result<HtmlNode> {
    let text = block.trim_start_matches('#').trim();
    Ok(HtmlNode::parent(&format!("h{}", level), text_to_children(text)?))
}

// Paragraphs always flow onto one line
fn paragraph_to_html(block: &str) -> Result<HtmlNode> {
    let text = block.replace('\n', " ");
    Ok(HtmlNode::parent("p", text_to_children(&text)?))
}

fn code_to_html(block: &str) -> HtmlNode {
    // Drop both fence lines, including any language tag on the first
    let lines: Vec<&str> = block.split('\n').collect();
    let content = if lines.len() > 2 {
        lines[1..lines.len() - 1].join("\n")
    } else {
        String::new()
    };
    HtmlNode::parent("pre", vec![HtmlNode::leaf("code", content)])
}

fn quote_to_html(block: &str) -> Result<HtmlNode> {
    let text = block
        .split('\n')
        .map(|line| {
            line.strip_prefix("> ")
                .or_else(|| line.strip_prefix('>'))
                .unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n");
    Ok(HtmlNode::parent("blockquote", text_to_children(&text)?))
}

fn unordered_item(line: &str) -> &str {
    line.get(2..).unwrap_or_default()
}

fn ordered_item(line: &str) -> &str {
    match line.find(". ") {
        Some(dot) => &line[dot + 2..],
        None => line,
    }
}

fn list_to_html(block: &str, tag: &str, item_text: fn(&str) -> &str) -> Result<HtmlNode> {
    let items = block
        .split('\n')
        .map(|line| -> Result<HtmlNode> {
            Ok(HtmlNode::parent("li", text_to_children(item_text(line))?))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(HtmlNode::parent(tag, items))
}
