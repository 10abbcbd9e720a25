use crate::block::{Block, BlockKind};

/// Split a document into blocks and classify each one.
pub fn parse(markdown: &str) -> Vec<Block<'_>> {
    segment(markdown)
        .into_iter()
        .map(|text| Block {
            kind: classify(text),
            text,
        })
        .collect()
}

/// Split a document on blank lines.
///
/// Each block is trimmed and empty blocks are dropped, so runs of extra
/// blank lines collapse. Single line breaks inside a block are kept.
pub fn segment(markdown: &str) -> Vec<&str> {
    markdown
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}

/// Decide a block's kind. The first matching rule wins.
pub fn classify(block: &str) -> BlockKind {
    if let Some(level) = heading_level(block) {
        return BlockKind::Heading(level);
    }

    if block.starts_with("```") && block.ends_with("```") {
        return BlockKind::Code;
    }

    let lines: Vec<&str> = block.split('\n').collect();

    if lines.iter().all(|line| line.starts_with('>')) {
        return BlockKind::Quote;
    }

    if lines.iter().all(|line| line.starts_with("- ")) {
        return BlockKind::UnorderedList;
    }

    // Numbering must run 1, 2, 3... with no gaps
    let numbered = lines
        .iter()
        .enumerate()
        .all(|(i, line)| line.starts_with(&format!("{}. ", i + 1)));
    if numbered {
        return BlockKind::OrderedList;
    }

    BlockKind::Paragraph
}

/// `#` to `######` followed by a space.
fn heading_level(block: &str) -> Option<u8> {
    let (marker, _) = block.split_once(' ')?;
    if (1..=6).contains(&marker.len()) && marker.chars().all(|c| c == '#') {
        Some(marker.len() as u8)
    } else {
        None
    }
}
