use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Inline, InlineKind};
use crate::error::{Error, Result};
use crate::html::HtmlNode;

/// `![alt](url)`; brackets and parens may not nest inside either capture.
static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\[\]]*)\]\(([^\(\)]*)\)").unwrap());

/// `[text](url)`; matches preceded by `!` are rejected in `split_spans`.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]*)\]\(([^\(\)]*)\)").unwrap());

/// Split a run of inline text into typed spans.
///
/// The passes run in a fixed order over the evolving node list: `**` before
/// `*` so bold is never read as two italics, then `_`, then backticks, then
/// images before links so `![a](u)` is never taken for a link.
pub fn tokenize(text: &str) -> Result<Vec<Inline>> {
    let nodes = vec![Inline::Text(text.to_string())];
    let nodes = split_delimiter(nodes, "**", Inline::Bold)?;
    let nodes = split_delimiter(nodes, "*", Inline::Italic)?;
    let nodes = split_delimiter(nodes, "_", Inline::Italic)?;
    let nodes = split_delimiter(nodes, "`", Inline::Code)?;
    let nodes = split_spans(nodes, &IMAGE_RE, false, |alt, url| Inline::Image { alt, url });
    let nodes = split_spans(nodes, &LINK_RE, true, |text, url| Inline::Link { text, url });
    Ok(nodes)
}

/// The spans of one kind in `text`, in order.
pub fn spans_of_kind(text: &str, kind: InlineKind) -> Result<Vec<Inline>> {
    let mut spans = tokenize(text)?;
    spans.retain(|span| span.kind() == kind);
    Ok(spans)
}

/// Tokenize and map each span to its HTML leaf.
pub fn text_to_children(text: &str) -> Result<Vec<HtmlNode>> {
    Ok(tokenize(text)?.iter().map(inline_to_html).collect())
}

pub fn inline_to_html(inline: &Inline) -> HtmlNode {
    match inline {
        Inline::Text(text) => HtmlNode::text(text.as_str()),
        Inline::Bold(text) => HtmlNode::leaf("b", text.as_str()),
        Inline::Italic(text) => HtmlNode::leaf("i", text.as_str()),
        Inline::Code(text) => HtmlNode::leaf("code", text.as_str()),
        Inline::Link { text, url } => {
            HtmlNode::leaf("a", text.as_str()).with_attr("href", url.as_str())
        }
        Inline::Image { alt, url } => HtmlNode::leaf("img", "")
            .with_attr("src", url.as_str())
            .with_attr("alt", alt.as_str()),
    }
}

fn split_delimiter(
    nodes: Vec<Inline>,
    delimiter: &'static str,
    wrap: fn(String) -> Inline,
) -> Result<Vec<Inline>> {
    let mut out = Vec::with_capacity(nodes.len());

    for node in nodes {
        let Inline::Text(text) = node else {
            out.push(node);
            continue;
        };

        let parts: Vec<&str> = text.split(delimiter).collect();
        if parts.len() % 2 == 0 {
            return Err(Error::UnbalancedDelimiter(delimiter));
        }

        for (i, part) in parts.into_iter().enumerate() {
            if part.is_empty() {
                continue;
            }
            if i % 2 == 0 {
                out.push(Inline::Text(part.to_string()));
            } else {
                out.push(wrap(part.to_string()));
            }
        }
    }

    Ok(out)
}

fn split_spans(
    nodes: Vec<Inline>,
    pattern: &Regex,
    reject_after_bang: bool,
    wrap: fn(String, String) -> Inline,
) -> Vec<Inline> {
    let mut out = Vec::with_capacity(nodes.len());

    for node in nodes {
        let Inline::Text(text) = node else {
            out.push(node);
            continue;
        };

        let mut last = 0;
        let mut search = 0;
        while let Some(caps) = pattern.captures_at(&text, search) {
            let Some(whole) = caps.get(0) else { break };

            // Every match starts with an ASCII `[`, so +1 stays on a char boundary
            if reject_after_bang && text[..whole.start()].ends_with('!') {
                search = whole.start() + 1;
                continue;
            }

            if whole.start() > last {
                out.push(Inline::Text(text[last..whole.start()].to_string()));
            }
            out.push(wrap(caps[1].to_string(), caps[2].to_string()));
            last = whole.end();
            search = last;
        }

        if last < text.len() {
            out.push(Inline::Text(text[last..].to_string()));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn link(t: &str, u: &str) -> Inline {
        Inline::Link {
            text: t.to_string(),
            url: u.to_string(),
        }
    }

    fn image(a: &str, u: &str) -> Inline {
        Inline::Image {
            alt: a.to_string(),
            url: u.to_string(),
        }
    }

    #[rstest]
    #[case("just some words")]
    #[case("1 < 2 & 3 > 2")]
    #[case("brackets [alone] and (parens)")]
    fn plain_text_is_one_node(#[case] input: &str) {
        assert_eq!(tokenize(input).unwrap(), vec![text(input)]);
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn bold() {
        assert_eq!(
            tokenize("Some **bold** text.").unwrap(),
            vec![text("Some "), Inline::Bold("bold".into()), text(" text.")]
        );
    }

    #[test]
    fn star_and_underscore_italics_collapse() {
        assert_eq!(tokenize("*x*").unwrap(), tokenize("_x_").unwrap());
        assert_eq!(tokenize("_x_").unwrap(), vec![Inline::Italic("x".into())]);
    }

    #[test]
    fn bold_is_consumed_before_italic() {
        assert_eq!(
            tokenize("**b** and *i*").unwrap(),
            vec![
                Inline::Bold("b".into()),
                text(" and "),
                Inline::Italic("i".into())
            ]
        );
    }

    #[test]
    fn markers_inside_converted_spans_are_left_alone() {
        assert_eq!(
            tokenize("**a_b** and `c`").unwrap(),
            vec![
                Inline::Bold("a_b".into()),
                text(" and "),
                Inline::Code("c".into())
            ]
        );
    }

    #[test]
    fn code_span() {
        assert_eq!(
            tokenize("run `cargo` now").unwrap(),
            vec![text("run "), Inline::Code("cargo".into()), text(" now")]
        );
    }

    #[rstest]
    #[case("an **open bold", "**")]
    #[case("one *star", "*")]
    #[case("snake_case", "_")]
    #[case("a `tick", "`")]
    fn unbalanced_delimiters(#[case] input: &str, #[case] delimiter: &'static str) {
        assert_eq!(tokenize(input), Err(Error::UnbalancedDelimiter(delimiter)));
    }

    #[test]
    fn image_span() {
        assert_eq!(tokenize("![alt](u)").unwrap(), vec![image("alt", "u")]);
    }

    #[test]
    fn image_and_link_are_not_confused() {
        assert_eq!(
            tokenize("![a](u1) and [b](u2)").unwrap(),
            vec![image("a", "u1"), text(" and "), link("b", "u2")]
        );
    }

    #[test]
    fn several_links_with_trailing_text() {
        assert_eq!(
            tokenize("see [one](https://a.dev) or [two](https://b.dev) too").unwrap(),
            vec![
                text("see "),
                link("one", "https://a.dev"),
                text(" or "),
                link("two", "https://b.dev"),
                text(" too")
            ]
        );
    }

    #[test]
    fn nested_brackets_stay_text() {
        let input = "[a [b]](u) and [c](d(e))";
        assert_eq!(tokenize(input).unwrap(), vec![text(input)]);
    }

    #[rstest]
    #[case("link", vec![link("b", "u2"), link("d", "u3")])]
    #[case("image", vec![image("a", "u1")])]
    #[case("bold", vec![Inline::Bold("c".into())])]
    #[case("code", vec![])]
    fn filters_spans_by_kind_name(#[case] name: &str, #[case] expected: Vec<Inline>) {
        let kind: InlineKind = name.parse().unwrap();
        let spans = spans_of_kind("![a](u1) [b](u2) **c** [d](u3)", kind).unwrap();
        assert_eq!(spans, expected);
    }

    #[test]
    fn filtered_links_keep_their_targets() {
        let links = spans_of_kind("see [b](u2) and ![a](u1)", InlineKind::Link).unwrap();
        let targets: Vec<_> = links.iter().map(|span| (span.text(), span.target())).collect();
        assert_eq!(targets, vec![("b", Some("u2"))]);
    }

    #[test]
    fn filtering_by_unknown_kind_name_fails() {
        assert_eq!(
            "strike".parse::<InlineKind>(),
            Err(Error::UnknownInlineKind("strike".to_string()))
        );
    }

    #[test]
    fn filtering_still_reports_unbalanced_markup() {
        assert_eq!(
            spans_of_kind("a *b", InlineKind::Link),
            Err(Error::UnbalancedDelimiter("*"))
        );
    }

    #[test]
    fn link_html() {
        let node = inline_to_html(&link("Visit", "https://www.google.com"));
        assert_eq!(
            node.render().unwrap(),
            r#"<a href="https://www.google.com">Visit</a>"#
        );
    }

    #[test]
    fn image_html_has_explicit_close() {
        let node = inline_to_html(&image("alt", "u"));
        assert_eq!(node.render().unwrap(), r#"<img src="u" alt="alt"></img>"#);
    }

    #[test]
    fn children_render_in_order() {
        let children = text_to_children("a **b** _c_ `d`").unwrap();
        let html: String = children.iter().map(|c| c.render().unwrap()).collect();
        assert_eq!(html, "a <b>b</b> <i>c</i> <code>d</code>");
    }
}
