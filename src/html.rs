use crate::error::{Error, Result};

/// Element attributes, rendered in insertion order.
pub type Attributes = Vec<(String, String)>;

/// A node in the rendered HTML tree.
///
/// Fields are optional so that a tree assembled by hand can be checked at
/// render time; the converters always fill them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    /// Raw text when `tag` is `None`, otherwise one element wrapping `value`.
    Leaf {
        tag: Option<String>,
        value: Option<String>,
        attrs: Attributes,
    },
    /// An element owning an ordered list of children.
    Parent {
        tag: Option<String>,
        children: Option<Vec<HtmlNode>>,
        attrs: Attributes,
    },
}

impl HtmlNode {
    /// Untagged leaf, rendered as the text itself.
    pub fn text(value: impl Into<String>) -> Self {
        HtmlNode::Leaf {
            tag: None,
            value: Some(value.into()),
            attrs: Vec::new(),
        }
    }

    pub fn leaf(tag: &str, value: impl Into<String>) -> Self {
        HtmlNode::Leaf {
            tag: Some(tag.to_string()),
            value: Some(value.into()),
            attrs: Vec::new(),
        }
    }

    pub fn parent(tag: &str, children: Vec<HtmlNode>) -> Self {
        HtmlNode::Parent {
            tag: Some(tag.to_string()),
            children: Some(children),
            attrs: Vec::new(),
        }
    }

    /// Append an attribute, keeping earlier ones first.
    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        match &mut self {
            HtmlNode::Leaf { attrs, .. } | HtmlNode::Parent { attrs, .. } => {
                attrs.push((key.to_string(), value.into()));
            }
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            HtmlNode::Leaf { tag, .. } | HtmlNode::Parent { tag, .. } => tag.as_deref(),
        }
    }

    /// Children of a parent node; leaves have none.
    pub fn children(&self) -> &[HtmlNode] {
        match self {
            HtmlNode::Parent {
                children: Some(children),
                ..
            } => children,
            _ => &[],
        }
    }

    /// Render the subtree to an HTML string.
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        self.render_into(&mut out)?;
        Ok(out)
    }

    fn render_into(&self, out: &mut String) -> Result<()> {
        match self {
            HtmlNode::Leaf {
                tag: None, value, ..
            } => {
                if let Some(value) = value {
                    out.push_str(value);
                }
            }
            HtmlNode::Leaf {
                tag: Some(tag),
                value,
                attrs,
            } => {
                let value = value.as_deref().ok_or(Error::MissingValue)?;
                open_tag(tag, attrs, out);
                out.push_str(value);
                close_tag(tag, out);
            }
            HtmlNode::Parent {
                tag,
                children,
                attrs,
            } => {
                let tag = tag.as_deref().ok_or(Error::MissingTag)?;
                let children = children.as_deref().ok_or(Error::MissingChildren)?;
                open_tag(tag, attrs, out);
                for child in children {
                    child.render_into(out)?;
                }
                close_tag(tag, out);
            }
        }
        Ok(())
    }
}

fn open_tag(tag: &str, attrs: &Attributes, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    attrs_to_html(attrs, out);
    out.push('>');
}

fn close_tag(tag: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

// Values are trusted and substituted literally.
fn attrs_to_html(attrs: &Attributes, out: &mut String) {
    for (key, value) in attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
}
