//! Detection of optional features a document needs in its `<head>`.

use markdown::mdast::{Code, Node, Paragraph};
use serde::Serialize;

/// What a document uses, computed once before rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    /// A fenced code block or an inline code span is present.
    pub has_code: bool,
    /// A math block or inline math span is present.
    pub has_math: bool,
    /// A code block declares a mermaid diagram.
    pub has_diagram: bool,
    /// A `[toc]` placeholder paragraph is present.
    pub has_toc_placeholder: bool,
}

/// Walks the tree once and reports the features it uses.
///
/// `source` is the text the tree was parsed from; it tells fenced code
/// blocks apart from indented ones, which do not count as code.
pub fn scan(tree: &Node, source: &str) -> FeatureFlags {
    let mut flags = FeatureFlags::default();
    scan_block(tree, source, &mut flags);
    flags
}

fn scan_block(node: &Node, source: &str, flags: &mut FeatureFlags) {
    match node {
        Node::Code(code) => {
            if is_fenced(code, source) {
                flags.has_code = true;
            }
            if is_diagram(code) {
                flags.has_diagram = true;
            }
        }
        Node::Math(_) => flags.has_math = true,
        Node::Paragraph(paragraph) => {
            if is_toc_placeholder(paragraph) {
                flags.has_toc_placeholder = true;
            }
            scan_inlines(&paragraph.children, flags);
        }
        // Table cells hold their phrasing content directly.
        Node::TableCell(cell) => scan_inlines(&cell.children, flags),
        _ => {
            if let Some(children) = node.children() {
                for child in children {
                    scan_block(child, source, flags);
                }
            }
        }
    }
}

fn scan_inlines(nodes: &[Node], flags: &mut FeatureFlags) {
    for node in nodes {
        match node {
            Node::InlineCode(_) => flags.has_code = true,
            Node::InlineMath(_) => flags.has_math = true,
            _ => {
                if let Some(children) = node.children() {
                    scan_inlines(children, flags);
                }
            }
        }
    }
}

/// True when the code block opens with a ``` or ~~~ fence.
///
/// A fence is indented by at most three spaces; nodes without a position
/// count as fenced when they carry a language.
pub fn is_fenced(code: &Code, source: &str) -> bool {
    let Some(position) = &code.position else {
        return code.lang.is_some();
    };
    let Some(rest) = source.get(position.start.offset..) else {
        return code.lang.is_some();
    };
    let indent = rest.bytes().take(3).take_while(|b| *b == b' ').count();
    let rest = &rest[indent..];
    rest.starts_with("```") || rest.starts_with("~~~")
}

/// True when the code block's info string names a mermaid diagram.
pub fn is_diagram(code: &Code) -> bool {
    info_string(code)
        .trim()
        .to_lowercase()
        .starts_with("mermaid")
}

fn info_string(code: &Code) -> String {
    match (&code.lang, &code.meta) {
        (Some(lang), Some(meta)) => format!("{lang} {meta}"),
        (Some(lang), None) => lang.clone(),
        (None, Some(meta)) => meta.clone(),
        (None, None) => String::new(),
    }
}

/// True when the paragraph is exactly `[` followed by `toc]`.
///
/// The second token is matched case-insensitively; nothing else is
/// tolerated, so `[ toc ]` or `[toc] here` stay ordinary paragraphs.
pub fn is_toc_placeholder(paragraph: &Paragraph) -> bool {
    if paragraph.children.is_empty() {
        return false;
    }
    let mut text = String::new();
    for child in &paragraph.children {
        match child {
            Node::Text(t) => text.push_str(&t.value),
            _ => return false,
        }
    }
    text.strip_prefix('[')
        .is_some_and(|rest| rest.eq_ignore_ascii_case("toc]"))
}
