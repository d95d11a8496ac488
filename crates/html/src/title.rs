//! Document title resolution.

use crate::headings::first_inline_text;
use markdown::mdast::{Heading, Node};
use md2html_core::{front_matter_raw, title_from_front_matter};

/// Resolves the document title.
///
/// Precedence: front matter `title:`, then the first level-1 heading, then
/// `fallback`. Empty candidates fall through to the next source.
pub fn resolve_title(tree: &Node, fallback: &str) -> String {
    if let Some(title) = front_matter_raw(tree).and_then(title_from_front_matter) {
        log::debug!("title from front matter: {title}");
        return title;
    }
    if let Some(title) = first_h1_text(tree) {
        log::debug!("title from first heading: {title}");
        return title;
    }
    fallback.to_string()
}

fn first_h1_text(tree: &Node) -> Option<String> {
    let heading = first_h1(tree)?;
    let text = first_inline_text(&heading.children);
    if text.is_empty() { None } else { Some(text) }
}

fn first_h1(node: &Node) -> Option<&Heading> {
    match node {
        Node::Heading(heading) if heading.depth == 1 => Some(heading),
        _ => node.children()?.iter().find_map(first_h1),
    }
}
