//! Heading entries shared by the TOC builder and the renderer.

use markdown::mdast::{Heading, Node};
use md2html_core::{Slugger, extract_custom_id};
use serde::Serialize;
use std::collections::HashSet;

/// One heading of the document, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Identifier assigned to the heading element.
    pub anchor_id: String,
    /// Text of the heading's first inline child.
    pub text: String,
    /// Byte offset of the heading in the source, used to match the rendered
    /// heading back to its entry.
    #[serde(skip)]
    pub(crate) offset: Option<usize>,
}

/// Collects every heading in the tree, depth-first, assigning anchor ids.
///
/// Headings nested in block quotes or list items are included; footnote
/// definitions are skipped. An explicit `{#id}` suffix wins over generated
/// ids wherever it appears, so explicit ids are reserved before any slug is
/// generated.
pub fn collect_headings(tree: &Node) -> Vec<HeadingEntry> {
    let mut slugger = Slugger::new();
    reserve_custom_ids(tree, &mut slugger);

    let mut claimed = HashSet::new();
    let mut entries = Vec::new();
    visit(tree, &mut slugger, &mut claimed, &mut entries);
    entries
}

fn reserve_custom_ids(node: &Node, slugger: &mut Slugger) {
    match node {
        Node::Heading(heading) => {
            if let Some(id) = custom_id(&heading.children) {
                slugger.reserve(id);
            }
        }
        Node::FootnoteDefinition(_) => {}
        _ => {
            if let Some(children) = node.children() {
                for child in children {
                    reserve_custom_ids(child, slugger);
                }
            }
        }
    }
}

fn visit<'a>(
    node: &'a Node,
    slugger: &mut Slugger,
    claimed: &mut HashSet<&'a str>,
    entries: &mut Vec<HeadingEntry>,
) {
    match node {
        Node::Heading(heading) => entries.push(entry_for(heading, slugger, claimed)),
        Node::FootnoteDefinition(_) => {}
        _ => {
            if let Some(children) = node.children() {
                for child in children {
                    visit(child, slugger, claimed, entries);
                }
            }
        }
    }
}

fn entry_for<'a>(
    heading: &'a Heading,
    slugger: &mut Slugger,
    claimed: &mut HashSet<&'a str>,
) -> HeadingEntry {
    let anchor_id = match custom_id(&heading.children) {
        Some(id) if claimed.insert(id) => id.to_string(),
        Some(id) => {
            log::warn!("explicit id `{id}` is used by an earlier heading");
            slugger.next_slug(id)
        }
        None => slugger.next_slug(&heading_text(&heading.children)),
    };

    HeadingEntry {
        level: heading.depth,
        anchor_id,
        text: first_inline_text(&heading.children),
        offset: heading.position.as_ref().map(|p| p.start.offset),
    }
}

/// Plain text of a whole heading with any `{#id}` suffix removed.
pub fn heading_text(children: &[Node]) -> String {
    let text = plain_text(children);
    let (clean, _) = extract_custom_id(&text);
    clean.trim().to_string()
}

/// Plain text of the first inline child only.
///
/// When that child is also the last one, a trailing `{#id}` is stripped.
pub fn first_inline_text(children: &[Node]) -> String {
    let Some(first) = children.first() else {
        return String::new();
    };
    let mut text = String::new();
    push_text(first, &mut text);
    if children.len() == 1 {
        let (clean, _) = extract_custom_id(&text);
        return clean.trim().to_string();
    }
    text.trim().to_string()
}

/// Concatenated text content of inline nodes.
pub fn plain_text(nodes: &[Node]) -> String {
    let mut text = String::new();
    for node in nodes {
        push_text(node, &mut text);
    }
    text
}

fn push_text(node: &Node, buffer: &mut String) {
    match node {
        Node::Text(t) => buffer.push_str(&t.value),
        Node::InlineCode(code) => buffer.push_str(&code.value),
        Node::InlineMath(math) => buffer.push_str(&math.value),
        Node::Break(_) => buffer.push(' '),
        Node::Strong(_)
        | Node::Emphasis(_)
        | Node::Delete(_)
        | Node::Link(_)
        | Node::LinkReference(_) => {
            if let Some(children) = node.children() {
                for child in children {
                    push_text(child, buffer);
                }
            }
        }
        _ => {}
    }
}

/// Finds a `{#custom-id}` only in the trailing text node.
///
/// Inline code like `` `{#id}` `` is literal and never an id.
pub(crate) fn custom_id(nodes: &[Node]) -> Option<&str> {
    match nodes.last()? {
        Node::Text(t) => extract_custom_id(&t.value).1,
        Node::Strong(s) => custom_id(&s.children),
        Node::Emphasis(e) => custom_id(&e.children),
        Node::Delete(d) => custom_id(&d.children),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use md2html_core::{ParseOptions, parse_document};

    fn headings(markdown: &str) -> Vec<HeadingEntry> {
        collect_headings(&parse_document(markdown, &ParseOptions::full()))
    }

    fn levels_ids_texts(entries: &[HeadingEntry]) -> Vec<(u8, &str, &str)> {
        entries
            .iter()
            .map(|e| (e.level, e.anchor_id.as_str(), e.text.as_str()))
            .collect()
    }

    #[test]
    fn collects_in_document_order() {
        let entries = headings("# One\n\ntext\n\n## Two\n\n### Three\n\n## Four");
        assert_eq!(
            levels_ids_texts(&entries),
            vec![
                (1, "one", "One"),
                (2, "two", "Two"),
                (3, "three", "Three"),
                (2, "four", "Four"),
            ]
        );
    }

    #[test]
    fn duplicate_titles_get_suffixes() {
        let entries = headings("## Usage\n\n## Usage");
        assert_eq!(entries[0].anchor_id, "usage");
        assert_eq!(entries[1].anchor_id, "usage-1");
    }

    #[test]
    fn nested_headings_are_found() {
        let entries = headings("> ## Quoted\n\n- item\n\n  ### In list");
        assert_eq!(
            levels_ids_texts(&entries),
            vec![(2, "quoted", "Quoted"), (3, "in-list", "In list")]
        );
    }

    #[test]
    fn custom_id_is_used_and_stripped() {
        let entries = headings("## Install {#setup}\n\n## Setup");
        assert_eq!(entries[0].anchor_id, "setup");
        assert_eq!(entries[0].text, "Install");
        assert_eq!(entries[1].anchor_id, "setup-1");
    }

    #[test]
    fn custom_id_is_reserved_before_earlier_headings() {
        let entries = headings("## Setup\n\n## Install {#setup}");
        assert_eq!(entries[0].anchor_id, "setup-1");
        assert_eq!(entries[1].anchor_id, "setup");
    }

    #[test]
    fn repeated_custom_id_is_suffixed() {
        let entries = headings("## A {#same}\n\n## B {#same}");
        assert_eq!(entries[0].anchor_id, "same");
        assert_eq!(entries[1].anchor_id, "same-1");
    }

    #[test]
    fn footnote_headings_are_skipped() {
        let entries = headings("# Top\n\n[^n]:\n    ## Hidden {#hidden}\n\n## Hidden");
        assert_eq!(
            levels_ids_texts(&entries),
            vec![(1, "top", "Top"), (2, "hidden", "Hidden")]
        );
    }

    #[test]
    fn text_comes_from_first_inline_child() {
        let entries = headings("## **Bold** and plain");
        assert_eq!(entries[0].text, "Bold");
        assert_eq!(entries[0].anchor_id, "bold-and-plain");
    }

    #[test]
    fn setext_headings_count() {
        let entries = headings("Title\n=====\n\nSub\n---");
        assert_eq!(
            levels_ids_texts(&entries),
            vec![(1, "title", "Title"), (2, "sub", "Sub")]
        );
    }

    #[test]
    fn offsets_are_recorded() {
        let entries = headings("# A\n\n## B");
        assert_eq!(entries[0].offset, Some(0));
        assert_eq!(entries[1].offset, Some(5));
    }
}
