//! Markdown parsing into an mdast tree.

use crate::{Md2HtmlError, SourceLocation};
use markdown::mdast::{Node, Paragraph, Root, Text};
use markdown::message::{Message, Place};
use serde::{Deserialize, Serialize};

/// Parser options for building markdown-rs parse options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Enable GitHub Flavored Markdown constructs.
    pub gfm: bool,
    /// Enable YAML front matter parsing.
    pub frontmatter: bool,
    /// Enable math constructs (`$inline$` and `$$block$$`).
    pub math: bool,
    /// Parse raw HTML into HTML nodes.
    pub raw_html: bool,
}

impl ParseOptions {
    /// Defaults used by the converter: every supported extension enabled.
    pub const fn full() -> Self {
        Self {
            gfm: true,
            frontmatter: true,
            math: true,
            raw_html: true,
        }
    }

    /// Plain CommonMark with no extensions.
    pub const fn commonmark() -> Self {
        Self {
            gfm: false,
            frontmatter: false,
            math: false,
            raw_html: true,
        }
    }

    /// Convert to markdown-rs `ParseOptions`.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs {
            frontmatter: self.frontmatter,
            html_flow: self.raw_html,
            html_text: self.raw_html,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        if self.math {
            constructs.math_flow = true;
            constructs.math_text = true;
        }

        markdown::ParseOptions {
            constructs,
            math_text_single_dollar: self.math,
            ..markdown::ParseOptions::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::full()
    }
}

/// Parse markdown into an mdast tree, surfacing parser messages as errors.
pub fn parse_mdast(input: &str, options: &ParseOptions) -> Result<Node, Md2HtmlError> {
    markdown::to_mdast(input, &options.to_markdown()).map_err(|err| Md2HtmlError::Parse {
        message: err.to_string(),
        location: message_location(&err),
    })
}

/// Parse markdown into an mdast tree. Never fails.
///
/// markdown-rs only reports messages for constructs that are disabled here
/// (MDX), but if one does come back the text is kept as a single literal
/// paragraph so that conversion can still produce a document.
pub fn parse_document(input: &str, options: &ParseOptions) -> Node {
    match parse_mdast(input, options) {
        Ok(root) => root,
        Err(err) => {
            log::warn!("{err}; rendering source as plain text");
            literal_tree(input)
        }
    }
}

fn literal_tree(input: &str) -> Node {
    let mut children = Vec::new();
    if !input.trim().is_empty() {
        children.push(Node::Paragraph(Paragraph {
            children: vec![Node::Text(Text {
                value: input.trim().to_string(),
                position: None,
            })],
            position: None,
        }));
    }
    Node::Root(Root {
        children,
        position: None,
    })
}

fn message_location(message: &Message) -> SourceLocation {
    match &message.place {
        Some(place) => match place.as_ref() {
            Place::Point(point) => SourceLocation::new(point.line, point.column),
            Place::Position(position) => {
                SourceLocation::new(position.start.line, position.start.column)
            }
        },
        None => SourceLocation::new(1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_children(node: &Node) -> &Vec<Node> {
        node.children().expect("root has children")
    }

    #[test]
    fn parses_front_matter_as_yaml_node() {
        let tree = parse_document("---\ntitle: Hi\n---\n\n# Body", &ParseOptions::full());
        let children = root_children(&tree);
        assert!(matches!(children[0], Node::Yaml(_)));
        assert!(matches!(children[1], Node::Heading(_)));
    }

    #[test]
    fn commonmark_leaves_front_matter_alone() {
        let tree = parse_document("---\ntitle: Hi\n---\n", &ParseOptions::commonmark());
        let children = root_children(&tree);
        assert!(!children.iter().any(|n| matches!(n, Node::Yaml(_))));
    }

    #[test]
    fn parses_math_when_enabled() {
        let tree = parse_document("$$\nx^2\n$$", &ParseOptions::full());
        assert!(matches!(root_children(&tree)[0], Node::Math(_)));
    }

    #[test]
    fn parses_gfm_tables() {
        let tree = parse_document("| a | b |\n|---|---|\n| 1 | 2 |", &ParseOptions::full());
        assert!(matches!(root_children(&tree)[0], Node::Table(_)));
    }

    #[test]
    fn empty_input_yields_empty_root() {
        let tree = parse_document("", &ParseOptions::default());
        assert!(root_children(&tree).is_empty());
    }

    #[test]
    fn literal_tree_keeps_text() {
        let tree = literal_tree("  some <text>  ");
        match &root_children(&tree)[0] {
            Node::Paragraph(p) => match &p.children[0] {
                Node::Text(t) => assert_eq!(t.value, "some <text>"),
                other => panic!("expected text, got {other:?}"),
            },
            other => panic!("expected paragraph, got {other:?}"),
        }
    }
}
