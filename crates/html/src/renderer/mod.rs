//! MDAST-based body renderer.
//!
//! Renders a parsed document tree to body markup with one dispatch arm per
//! node variant. The paragraph arm substitutes the TOC fragment for a
//! `[toc]` placeholder paragraph; the tree itself is never modified.
//!
//! # Module Structure
//!
//! - `context` - Rendering state carried through one traversal
//! - `render` - Per-node rendering functions

mod context;
pub mod render;

pub use context::{Context, Scope};

use crate::headings::{HeadingEntry, collect_headings};
use markdown::mdast::Node;
use render::{render_footnotes, render_node};

/// Rendering options for the body renderer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Options {
    /// Whether raw HTML in the source passes through unescaped.
    #[serde(default = "default_allow_raw_html")]
    pub allow_raw_html: bool,
}

fn default_allow_raw_html() -> bool {
    true
}

impl Default for Options {
    fn default() -> Self {
        Self {
            allow_raw_html: default_allow_raw_html(),
        }
    }
}

/// Renders `tree` to body markup.
///
/// `headings` must come from [`collect_headings`] over the same tree; the
/// rendered `id` attributes are taken from it. An empty `toc` is treated as
/// no TOC at all, so the placeholder keeps its literal rendering.
pub fn render_document(
    tree: &Node,
    headings: &[HeadingEntry],
    toc: Option<&str>,
    options: &Options,
) -> String {
    let toc = toc.filter(|fragment| !fragment.is_empty());
    let mut ctx = Context::new(tree, options, headings, toc);
    render_node(tree, &mut ctx);
    render_footnotes(&mut ctx);
    ctx.html
}

/// Renders `tree` with default options, collecting its headings first.
pub fn render(tree: &Node, toc: Option<&str>) -> String {
    let headings = collect_headings(tree);
    render_document(tree, &headings, toc, &Options::default())
}
