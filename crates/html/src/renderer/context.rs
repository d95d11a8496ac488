//! Rendering context for the mdast renderer.

use super::Options;
use crate::headings::{HeadingEntry, heading_text};
use markdown::mdast::{Definition, FootnoteDefinition, Heading, Node};
use md2html_core::Slugger;
use std::collections::HashMap;

/// Which block element the renderer is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Document root.
    Root,
    /// Inside `<ul>`/`<ol>`; `spread` lists keep their `<p>` wrappers.
    List {
        /// Loose list.
        spread: bool,
    },
    /// Inside `<blockquote>` or a footnote body.
    Quote,
    /// Inside `<table>`.
    Table,
}

/// Mutable state carried through one render of one tree.
pub struct Context<'a> {
    /// Rendered HTML so far.
    pub html: String,

    options: &'a Options,
    toc: Option<&'a str>,
    stack: Vec<Scope>,

    headings: &'a [HeadingEntry],
    heading_by_offset: HashMap<usize, usize>,
    next_heading: usize,
    // Ids for headings without a collected entry, such as those in footnotes.
    fallback_slugger: Slugger,

    definitions: HashMap<String, &'a Definition>,
    footnote_definitions: HashMap<String, &'a FootnoteDefinition>,
    footnote_order: Vec<String>,
    footnote_refs: HashMap<String, usize>,
}

impl<'a> Context<'a> {
    /// Creates a context for rendering `tree`.
    ///
    /// Link and footnote definitions are indexed up front so references
    /// can be resolved wherever they appear.
    pub fn new(
        tree: &'a Node,
        options: &'a Options,
        headings: &'a [HeadingEntry],
        toc: Option<&'a str>,
    ) -> Self {
        let heading_by_offset = headings
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| entry.offset.map(|offset| (offset, i)))
            .collect();
        let mut fallback_slugger = Slugger::new();
        for entry in headings {
            fallback_slugger.reserve(&entry.anchor_id);
        }

        let mut ctx = Self {
            html: String::with_capacity(4096),
            options,
            toc,
            stack: vec![Scope::Root],
            headings,
            heading_by_offset,
            next_heading: 0,
            fallback_slugger,
            definitions: HashMap::new(),
            footnote_definitions: HashMap::new(),
            footnote_order: Vec::new(),
            footnote_refs: HashMap::new(),
        };
        ctx.index_definitions(tree);
        ctx
    }

    fn index_definitions(&mut self, node: &'a Node) {
        match node {
            Node::Definition(def) => {
                // First definition wins, as in CommonMark.
                self.definitions
                    .entry(normalize_identifier(&def.identifier))
                    .or_insert(def);
            }
            Node::FootnoteDefinition(def) => {
                self.footnote_definitions
                    .entry(normalize_identifier(&def.identifier))
                    .or_insert(def);
            }
            _ => {}
        }
        if let Some(children) = node.children() {
            for child in children {
                self.index_definitions(child);
            }
        }
    }

    /// Writes a raw string without escaping (for markup we generate).
    pub fn push_raw(&mut self, s: &str) {
        self.html.push_str(s);
    }

    /// Writes text content with HTML escaping.
    pub fn push_text(&mut self, s: &str) {
        self.html.push_str(&html_escape::encode_text(s));
    }

    /// Writes an attribute value with HTML escaping.
    pub fn push_attr_value(&mut self, s: &str) {
        self.html
            .push_str(&html_escape::encode_double_quoted_attribute(s));
    }

    /// Ends a block element's line.
    pub fn newline(&mut self) {
        if !self.html.is_empty() && !self.html.ends_with('\n') {
            self.html.push('\n');
        }
    }

    /// The TOC fragment that replaces a `[toc]` paragraph, if any.
    pub fn toc(&self) -> Option<&'a str> {
        self.toc
    }

    /// Returns true if raw HTML nodes pass through unescaped.
    pub fn raw_html_allowed(&self) -> bool {
        self.options.allow_raw_html
    }

    /// Enters a new scope by pushing it onto the stack.
    pub fn enter(&mut self, scope: Scope) {
        self.stack.push(scope);
    }

    /// Exits the current scope by popping from the stack.
    pub fn exit(&mut self) -> Option<Scope> {
        self.stack.pop()
    }

    /// Returns true when the nearest enclosing list is tight.
    ///
    /// Paragraphs directly in tight list items render without `<p>`.
    pub fn is_in_tight_list(&self) -> bool {
        match self.stack.last() {
            Some(Scope::List { spread }) => !spread,
            _ => false,
        }
    }

    /// Returns true when inside a table.
    pub fn is_in_table(&self) -> bool {
        self.stack.iter().any(|scope| matches!(scope, Scope::Table))
    }

    /// Anchor id for a heading, matched to its collected entry.
    pub fn heading_id(&mut self, heading: &Heading) -> String {
        let index = heading
            .position
            .as_ref()
            .and_then(|p| self.heading_by_offset.get(&p.start.offset).copied())
            .or_else(|| {
                let i = self.next_heading;
                (i < self.headings.len() && self.headings[i].offset.is_none()).then_some(i)
            });

        match index {
            Some(i) => {
                self.next_heading = i + 1;
                self.headings[i].anchor_id.clone()
            }
            None => {
                log::debug!("heading without a collected entry; generating id");
                self.fallback_slugger
                    .next_slug(&heading_text(&heading.children))
            }
        }
    }

    /// Looks up a link reference definition.
    pub fn definition(&self, identifier: &str) -> Option<&'a Definition> {
        self.definitions
            .get(&normalize_identifier(identifier))
            .copied()
    }

    /// Records a footnote reference and returns `(ordinal, nth reference)`.
    ///
    /// Ordinals follow the order in which footnotes are first referenced.
    pub fn reference_footnote(&mut self, identifier: &str) -> Option<(usize, usize)> {
        let id = normalize_identifier(identifier);
        if !self.footnote_definitions.contains_key(&id) {
            return None;
        }
        let ordinal = match self.footnote_order.iter().position(|known| *known == id) {
            Some(i) => i + 1,
            None => {
                self.footnote_order.push(id.clone());
                self.footnote_order.len()
            }
        };
        let count = self.footnote_refs.entry(id).or_insert(0);
        *count += 1;
        Some((ordinal, *count))
    }

    /// Footnote definition at a given position in reference order.
    pub fn referenced_footnote(&self, index: usize) -> Option<(&str, &'a FootnoteDefinition)> {
        let id = self.footnote_order.get(index)?;
        let def = self.footnote_definitions.get(id)?;
        Some((id.as_str(), *def))
    }

    /// How many times a footnote was referenced.
    pub fn footnote_ref_count(&self, id: &str) -> usize {
        self.footnote_refs.get(id).copied().unwrap_or(0)
    }

    /// Runs `f` with an empty output buffer and returns what it wrote.
    pub fn capture(&mut self, f: impl FnOnce(&mut Self)) -> String {
        let saved = std::mem::take(&mut self.html);
        f(self);
        std::mem::replace(&mut self.html, saved)
    }
}

/// Case-folds and collapses whitespace in a reference label.
pub(crate) fn normalize_identifier(identifier: &str) -> String {
    identifier
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
