//! The conversion pipeline and its immutable configuration.

use crate::assemble::{DocumentParts, Metadata, assemble};
use crate::features::scan;
use crate::headings::collect_headings;
use crate::providers::{FileHighlighter, HighlightJs, HighlighterProvider, StyleSource};
use crate::renderer::{self, render_document};
use crate::title::resolve_title;
use crate::toc::{DEFAULT_TOC_CLASS, render_toc};
use md2html_core::{Md2HtmlError, ParseOptions, parse_document};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User-facing conversion settings.
///
/// Every field has a default, so a partial JSON config deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Emit the rendered body only.
    pub content_only: bool,
    /// Leave out the generator `<meta>` tags.
    pub skip_meta: bool,
    /// Leave `[toc]` placeholders as literal text.
    pub skip_toc: bool,
    /// Class of the TOC container; blank means `toc`.
    pub toc_class: String,
    /// Style sources (file paths or `http(s)://` URLs), in order.
    pub styles: Vec<String>,
    /// File with custom highlighter markup.
    pub highlighter: Option<PathBuf>,
    /// Pass raw HTML through unescaped.
    pub allow_raw_html: bool,
    /// Markdown extensions.
    pub parse: ParseOptions,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            content_only: false,
            skip_meta: false,
            skip_toc: false,
            toc_class: DEFAULT_TOC_CLASS.to_string(),
            styles: Vec::new(),
            highlighter: None,
            allow_raw_html: true,
            parse: ParseOptions::full(),
        }
    }
}

/// A validated, ready-to-use conversion configuration.
///
/// Provider output and the creation timestamp are resolved once in
/// [`Converter::new`]; converting never touches the filesystem, so one
/// converter can be shared across threads.
#[derive(Debug, Clone)]
pub struct Converter {
    content_only: bool,
    skip_toc: bool,
    toc_class: String,
    parse: ParseOptions,
    render: renderer::Options,
    styles: Vec<String>,
    highlighter: String,
    metadata: Option<Metadata>,
}

impl Converter {
    /// Validates `options` and resolves every provider.
    pub fn new(options: ConvertOptions) -> Result<Self, Md2HtmlError> {
        let sources: Vec<StyleSource> = if options.styles.is_empty() {
            vec![StyleSource::Default]
        } else {
            options.styles.iter().map(|s| StyleSource::parse(s)).collect()
        };
        let styles = sources
            .iter()
            .map(|source| source.provider()?.style())
            .collect::<Result<Vec<_>, _>>()?;

        let highlighter = match options.highlighter.as_deref() {
            Some(path) if !path.as_os_str().is_empty() => FileHighlighter::new(path)?.markup()?,
            _ => HighlightJs.markup()?,
        };

        let toc_class = match options.toc_class.trim() {
            "" => DEFAULT_TOC_CLASS.to_string(),
            class => class.to_string(),
        };

        log::debug!(
            "converter ready: {} style(s), toc class '{}'",
            styles.len(),
            toc_class
        );

        Ok(Self {
            content_only: options.content_only,
            skip_toc: options.skip_toc,
            toc_class,
            parse: options.parse,
            render: renderer::Options {
                allow_raw_html: options.allow_raw_html,
            },
            styles,
            highlighter,
            metadata: (!options.skip_meta).then(Metadata::now),
        })
    }

    /// Converts markdown `text` to HTML.
    ///
    /// `fallback_title` is used when neither front matter nor a level-1
    /// heading provides a title.
    pub fn convert(&self, text: &str, fallback_title: &str) -> String {
        let tree = parse_document(text, &self.parse);
        let flags = scan(&tree, text);
        let title = resolve_title(&tree, fallback_title);
        let headings = collect_headings(&tree);

        let toc = if flags.has_toc_placeholder && !self.skip_toc {
            let fragment = render_toc(&headings, &self.toc_class);
            if fragment.is_empty() {
                log::debug!("TOC placeholder found but the document has no headings");
                None
            } else {
                Some(fragment)
            }
        } else {
            None
        };

        let body = render_document(&tree, &headings, toc.as_deref(), &self.render);
        assemble(&DocumentParts {
            title: &title,
            flags,
            body: &body,
            metadata: self.metadata.as_ref(),
            styles: &self.styles,
            highlighter: &self.highlighter,
            content_only: self.content_only,
        })
    }
}
