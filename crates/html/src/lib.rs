#![deny(missing_docs)]
//! md2html document generation.
//!
//! Turns a parsed markdown tree into a complete HTML page: feature
//! detection, title resolution, table of contents, body rendering, and
//! assembly of the `<head>` around it. [`Converter`] ties the stages
//! together behind one immutable configuration.
//!
//! ```
//! use md2html_html::{ConvertOptions, Converter};
//!
//! let converter = Converter::new(ConvertOptions {
//!     content_only: true,
//!     ..Default::default()
//! })
//! .unwrap();
//! let html = converter.convert("# Hello\n\n[toc]", "hello");
//! assert!(html.contains("<a href=\"#hello\">Hello</a>"));
//! ```

/// Final document assembly.
pub mod assemble;
/// The conversion pipeline.
pub mod convert;
/// Feature detection.
pub mod features;
/// Heading entries shared by the TOC and the renderer.
pub mod headings;
/// Style and highlighter providers.
pub mod providers;
/// Body rendering.
pub mod renderer;
/// Title resolution.
pub mod title;
/// Table of contents generation.
pub mod toc;

pub use assemble::{DocumentParts, Metadata, assemble};
pub use convert::{ConvertOptions, Converter};
pub use features::{FeatureFlags, scan};
pub use headings::{HeadingEntry, collect_headings};
pub use providers::{
    DefaultStyle, FileHighlighter, FileStyle, HighlightJs, HighlighterProvider, StyleProvider,
    StyleSource, UrlStyle,
};
pub use renderer::{render, render_document};
pub use title::resolve_title;
pub use toc::{DEFAULT_TOC_CLASS, build_toc, render_toc};
