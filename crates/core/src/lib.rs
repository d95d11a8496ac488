#![deny(missing_docs)]
//! md2html core: markdown parsing, front matter helpers, anchor slugs, and errors.

/// Core error types.
pub mod error;
/// Front matter helpers.
pub mod frontmatter;
/// Markdown parsing into an mdast tree.
pub mod parse;
/// Anchor id generation for headings.
pub mod slug;

pub use error::{Md2HtmlError, SourceLocation};
pub use frontmatter::{front_matter_raw, title_from_front_matter};
pub use parse::{ParseOptions, parse_document, parse_mdast};
pub use slug::{Slugger, extract_custom_id};
