//! Style and syntax-highlighter providers for the document `<head>`.

use md2html_core::Md2HtmlError;
use std::fs;
use std::path::PathBuf;
use url::Url;

/// Stylesheet shipped with the crate, used when no style is configured.
pub const DEFAULT_CSS: &str = include_str!("../resources/default.css");

/// Head markup for highlight.js served from cdnjs.
pub const HIGHLIGHT_JS_MARKUP: &str = concat!(
    "    <link rel=\"stylesheet\" href=\"https://cdnjs.cloudflare.com/ajax/libs/highlight.js/10.6.0/styles/default.min.css\">\n",
    "    <script src=\"https://cdnjs.cloudflare.com/ajax/libs/highlight.js/10.6.0/highlight.min.js\"></script>\n",
    "    <script>hljs.highlightAll();</script>",
);

/// Produces one `<style>` block or `<link>` tag for the document head.
pub trait StyleProvider: Send + Sync {
    /// Returns the head markup for this style.
    fn style(&self) -> Result<String, Md2HtmlError>;
}

/// Produces the head markup that enables code highlighting.
pub trait HighlighterProvider: Send + Sync {
    /// Returns the head markup for the highlighter.
    fn markup(&self) -> Result<String, Md2HtmlError>;
}

fn style_block(css: &str) -> String {
    format!("    <style>\n{css}    </style>")
}

/// The embedded default stylesheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStyle;

impl StyleProvider for DefaultStyle {
    fn style(&self) -> Result<String, Md2HtmlError> {
        Ok(style_block(DEFAULT_CSS))
    }
}

/// A local CSS file inlined into a `<style>` block.
#[derive(Debug, Clone)]
pub struct FileStyle {
    path: PathBuf,
}

impl FileStyle {
    /// Fails with [`Md2HtmlError::StyleNotFound`] if `path` is not a file.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, Md2HtmlError> {
        let path = path.into();
        if !path.is_file() {
            return Err(Md2HtmlError::StyleNotFound(path));
        }
        Ok(Self { path })
    }
}

impl StyleProvider for FileStyle {
    fn style(&self) -> Result<String, Md2HtmlError> {
        Ok(style_block(&fs::read_to_string(&self.path)?))
    }
}

/// A remote stylesheet referenced with `<link rel="stylesheet">`.
#[derive(Debug, Clone)]
pub struct UrlStyle {
    url: Url,
}

impl UrlStyle {
    /// Fails with [`Md2HtmlError::InvalidStyleUrl`] if `url` is not absolute.
    pub fn new(url: &str) -> Result<Self, Md2HtmlError> {
        let parsed = Url::parse(url).map_err(|err| Md2HtmlError::InvalidStyleUrl {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self { url: parsed })
    }
}

impl StyleProvider for UrlStyle {
    fn style(&self) -> Result<String, Md2HtmlError> {
        let href = html_escape::encode_double_quoted_attribute(self.url.as_str());
        Ok(format!("    <link rel=\"stylesheet\" href=\"{href}\">"))
    }
}

/// Where a configured style comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSource {
    /// The embedded default stylesheet.
    Default,
    /// A local CSS file.
    File(PathBuf),
    /// An absolute `http://` or `https://` URL.
    Url(String),
}

impl StyleSource {
    /// Classifies a style argument by its `http://`/`https://` prefix.
    pub fn parse(arg: &str) -> Self {
        let arg = arg.trim();
        if arg.starts_with("https://") || arg.starts_with("http://") {
            Self::Url(arg.to_string())
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    /// Builds the provider, validating the source.
    pub fn provider(&self) -> Result<Box<dyn StyleProvider>, Md2HtmlError> {
        Ok(match self {
            Self::Default => Box::new(DefaultStyle),
            Self::File(path) => Box::new(FileStyle::new(path.clone())?),
            Self::Url(url) => Box::new(UrlStyle::new(url)?),
        })
    }
}

/// highlight.js from a CDN.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightJs;

impl HighlighterProvider for HighlightJs {
    fn markup(&self) -> Result<String, Md2HtmlError> {
        Ok(HIGHLIGHT_JS_MARKUP.to_string())
    }
}

/// Highlighter markup read verbatim from a file.
#[derive(Debug, Clone)]
pub struct FileHighlighter {
    path: PathBuf,
}

impl FileHighlighter {
    /// Fails with [`Md2HtmlError::HighlighterNotFound`] if `path` is not a file.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, Md2HtmlError> {
        let path = path.into();
        if !path.is_file() {
            return Err(Md2HtmlError::HighlighterNotFound(path));
        }
        Ok(Self { path })
    }
}

impl HighlighterProvider for FileHighlighter {
    fn markup(&self) -> Result<String, Md2HtmlError> {
        Ok(fs::read_to_string(&self.path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn style_source_by_prefix() {
        assert_eq!(
            StyleSource::parse("https://example.com/a.css"),
            StyleSource::Url("https://example.com/a.css".to_string())
        );
        assert_eq!(
            StyleSource::parse("http://example.com/a.css"),
            StyleSource::Url("http://example.com/a.css".to_string())
        );
        assert_eq!(
            StyleSource::parse("styles/site.css"),
            StyleSource::File(PathBuf::from("styles/site.css"))
        );
        // Only the two schemes count as URLs.
        assert_eq!(
            StyleSource::parse("ftp://example.com/a.css"),
            StyleSource::File(PathBuf::from("ftp://example.com/a.css"))
        );
    }

    #[test]
    fn default_style_wraps_embedded_css() {
        let style = DefaultStyle.style().unwrap();
        assert!(style.starts_with("    <style>\n"));
        assert!(style.ends_with("    </style>"));
        assert!(style.contains(".toc"));
    }

    #[test]
    fn url_style_is_a_link_tag() {
        let style = UrlStyle::new("https://example.com/site.css")
            .unwrap()
            .style()
            .unwrap();
        assert_eq!(
            style,
            "    <link rel=\"stylesheet\" href=\"https://example.com/site.css\">"
        );
    }

    #[test]
    fn malformed_url_is_rejected() {
        let err = StyleSource::parse("https://").provider().err().unwrap();
        assert!(matches!(err, Md2HtmlError::InvalidStyleUrl { .. }));
    }

    #[test]
    fn file_style_inlines_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "body {{ color: red; }}").unwrap();
        let style = FileStyle::new(file.path()).unwrap().style().unwrap();
        assert_eq!(style, "    <style>\nbody { color: red; }\n    </style>");
    }

    #[test]
    fn missing_files_fail_at_construction() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.css");
        assert!(matches!(
            FileStyle::new(&missing),
            Err(Md2HtmlError::StyleNotFound(_))
        ));
        assert!(matches!(
            FileHighlighter::new(&missing),
            Err(Md2HtmlError::HighlighterNotFound(_))
        ));
    }

    #[test]
    fn highlighter_markup() {
        let markup = HighlightJs.markup().unwrap();
        assert_eq!(markup.lines().count(), 3);
        assert!(markup.ends_with("<script>hljs.highlightAll();</script>"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<script src=\"prism.js\"></script>").unwrap();
        let custom = FileHighlighter::new(file.path()).unwrap().markup().unwrap();
        assert_eq!(custom, "<script src=\"prism.js\"></script>");
    }
}
