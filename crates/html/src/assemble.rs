//! Final document assembly.

use crate::features::FeatureFlags;

const MERMAID_MARKUP: &str = concat!(
    "    <script src=\"https://cdn.jsdelivr.net/npm/mermaid/dist/mermaid.min.js\"></script>\n",
    "    <script>mermaid.initialize({startOnLoad:true});</script>",
);

const MATHJAX_MARKUP: &str = "    <script id=\"MathJax-script\" async src=\"https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js\"></script>";

/// Project page written into the `md2html:url` meta tag.
pub const PROJECT_URL: &str = "https://github.com/algonzalez/md-to-html";

/// Values for the generator `<meta>` tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// UTC timestamp, `yyyy-MM-ddTHH:mm:ssZ`.
    pub created_on: String,
    /// Generator version.
    pub version: String,
}

impl Metadata {
    /// Metadata stamped with the current UTC time and this crate's version.
    pub fn now() -> Self {
        Self {
            created_on: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Everything the assembler needs for one document.
#[derive(Debug, Clone, Copy)]
pub struct DocumentParts<'a> {
    /// Resolved document title (unescaped).
    pub title: &'a str,
    /// Features found in the document.
    pub flags: FeatureFlags,
    /// Rendered body markup.
    pub body: &'a str,
    /// Generator metadata; `None` skips the `<meta>` tags.
    pub metadata: Option<&'a Metadata>,
    /// Style markup, one entry per provider, in order.
    pub styles: &'a [String],
    /// Highlighter head markup, used only when the document has code.
    pub highlighter: &'a str,
    /// Emit the body alone, without the document shell.
    pub content_only: bool,
}

/// Composes the final HTML text.
///
/// Head injections follow a fixed order: metadata, highlighter, diagram
/// engine, math engine, styles.
pub fn assemble(parts: &DocumentParts<'_>) -> String {
    if parts.content_only {
        return parts.body.to_string();
    }

    let mut out = String::with_capacity(parts.body.len() + 2048);
    out.push_str("<!DOCTYPE html>\n<html>\n  <head>\n    <title>\n      ");
    out.push_str(&html_escape::encode_text(parts.title));
    out.push_str("\n    </title>\n");

    if let Some(meta) = parts.metadata {
        out.push_str(&format!(
            "    <meta name=\"created-on\" content=\"{}\">\n",
            meta.created_on
        ));
        out.push_str("    <meta name=\"created-with\" content=\"md2html\">\n");
        out.push_str(&format!(
            "    <meta name=\"md2html:url\" content=\"{PROJECT_URL}\">\n"
        ));
        out.push_str(&format!(
            "    <meta name=\"md2html:version\" content=\"{}\">\n",
            html_escape::encode_double_quoted_attribute(&meta.version)
        ));
    }

    if parts.flags.has_code {
        push_line(&mut out, parts.highlighter);
    }
    if parts.flags.has_diagram {
        push_line(&mut out, MERMAID_MARKUP);
    }
    if parts.flags.has_math {
        push_line(&mut out, MATHJAX_MARKUP);
    }
    for style in parts.styles {
        push_line(&mut out, style);
    }

    out.push_str("  </head>\n  <body>\n");
    out.push_str(parts.body);
    if !parts.body.is_empty() && !parts.body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("  </body>\n</html>\n");
    out
}

fn push_line(out: &mut String, markup: &str) {
    out.push_str(markup);
    if !markup.ends_with('\n') {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts<'a>(flags: FeatureFlags, styles: &'a [String]) -> DocumentParts<'a> {
        DocumentParts {
            title: "Doc",
            flags,
            body: "<p>hi</p>\n",
            metadata: None,
            styles,
            highlighter: "    <script>HL</script>",
            content_only: false,
        }
    }

    #[test]
    fn bare_shell() {
        let html = assemble(&parts(FeatureFlags::default(), &[]));
        insta::assert_snapshot!(html, @r"
        <!DOCTYPE html>
        <html>
          <head>
            <title>
              Doc
            </title>
          </head>
          <body>
        <p>hi</p>
          </body>
        </html>
        ");
    }

    #[test]
    fn head_injection_order() {
        let styles = vec!["    <style>S1</style>".to_string(), "    <link S2>".to_string()];
        let flags = FeatureFlags {
            has_code: true,
            has_math: true,
            has_diagram: true,
            has_toc_placeholder: false,
        };
        let html = assemble(&parts(flags, &styles));
        let order = ["HL", "mermaid.min.js", "mermaid.initialize", "MathJax-script", "S1", "S2", "</head>"];
        let positions: Vec<usize> = order.iter().map(|needle| html.find(needle).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{html}");
    }

    #[test]
    fn injections_are_conditional() {
        let html = assemble(&parts(FeatureFlags::default(), &[]));
        assert!(!html.contains("HL"));
        assert!(!html.contains("mermaid"));
        assert!(!html.contains("MathJax"));
    }

    #[test]
    fn metadata_tags() {
        let meta = Metadata {
            created_on: "2021-03-04T05:06:07Z".to_string(),
            version: "1.2.3".to_string(),
        };
        let mut p = parts(FeatureFlags::default(), &[]);
        p.metadata = Some(&meta);
        let html = assemble(&p);
        assert!(html.contains(
            "    </title>\n    <meta name=\"created-on\" content=\"2021-03-04T05:06:07Z\">\n    <meta name=\"created-with\" content=\"md2html\">\n"
        ));
        assert!(html.contains("<meta name=\"md2html:url\" content=\"https://github.com/algonzalez/md-to-html\">"));
        assert!(html.contains("<meta name=\"md2html:version\" content=\"1.2.3\">"));
    }

    #[test]
    fn metadata_timestamp_format() {
        let meta = Metadata::now();
        assert_eq!(meta.created_on.len(), "2021-03-04T05:06:07Z".len());
        assert!(meta.created_on.ends_with('Z'));
        assert_eq!(meta.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn title_is_escaped() {
        let mut p = parts(FeatureFlags::default(), &[]);
        p.title = "A <b> & C";
        assert!(assemble(&p).contains("      A &lt;b&gt; &amp; C\n"));
    }

    #[test]
    fn content_only_is_body_alone() {
        let styles = vec!["    <style></style>".to_string()];
        let mut p = parts(
            FeatureFlags {
                has_code: true,
                has_math: true,
                has_diagram: true,
                has_toc_placeholder: true,
            },
            &styles,
        );
        p.content_only = true;
        let html = assemble(&p);
        assert_eq!(html, "<p>hi</p>\n");
    }
}
