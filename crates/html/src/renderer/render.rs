//! Per-node rendering functions for the mdast renderer.

use super::context::{Context, Scope, normalize_identifier};
use crate::features::{is_diagram, is_toc_placeholder};
use crate::headings::custom_id;
use markdown::mdast::{AlignKind, Node};

/// Renders a paragraph, or the TOC fragment in place of a `[toc]` paragraph.
///
/// Without a TOC fragment the placeholder renders like any other paragraph.
fn render_paragraph(para: &markdown::mdast::Paragraph, ctx: &mut Context) {
    if let Some(toc) = ctx.toc()
        && is_toc_placeholder(para)
    {
        ctx.newline();
        ctx.push_raw(toc);
        ctx.newline();
        return;
    }

    let in_tight_list = ctx.is_in_tight_list();
    if !in_tight_list {
        ctx.newline();
        ctx.push_raw("<p>");
    }

    for child in &para.children {
        render_node(child, ctx);
    }

    if !in_tight_list {
        ctx.push_raw("</p>");
        ctx.newline();
    }
}

/// Renders a heading with the anchor id assigned during heading collection.
fn render_heading(heading: &markdown::mdast::Heading, ctx: &mut Context) {
    let id = ctx.heading_id(heading);
    let tag = format!("h{}", heading.depth);

    ctx.newline();
    ctx.push_raw(&format!("<{tag} id=\""));
    ctx.push_attr_value(&id);
    ctx.push_raw("\">");

    if custom_id(&heading.children).is_some() {
        render_heading_children(&heading.children, ctx);
    } else {
        for child in &heading.children {
            render_node(child, ctx);
        }
    }

    ctx.push_raw(&format!("</{tag}>"));
    ctx.newline();
}

/// Renders heading children, stripping the trailing `{#...}` from the deepest last Text descendant.
fn render_heading_children(children: &[Node], ctx: &mut Context) {
    let Some((last, rest)) = children.split_last() else {
        return;
    };
    for child in rest {
        render_node(child, ctx);
    }
    render_node_stripping_custom_id(last, ctx);
}

fn render_node_stripping_custom_id(node: &Node, ctx: &mut Context) {
    match node {
        Node::Text(text) => match text.value.rfind("{#") {
            Some(pos) => ctx.push_text(text.value[..pos].trim_end()),
            None => ctx.push_text(&text.value),
        },
        Node::Strong(strong) => {
            ctx.push_raw("<strong>");
            render_heading_children(&strong.children, ctx);
            ctx.push_raw("</strong>");
        }
        Node::Emphasis(em) => {
            ctx.push_raw("<em>");
            render_heading_children(&em.children, ctx);
            ctx.push_raw("</em>");
        }
        Node::Delete(del) => {
            ctx.push_raw("<del>");
            render_heading_children(&del.children, ctx);
            ctx.push_raw("</del>");
        }
        _ => render_node(node, ctx),
    }
}

/// Renders a list node as `<ul>` or `<ol>`.
fn render_list(list: &markdown::mdast::List, ctx: &mut Context) {
    ctx.newline();
    if list.ordered {
        match list.start {
            Some(start) if start != 1 => ctx.push_raw(&format!("<ol start=\"{start}\">")),
            _ => ctx.push_raw("<ol>"),
        }
    } else {
        ctx.push_raw("<ul>");
    }
    ctx.newline();
    ctx.enter(Scope::List {
        spread: list.spread,
    });

    for child in &list.children {
        render_node(child, ctx);
    }

    ctx.exit();
    ctx.push_raw(if list.ordered { "</ol>" } else { "</ul>" });
    ctx.newline();
}

/// Renders a list item, with a disabled checkbox for GFM task items.
fn render_list_item(item: &markdown::mdast::ListItem, ctx: &mut Context) {
    match item.checked {
        Some(checked) => {
            ctx.push_raw("<li class=\"task-list-item\">");
            ctx.push_raw(if checked {
                "<input type=\"checkbox\" disabled checked /> "
            } else {
                "<input type=\"checkbox\" disabled /> "
            });
        }
        None => ctx.push_raw("<li>"),
    }

    for child in &item.children {
        render_node(child, ctx);
    }

    ctx.push_raw("</li>");
    ctx.newline();
}

/// Renders a code block; mermaid blocks are left for the diagram engine.
fn render_code(code: &markdown::mdast::Code, ctx: &mut Context) {
    ctx.newline();
    if is_diagram(code) {
        ctx.push_raw("<pre class=\"mermaid\">");
        ctx.push_text(&code.value);
        ctx.push_raw("</pre>");
    } else {
        ctx.push_raw("<pre><code");
        if let Some(lang) = &code.lang {
            ctx.push_raw(" class=\"language-");
            ctx.push_attr_value(lang);
            ctx.push_raw("\"");
        }
        ctx.push_raw(">");
        if !code.value.is_empty() {
            ctx.push_text(&code.value);
            ctx.push_raw("\n");
        }
        ctx.push_raw("</code></pre>");
    }
    ctx.newline();
}

/// Renders display math with MathJax delimiters.
fn render_math(math: &markdown::mdast::Math, ctx: &mut Context) {
    ctx.newline();
    ctx.push_raw("<div class=\"math\">\\[\n");
    ctx.push_text(&math.value);
    ctx.push_raw("\n\\]</div>");
    ctx.newline();
}

fn render_link(url: &str, title: Option<&str>, children: &[Node], ctx: &mut Context) {
    ctx.push_raw("<a href=\"");
    ctx.push_attr_value(url);
    ctx.push_raw("\"");
    if let Some(title) = title {
        ctx.push_raw(" title=\"");
        ctx.push_attr_value(title);
        ctx.push_raw("\"");
    }
    ctx.push_raw(">");
    for child in children {
        render_node(child, ctx);
    }
    ctx.push_raw("</a>");
}

fn render_image(url: &str, alt: &str, title: Option<&str>, ctx: &mut Context) {
    ctx.push_raw("<img src=\"");
    ctx.push_attr_value(url);
    ctx.push_raw("\" alt=\"");
    ctx.push_attr_value(alt);
    ctx.push_raw("\"");
    if let Some(title) = title {
        ctx.push_raw(" title=\"");
        ctx.push_attr_value(title);
        ctx.push_raw("\"");
    }
    ctx.push_raw(" />");
}

fn render_link_reference(link: &markdown::mdast::LinkReference, ctx: &mut Context) {
    match ctx.definition(&link.identifier) {
        Some(def) => render_link(&def.url, def.title.as_deref(), &link.children, ctx),
        None => {
            ctx.push_text("[");
            for child in &link.children {
                render_node(child, ctx);
            }
            ctx.push_text("]");
        }
    }
}

fn render_image_reference(image: &markdown::mdast::ImageReference, ctx: &mut Context) {
    match ctx.definition(&image.identifier) {
        Some(def) => render_image(&def.url, &image.alt, def.title.as_deref(), ctx),
        None => ctx.push_text(&format!("![{}]", image.alt)),
    }
}

/// Renders a block quote node as `<blockquote>`.
fn render_blockquote(quote: &markdown::mdast::Blockquote, ctx: &mut Context) {
    ctx.newline();
    ctx.push_raw("<blockquote>");
    ctx.newline();
    ctx.enter(Scope::Quote);
    for child in &quote.children {
        render_node(child, ctx);
    }
    ctx.exit();
    ctx.push_raw("</blockquote>");
    ctx.newline();
}

/// Renders a table node as `<table>` with `<thead>` and optional `<tbody>`.
fn render_table(table: &markdown::mdast::Table, ctx: &mut Context) {
    ctx.newline();
    ctx.enter(Scope::Table);
    ctx.push_raw("<table>");
    ctx.newline();

    ctx.push_raw("<thead>");
    ctx.newline();
    if let Some(Node::TableRow(row)) = table.children.first() {
        render_table_row(row, ctx, true, &table.align);
    }
    ctx.push_raw("</thead>");
    ctx.newline();

    if table.children.len() > 1 {
        ctx.push_raw("<tbody>");
        ctx.newline();
        for row in table.children.iter().skip(1) {
            if let Node::TableRow(r) = row {
                render_table_row(r, ctx, false, &table.align);
            }
        }
        ctx.push_raw("</tbody>");
        ctx.newline();
    }

    ctx.push_raw("</table>");
    ctx.exit();
    ctx.newline();
}

/// Helper function to render a table row with proper alignment.
fn render_table_row(
    row: &markdown::mdast::TableRow,
    ctx: &mut Context,
    is_header: bool,
    aligns: &[AlignKind],
) {
    let tag = if is_header { "th" } else { "td" };
    ctx.push_raw("<tr>");
    ctx.newline();

    for (i, cell) in row.children.iter().enumerate() {
        if let Node::TableCell(c) = cell {
            let align_attr = match aligns.get(i) {
                Some(AlignKind::Left) => " align=\"left\"",
                Some(AlignKind::Right) => " align=\"right\"",
                Some(AlignKind::Center) => " align=\"center\"",
                Some(AlignKind::None) | None => "",
            };
            ctx.push_raw(&format!("<{tag}{align_attr}>"));
            for child in &c.children {
                render_node(child, ctx);
            }
            ctx.push_raw(&format!("</{tag}>"));
            ctx.newline();
        }
    }

    ctx.push_raw("</tr>");
    ctx.newline();
}

/// Renders raw HTML, either as passthrough or escaped based on options.
fn render_html(html: &markdown::mdast::Html, ctx: &mut Context) {
    if ctx.raw_html_allowed() {
        ctx.push_raw(&html.value);
    } else {
        log::debug!("escaping raw HTML: {}", html.value);
        ctx.push_text(&html.value);
    }
}

/// Renders a footnote reference as a superscript link to its note.
///
/// Notes are numbered by first reference; repeated references get
/// suffixed ids (`fnref-x`, `fnref-x-2`, ...).
fn render_footnote_reference(fnref: &markdown::mdast::FootnoteReference, ctx: &mut Context) {
    let Some((ordinal, nth)) = ctx.reference_footnote(&fnref.identifier) else {
        let label = fnref.label.as_deref().unwrap_or(&fnref.identifier);
        ctx.push_text(&format!("[^{label}]"));
        return;
    };
    let id = footnote_slug(&normalize_identifier(&fnref.identifier));

    ctx.push_raw("<sup><a href=\"#fn-");
    ctx.push_attr_value(&id);
    ctx.push_raw("\" id=\"fnref-");
    ctx.push_attr_value(&id);
    if nth > 1 {
        ctx.push_raw(&format!("-{nth}"));
    }
    ctx.push_raw("\" class=\"footnote-ref\">");
    ctx.push_raw(&ordinal.to_string());
    ctx.push_raw("</a></sup>");
}

/// Appends the footnotes section for every referenced footnote.
///
/// Bodies are rendered in reference order; rendering one body may reference
/// further footnotes, which are appended to the same list.
pub fn render_footnotes(ctx: &mut Context) {
    let mut bodies = Vec::new();
    let mut index = 0;
    while let Some((id, def)) = ctx
        .referenced_footnote(index)
        .map(|(id, def)| (id.to_string(), def))
    {
        let body = ctx.capture(|c| {
            c.enter(Scope::Quote);
            for child in &def.children {
                render_node(child, c);
            }
            c.exit();
        });
        bodies.push((id, body));
        index += 1;
    }

    if bodies.is_empty() {
        return;
    }

    let mut section = String::from("<section class=\"footnotes\">\n<ol>\n");
    for (id, body) in &bodies {
        let slug = html_escape::encode_double_quoted_attribute(&footnote_slug(id)).into_owned();
        let backrefs = (1..=ctx.footnote_ref_count(id))
            .map(|n| {
                let suffix = if n > 1 { format!("-{n}") } else { String::new() };
                format!("<a href=\"#fnref-{slug}{suffix}\" class=\"footnote-backref\">↩</a>")
            })
            .collect::<Vec<_>>()
            .join(" ");

        section.push_str(&format!("<li id=\"fn-{slug}\">\n"));
        match body.strip_suffix("</p>\n") {
            Some(head) => {
                section.push_str(head);
                section.push(' ');
                section.push_str(&backrefs);
                section.push_str("</p>\n");
            }
            None => {
                section.push_str(body);
                section.push_str(&backrefs);
                section.push('\n');
            }
        }
        section.push_str("</li>\n");
    }
    section.push_str("</ol>\n</section>");

    ctx.newline();
    ctx.push_raw(&section);
    ctx.newline();
}

fn footnote_slug(id: &str) -> String {
    id.replace(char::is_whitespace, "-")
}

/// Renders one node and its descendants, dispatching on the node variant.
pub fn render_node(node: &Node, ctx: &mut Context) {
    match node {
        Node::Root(root) => {
            for child in &root.children {
                render_node(child, ctx);
            }
        }
        Node::Paragraph(para) => render_paragraph(para, ctx),
        Node::Heading(heading) => render_heading(heading, ctx),
        Node::Text(text) => ctx.push_text(&text.value),
        Node::Strong(strong) => {
            ctx.push_raw("<strong>");
            for child in &strong.children {
                render_node(child, ctx);
            }
            ctx.push_raw("</strong>");
        }
        Node::Emphasis(emphasis) => {
            ctx.push_raw("<em>");
            for child in &emphasis.children {
                render_node(child, ctx);
            }
            ctx.push_raw("</em>");
        }
        Node::Delete(delete) => {
            ctx.push_raw("<del>");
            for child in &delete.children {
                render_node(child, ctx);
            }
            ctx.push_raw("</del>");
        }
        Node::InlineCode(code) => {
            ctx.push_raw("<code>");
            ctx.push_text(&code.value);
            ctx.push_raw("</code>");
        }
        Node::InlineMath(math) => {
            ctx.push_raw("<span class=\"math\">\\(");
            ctx.push_text(&math.value);
            ctx.push_raw("\\)</span>");
        }
        Node::Break(_) => ctx.push_raw("<br />\n"),
        Node::Link(link) => render_link(&link.url, link.title.as_deref(), &link.children, ctx),
        Node::LinkReference(link) => render_link_reference(link, ctx),
        Node::Image(img) => render_image(&img.url, &img.alt, img.title.as_deref(), ctx),
        Node::ImageReference(img) => render_image_reference(img, ctx),
        Node::List(list) => render_list(list, ctx),
        Node::ListItem(item) => render_list_item(item, ctx),
        Node::Code(code) => render_code(code, ctx),
        Node::Math(math) => render_math(math, ctx),
        Node::Blockquote(quote) => render_blockquote(quote, ctx),
        Node::ThematicBreak(_) => {
            ctx.newline();
            ctx.push_raw("<hr />");
            ctx.newline();
        }
        Node::Html(html) => render_html(html, ctx),
        Node::Table(table) => render_table(table, ctx),
        Node::TableRow(_) | Node::TableCell(_) => {
            if !ctx.is_in_table() {
                log::warn!("table row outside of a table; skipped");
            }
        }
        Node::FootnoteReference(fnref) => render_footnote_reference(fnref, ctx),
        // Rendered at the end (footnotes) or not at all (metadata, definitions).
        Node::FootnoteDefinition(_) | Node::Definition(_) | Node::Yaml(_) | Node::Toml(_) => {}
        _ => {
            log::warn!("Unhandled markdown node type: {:?}", node);
        }
    }
}
