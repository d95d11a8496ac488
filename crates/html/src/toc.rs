//! Table of contents generation.

use crate::headings::{HeadingEntry, collect_headings};
use html_escape::{encode_double_quoted_attribute, encode_text};
use markdown::mdast::Node;

/// Class applied to the TOC container when none is configured.
pub const DEFAULT_TOC_CLASS: &str = "toc";

/// Builds the TOC fragment for every heading in the tree.
///
/// Returns an empty string when the tree has no headings.
pub fn build_toc(tree: &Node, class_name: &str) -> String {
    render_toc(&collect_headings(tree), class_name)
}

/// Renders heading entries as nested lists inside a `<div class="...">`.
///
/// A rise in level opens one `<ul>` per step; a drop closes lists until the
/// new level is reached. Each entry yields exactly one `<li>`, and a list
/// opened while an item is open nests inside that item.
pub fn render_toc(entries: &[HeadingEntry], class_name: &str) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut writer = TocWriter::default();
    writer.out.push_str("<div class=\"");
    writer
        .out
        .push_str(&encode_double_quoted_attribute(class_name));
    writer.out.push_str("\">\n");

    for entry in entries {
        let level = usize::from(entry.level.max(1));
        while writer.depth() < level {
            writer.open_list();
        }
        while writer.depth() > level {
            writer.close_list();
        }
        writer.item(entry);
    }
    while writer.depth() > 0 {
        writer.close_list();
    }

    writer.out.push_str("</div>");
    writer.out
}

/// State of the last item in an open list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    None,
    /// `<li>` written on the current line, nothing nested yet.
    Inline,
    /// `<li>` holds a nested list.
    Nested,
}

#[derive(Default)]
struct TocWriter {
    out: String,
    lists: Vec<Item>,
}

impl TocWriter {
    fn depth(&self) -> usize {
        self.lists.len()
    }

    fn line(&mut self, indent: usize, text: &str) {
        for _ in 0..indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open_list(&mut self) {
        if let Some(parent) = self.lists.last_mut()
            && *parent == Item::Inline
        {
            *parent = Item::Nested;
            self.out.push('\n');
        }
        let indent = self.depth();
        self.line(indent, "<ul>");
        self.lists.push(Item::None);
    }

    fn close_item(&mut self) {
        let indent = self.depth();
        match self.lists.last().copied() {
            Some(Item::Inline) => self.out.push_str("</li>\n"),
            Some(Item::Nested) => self.line(indent, "</li>"),
            Some(Item::None) | None => {}
        }
        if let Some(last) = self.lists.last_mut() {
            *last = Item::None;
        }
    }

    fn close_list(&mut self) {
        self.close_item();
        self.lists.pop();
        let indent = self.depth();
        self.line(indent, "</ul>");
    }

    fn item(&mut self, entry: &HeadingEntry) {
        self.close_item();
        for _ in 0..self.depth() {
            self.out.push_str("  ");
        }
        self.out.push_str("<li><a href=\"#");
        self.out
            .push_str(&encode_double_quoted_attribute(&entry.anchor_id));
        self.out.push_str("\">");
        self.out.push_str(&encode_text(&entry.text));
        self.out.push_str("</a>");
        if let Some(last) = self.lists.last_mut() {
            *last = Item::Inline;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use md2html_core::{ParseOptions, parse_document};

    fn entry(level: u8, name: &str) -> HeadingEntry {
        HeadingEntry {
            level,
            anchor_id: name.to_lowercase(),
            text: name.to_string(),
            offset: None,
        }
    }

    fn entries(levels: &[u8]) -> Vec<HeadingEntry> {
        levels
            .iter()
            .enumerate()
            .map(|(i, level)| entry(*level, &format!("H{i}")))
            .collect()
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    /// Every `<ul>` is closed and the nesting never goes negative.
    fn assert_balanced(html: &str) {
        let mut depth = 0i32;
        for line in html.lines() {
            let trimmed = line.trim();
            depth += count(trimmed, "<ul>") as i32;
            depth -= count(trimmed, "</ul>") as i32;
            assert!(depth >= 0, "closed too many lists in:\n{html}");
        }
        assert_eq!(depth, 0, "unbalanced lists in:\n{html}");
        assert_eq!(count(html, "<li>"), count(html, "</li>"), "{html}");
    }

    #[test]
    fn no_headings_no_fragment() {
        assert_eq!(render_toc(&[], "toc"), "");
        let tree = parse_document("[toc]\n\nno headings here", &ParseOptions::full());
        assert_eq!(build_toc(&tree, "toc"), "");
    }

    #[test]
    fn nested_outline_layout() {
        let toc = render_toc(
            &[entry(1, "Title"), entry(2, "A"), entry(3, "B"), entry(2, "C")],
            "toc",
        );
        let expected = concat!(
            "<div class=\"toc\">\n",
            "<ul>\n",
            "  <li><a href=\"#title\">Title</a>\n",
            "  <ul>\n",
            "    <li><a href=\"#a\">A</a>\n",
            "    <ul>\n",
            "      <li><a href=\"#b\">B</a></li>\n",
            "    </ul>\n",
            "    </li>\n",
            "    <li><a href=\"#c\">C</a></li>\n",
            "  </ul>\n",
            "  </li>\n",
            "</ul>\n",
            "</div>",
        );
        assert_eq!(toc, expected);
    }

    #[test]
    fn single_level_drop_closes_one_list() {
        let toc = render_toc(&entries(&[2, 3, 2]), "toc");
        assert_balanced(&toc);
        // H1 sits in the inner list, H2 back in the outer one.
        let inner_close = toc.find("</ul>").unwrap();
        assert!(toc.find("#h1").unwrap() < inner_close);
        assert!(toc.find("#h2").unwrap() > inner_close);
        assert_eq!(count(&toc[..toc.find("#h2").unwrap()], "</ul>"), 1);
    }

    #[test]
    fn multi_level_drop_closes_every_intervening_list() {
        let toc = render_toc(&entries(&[1, 2, 3, 4, 1]), "toc");
        assert_balanced(&toc);
        let before_last = &toc[..toc.find("#h4").unwrap()];
        assert_eq!(count(before_last, "<ul>"), 4);
        assert_eq!(count(before_last, "</ul>"), 3);
    }

    #[test]
    fn level_jump_opens_one_list_per_step() {
        let toc = render_toc(&entries(&[1, 4]), "toc");
        assert_balanced(&toc);
        assert_eq!(count(&toc, "<ul>"), 4);
        assert_eq!(count(&toc, "<li>"), 2);
    }

    #[test]
    fn starts_below_level_one() {
        let toc = render_toc(&entries(&[3, 3]), "toc");
        assert_balanced(&toc);
        assert_eq!(count(&toc, "<ul>"), 3);
        assert_eq!(count(&toc, "<li>"), 2);
    }

    #[test]
    fn item_count_and_order_match_entries_for_many_sequences() {
        let sequences: &[&[u8]] = &[
            &[1],
            &[1, 1, 1],
            &[1, 2, 3, 4, 5, 6],
            &[6, 5, 4, 3, 2, 1],
            &[2, 1, 2, 1],
            &[1, 3, 2, 6, 1, 4],
            &[4, 1, 4, 2, 5, 3],
        ];
        for levels in sequences {
            let toc = render_toc(&entries(levels), "toc");
            assert_balanced(&toc);
            assert_eq!(count(&toc, "<li>"), levels.len(), "{levels:?}");
            let positions: Vec<usize> = (0..levels.len())
                .map(|i| toc.find(&format!("href=\"#h{i}\"")).expect("item present"))
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "{levels:?}");
        }
    }

    #[test]
    fn class_text_and_ids_are_escaped() {
        let toc = render_toc(
            &[HeadingEntry {
                level: 1,
                anchor_id: "a\"b".to_string(),
                text: "<T&C>".to_string(),
                offset: None,
            }],
            "my \"toc\"",
        );
        assert!(toc.starts_with("<div class=\"my &quot;toc&quot;\">"));
        assert!(toc.contains("href=\"#a&quot;b\""));
        assert!(toc.contains("&lt;T&amp;C&gt;"));
    }

    #[test]
    fn builds_from_tree_with_custom_class() {
        let tree = parse_document("# Title\n\n[toc]\n\n## A", &ParseOptions::full());
        let toc = build_toc(&tree, "contents");
        assert!(toc.starts_with("<div class=\"contents\">"));
        assert!(toc.contains("<a href=\"#title\">Title</a>"));
        assert!(toc.contains("<a href=\"#a\">A</a>"));
    }
}
