use markdown::mdast::Node;

/// Returns the raw body of the document's YAML front matter block, if any.
pub fn front_matter_raw(tree: &Node) -> Option<&str> {
    match tree {
        Node::Yaml(yaml) => Some(&yaml.value),
        _ => tree
            .children()?
            .iter()
            .find_map(front_matter_raw),
    }
}

/// Reads the `title:` entry from raw front matter lines.
///
/// This is a line scan rather than a YAML parse: the first line whose trimmed
/// text starts with `title:` (any case) wins, the value is everything after the
/// first colon, and one matching pair of surrounding quotes is removed.
/// An absent or empty value yields `None`.
pub fn title_from_front_matter(raw: &str) -> Option<String> {
    let line = raw
        .lines()
        .map(str::trim_start)
        .find(|line| starts_with_ignore_case(line, "title:"))?;

    let (_, value) = line.split_once(':')?;
    let mut title = value.trim();

    if title.len() >= 2
        && ((title.starts_with('"') && title.ends_with('"'))
            || (title.starts_with('\'') && title.ends_with('\'')))
    {
        title = title[1..title.len() - 1].trim();
    }

    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.len() >= prefix.len()
        && line.is_char_boundary(prefix.len())
        && line[..prefix.len()].eq_ignore_ascii_case(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParseOptions, parse_document};

    #[test]
    fn plain_title() {
        assert_eq!(
            title_from_front_matter("title: Release Notes"),
            Some("Release Notes".to_string())
        );
    }

    #[test]
    fn double_quoted_title_is_unwrapped() {
        assert_eq!(
            title_from_front_matter("author: me\ntitle: \"My Title\""),
            Some("My Title".to_string())
        );
    }

    #[test]
    fn single_quoted_title_is_unwrapped_and_trimmed() {
        assert_eq!(
            title_from_front_matter("title: '  Spaced  '"),
            Some("Spaced".to_string())
        );
    }

    #[test]
    fn mismatched_quotes_are_kept() {
        assert_eq!(
            title_from_front_matter("title: \"Half'"),
            Some("\"Half'".to_string())
        );
    }

    #[test]
    fn key_is_case_insensitive_and_may_be_indented() {
        assert_eq!(
            title_from_front_matter("  Title: Upper"),
            Some("Upper".to_string())
        );
    }

    #[test]
    fn value_keeps_later_colons() {
        assert_eq!(
            title_from_front_matter("title: Rust: A Primer"),
            Some("Rust: A Primer".to_string())
        );
    }

    #[test]
    fn empty_values_are_not_titles() {
        assert_eq!(title_from_front_matter("title:"), None);
        assert_eq!(title_from_front_matter("title: \"\""), None);
        assert_eq!(title_from_front_matter("title: ' '"), None);
        assert_eq!(title_from_front_matter("title: \""), Some("\"".to_string()));
    }

    #[test]
    fn missing_title_line() {
        assert_eq!(title_from_front_matter("author: someone\ndate: 2021"), None);
        assert_eq!(title_from_front_matter("subtitle: nope"), None);
    }

    #[test]
    fn finds_front_matter_in_tree() {
        let tree = parse_document("---\ntitle: Hi\n---\n\ntext", &ParseOptions::full());
        assert_eq!(front_matter_raw(&tree), Some("title: Hi"));
    }

    #[test]
    fn no_front_matter_in_tree() {
        let tree = parse_document("# Heading", &ParseOptions::full());
        assert_eq!(front_matter_raw(&tree), None);
    }
}
