use std::collections::HashSet;

/// Extracts a `{#custom-id}` suffix from heading text.
///
/// If the text ends with `{#some-id}` (where the id contains ASCII alphanumerics,
/// hyphens, or underscores), returns the trimmed text without the suffix and `Some(id)`.
/// Otherwise returns the original text and `None`.
///
/// # Examples
///
/// ```
/// use md2html_core::slug::extract_custom_id;
///
/// let (text, id) = extract_custom_id("Install {#setup}");
/// assert_eq!(text, "Install");
/// assert_eq!(id, Some("setup"));
///
/// let (text, id) = extract_custom_id("Plain heading");
/// assert_eq!(text, "Plain heading");
/// assert_eq!(id, None);
/// ```
pub fn extract_custom_id(text: &str) -> (&str, Option<&str>) {
    let trimmed = text.trim_end();
    let Some(inner) = trimmed.strip_suffix('}') else {
        return (text, None);
    };
    let Some(open) = inner.rfind("{#") else {
        return (text, None);
    };

    let id = &inner[open + 2..];
    if !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return (inner[..open].trim_end(), Some(id));
    }

    (text, None)
}

/// Hands out unique heading anchor ids for one document.
#[derive(Debug, Default)]
pub struct Slugger {
    used: HashSet<String>,
}

impl Slugger {
    /// Creates a new slugger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the next unique id for the given heading text.
    ///
    /// Repeats get `-1`, `-2`, ... appended to the base slug.
    pub fn next_slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut candidate = base.clone();
        let mut n = 0usize;
        while self.used.contains(&candidate) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        self.used.insert(candidate.clone());
        candidate
    }

    /// Reserves an explicit id so generated ids never collide with it.
    pub fn reserve(&mut self, slug: &str) {
        self.used.insert(slug.to_string());
    }
}

/// Turns heading text into an anchor id.
///
/// Letters and digits are lowercased and kept, `_` and `.` are kept, and
/// whitespace or `-` runs become a single `-`. Everything before the first
/// letter is dropped, trailing separators are trimmed, and an id that ends
/// up empty becomes `section`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if slug.is_empty() && !ch.is_alphabetic() {
                continue;
            }
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else if ch == '_' || ch == '.' {
            if slug.is_empty() {
                continue;
            }
            if pending_dash {
                slug.push('-');
                pending_dash = false;
            }
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
        }
    }

    let trimmed_len = slug.trim_end_matches(['-', '_', '.']).len();
    slug.truncate(trimmed_len);

    if slug.is_empty() {
        slug.push_str("section");
    }
    slug
}
