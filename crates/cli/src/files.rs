//! Wildcard resolution of input arguments.

use md2html_core::Md2HtmlError;
use std::collections::HashSet;
use std::path::PathBuf;

/// Input files matched by the command-line patterns.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Inputs {
    /// Matched files, deduplicated, in pattern order and sorted within a pattern.
    pub files: Vec<PathBuf>,
    /// Patterns that matched no file.
    pub unmatched: Vec<String>,
}

/// Expands each pattern with `glob`; a plain path matches itself if it is a file.
///
/// A malformed pattern fails the whole resolution.
pub fn resolve_inputs(patterns: &[String]) -> Result<Inputs, Md2HtmlError> {
    let mut seen = HashSet::new();
    let mut inputs = Inputs::default();

    for pattern in patterns {
        let paths = glob::glob(pattern).map_err(|err| Md2HtmlError::InvalidPattern {
            pattern: pattern.clone(),
            reason: err.to_string(),
        })?;

        let mut matched: Vec<PathBuf> = paths
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(err) => {
                    log::warn!("skipping unreadable match for '{pattern}': {err}");
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();
        matched.sort();

        if matched.is_empty() {
            log::debug!("no files match '{pattern}'");
            inputs.unmatched.push(pattern.clone());
            continue;
        }
        for path in matched {
            if seen.insert(path.clone()) {
                inputs.files.push(path);
            }
        }
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn expands_sorts_and_dedupes() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.md", "a.md", "c.txt"] {
            fs::write(dir.path().join(name), "# x").unwrap();
        }
        fs::create_dir(dir.path().join("sub.md")).unwrap();

        let root = dir.path().display().to_string();
        let inputs = resolve_inputs(&[format!("{root}/*.md"), format!("{root}/a.md")]).unwrap();
        assert_eq!(
            inputs.files,
            vec![dir.path().join("a.md"), dir.path().join("b.md")]
        );
        assert!(inputs.unmatched.is_empty());
    }

    #[test]
    fn reports_unmatched_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/missing*.md", dir.path().display());
        let inputs = resolve_inputs(std::slice::from_ref(&pattern)).unwrap();
        assert!(inputs.files.is_empty());
        assert_eq!(inputs.unmatched, vec![pattern]);
    }

    #[test]
    fn malformed_pattern_is_an_error() {
        assert!(matches!(
            resolve_inputs(&["docs/[*.md".to_string()]),
            Err(Md2HtmlError::InvalidPattern { .. })
        ));
    }
}
