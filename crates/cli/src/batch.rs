//! Parallel conversion of many files and the report printed afterwards.

use crate::launch::launch;
use md2html_core::Md2HtmlError;
use md2html_html::Converter;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

/// Where converted documents go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Printed to stdout, in input order.
    Stdout,
    /// Written to `<dir>/<stem>.html`.
    Files {
        /// Target directory; `None` writes next to each source file.
        out_dir: Option<PathBuf>,
        /// Replace html files that already exist.
        overwrite: bool,
        /// Open each written file afterwards.
        launch: bool,
    },
}

/// Options for batch processing.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Output sink.
    pub output: Output,
    /// Maximum number of worker threads. Defaults to the number of CPU cores.
    pub jobs: Option<usize>,
    /// Suppress progress lines; errors are still reported.
    pub quiet: bool,
    /// Fallback title for every document instead of the file stem.
    pub title: Option<String>,
}

impl BatchOptions {
    fn writes_files(&self) -> bool {
        matches!(self.output, Output::Files { .. })
    }
}

/// One input and what became of it.
#[derive(Debug)]
pub struct FileOutcome {
    /// Input as given or matched.
    pub input: PathBuf,
    /// The written path (file output) or the document (stdout output).
    pub result: Result<Converted, Md2HtmlError>,
}

/// A successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Converted {
    /// The document was written to this path.
    Written(PathBuf),
    /// The document text, to be printed.
    Text(String),
}

/// Statistics for batch processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Total number of inputs processed.
    pub processed: u32,
    /// Number of successful conversions.
    pub succeeded: u32,
    /// Number of failed conversions.
    pub failed: u32,
}

impl BatchStats {
    /// Process exit code: 0 all succeeded, 1 all failed, 2 nothing to do, 3 partial.
    pub fn exit_code(&self) -> u8 {
        if self.processed == 0 {
            2
        } else if self.succeeded == 0 {
            1
        } else if self.failed > 0 {
            3
        } else {
            0
        }
    }
}

/// Where the html for `input` is written: same stem, `.html` extension.
pub fn output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let dir = out_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    let name = input.file_name().map(PathBuf::from).unwrap_or_default();
    dir.join(name).with_extension("html")
}

fn fallback_title(input: &Path, options: &BatchOptions) -> String {
    match &options.title {
        Some(title) => title.clone(),
        None => input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

/// Converts every input, in parallel, returning outcomes in input order.
///
/// Two inputs that map to the same output file are not written
/// concurrently: the later one fails instead.
pub fn convert_files(
    converter: &Converter,
    inputs: &[PathBuf],
    options: &BatchOptions,
) -> (Vec<FileOutcome>, BatchStats) {
    let mut claimed = HashSet::new();
    let targets: Vec<Option<PathBuf>> = inputs
        .iter()
        .map(|input| match &options.output {
            Output::Stdout => None,
            Output::Files { out_dir, .. } => Some(output_path(input, out_dir.as_deref())),
        })
        .collect();
    let collisions: Vec<bool> = targets
        .iter()
        .map(|target| match target {
            Some(path) => !claimed.insert(path.clone()),
            None => false,
        })
        .collect();

    let succeeded = AtomicU32::new(0);
    let failed = AtomicU32::new(0);

    let process_input = |index: usize| -> FileOutcome {
        let input = &inputs[index];
        let result = if collisions[index] {
            Err(Md2HtmlError::Config(format!(
                "{} is also the output of an earlier input",
                targets[index]
                    .as_deref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_default()
            )))
        } else {
            convert_one(converter, input, targets[index].as_deref(), options)
        };
        match &result {
            Ok(_) => succeeded.fetch_add(1, Ordering::Relaxed),
            Err(err) => {
                log::debug!("{} failed: {err}", input.display());
                failed.fetch_add(1, Ordering::Relaxed)
            }
        };
        FileOutcome {
            input: input.clone(),
            result,
        }
    };

    let pool = options.jobs.filter(|jobs| *jobs > 0).and_then(|jobs| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|err| log::warn!("falling back to the global thread pool: {err}"))
            .ok()
    });

    let indices: Vec<usize> = (0..inputs.len()).collect();
    let outcomes: Vec<FileOutcome> = match pool {
        Some(pool) => pool.install(|| indices.into_par_iter().map(process_input).collect()),
        None => indices.into_par_iter().map(process_input).collect(),
    };

    let stats = BatchStats {
        processed: inputs.len() as u32,
        succeeded: succeeded.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
    };
    (outcomes, stats)
}

fn convert_one(
    converter: &Converter,
    input: &Path,
    target: Option<&Path>,
    options: &BatchOptions,
) -> Result<Converted, Md2HtmlError> {
    if !input.is_file() {
        return Err(Md2HtmlError::FileNotFound(input.to_path_buf()));
    }

    if let (Some(target), Output::Files { overwrite, .. }) = (target, &options.output)
        && target.exists()
        && !overwrite
    {
        return Err(Md2HtmlError::OutputExists(target.to_path_buf()));
    }

    let text = fs::read_to_string(input)?;
    let html = converter.convert(&text, &fallback_title(input, options));

    match target {
        Some(target) => {
            fs::write(target, html)?;
            Ok(Converted::Written(target.to_path_buf()))
        }
        None => Ok(Converted::Text(html)),
    }
}

/// Prints the outcomes in input order and launches written files if asked.
///
/// Documents go to `out`; errors go to `err`.
pub fn report(
    outcomes: &[FileOutcome],
    stats: &BatchStats,
    options: &BatchOptions,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    let verbose = options.writes_files() && !options.quiet;

    for outcome in outcomes {
        if verbose {
            writeln!(out, ">>> Converting: {}", outcome.input.display())?;
        }
        match &outcome.result {
            Ok(Converted::Written(path)) => {
                if verbose {
                    writeln!(out, "    Success: {}", path.display())?;
                }
                if let Output::Files { launch: true, .. } = options.output {
                    launch(path);
                }
            }
            Ok(Converted::Text(html)) => {
                out.write_all(html.as_bytes())?;
                if !html.ends_with('\n') {
                    writeln!(out)?;
                }
            }
            Err(error) => writeln!(err, "    Error: {error}")?,
        }
    }

    if verbose && stats.processed > 1 {
        writeln!(
            out,
            "{} processed; {} succeeded; {} failed",
            stats.processed, stats.succeeded, stats.failed
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        let stats = |processed, succeeded, failed| BatchStats {
            processed,
            succeeded,
            failed,
        };
        assert_eq!(stats(0, 0, 0).exit_code(), 2);
        assert_eq!(stats(2, 0, 2).exit_code(), 1);
        assert_eq!(stats(3, 2, 1).exit_code(), 3);
        assert_eq!(stats(3, 3, 0).exit_code(), 0);
    }

    #[test]
    fn output_path_replaces_extension() {
        assert_eq!(
            output_path(Path::new("docs/readme.md"), None),
            PathBuf::from("docs/readme.html")
        );
        assert_eq!(
            output_path(Path::new("docs/readme.md"), Some(Path::new("out"))),
            PathBuf::from("out/readme.html")
        );
        assert_eq!(
            output_path(Path::new("notes"), None),
            PathBuf::from("notes.html")
        );
    }

    #[test]
    fn title_falls_back_to_file_stem() {
        let mut options = BatchOptions {
            output: Output::Stdout,
            jobs: None,
            quiet: false,
            title: None,
        };
        assert_eq!(fallback_title(Path::new("dir/guide.md"), &options), "guide");
        options.title = Some("Manual".to_string());
        assert_eq!(fallback_title(Path::new("dir/guide.md"), &options), "Manual");
    }
}
