#![deny(missing_docs)]
//! The `md2html` command: resolves inputs, converts them in parallel and
//! reports the outcome through the process exit code.

/// Command-line arguments.
pub mod args;
/// Parallel conversion and reporting.
pub mod batch;
/// Wildcard resolution.
pub mod files;
/// Viewer launching.
pub mod launch;

pub use args::Cli;
pub use batch::{BatchOptions, BatchStats, Output};

use md2html_core::Md2HtmlError;
use md2html_html::Converter;
use std::io::Write;

/// Exit code for configuration errors.
pub const EXIT_CONFIG: u8 = 1;

/// Runs the command, writing documents and progress to `out` and errors to `err`.
///
/// Returns the process exit code.
pub fn run(cli: &Cli, out: &mut impl Write, err: &mut impl Write) -> u8 {
    let (converter, options) = match setup(cli) {
        Ok(ready) => ready,
        Err(error) => {
            let _ = writeln!(err, "Oops: {error}");
            return EXIT_CONFIG;
        }
    };

    let inputs = match files::resolve_inputs(&cli.files) {
        Ok(inputs) => inputs,
        Err(error) => {
            let _ = writeln!(err, "Oops: {error}");
            return EXIT_CONFIG;
        }
    };
    for pattern in &inputs.unmatched {
        let _ = writeln!(err, "    Error: {}", Md2HtmlError::NoMatchingFiles(pattern.clone()));
    }
    if inputs.files.is_empty() {
        return BatchStats::default().exit_code();
    }

    let (outcomes, mut stats) = batch::convert_files(&converter, &inputs.files, &options);
    let unmatched = inputs.unmatched.len() as u32;
    stats.processed += unmatched;
    stats.failed += unmatched;

    if let Err(error) = batch::report(&outcomes, &stats, &options, out, err) {
        log::error!("failed to write report: {error}");
    }
    stats.exit_code()
}

fn setup(cli: &Cli) -> Result<(Converter, BatchOptions), Md2HtmlError> {
    let options = cli.batch_options()?;
    let converter = Converter::new(cli.convert_options()?)?;
    Ok((converter, options))
}
