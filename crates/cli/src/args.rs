//! Command-line arguments and how they map onto conversion settings.

use crate::batch::{BatchOptions, Output};
use clap::Parser;
use md2html_core::Md2HtmlError;
use md2html_html::ConvertOptions;
use std::fs;
use std::path::{Path, PathBuf};

/// Convert Markdown files to self-contained HTML pages.
#[derive(Debug, Parser)]
#[command(name = "md2html")]
#[command(version, about = "Converts Markdown files to HTML", long_about = None)]
#[command(after_help = "EXAMPLES:
    md2html README.md              Print README as HTML
    md2html -f docs/*.md           Write docs/*.html next to the sources
    md2html -d out -s site.css *.md
                                   Write to out/ using a custom stylesheet")]
pub struct Cli {
    /// Markdown files to convert; supports wildcards
    #[arg(value_name = "FILES", required = true, num_args = 1..=16)]
    pub files: Vec<String>,

    /// Write each document to a file with the same name and an .html extension
    #[arg(short = 'f', long)]
    pub to_file: bool,

    /// Overwrite html files that already exist
    #[arg(short, long)]
    pub overwrite: bool,

    /// Directory to write the html files to; implies --to-file
    #[arg(short = 'd', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// CSS file or http(s) URL to add to the page; repeatable
    #[arg(short, long = "style", value_name = "SRC")]
    pub styles: Vec<String>,

    /// File with the markup to include for syntax highlighting
    #[arg(long, value_name = "FILE")]
    pub highlighter: Option<PathBuf>,

    /// Output the content only, with no html, head or body tags
    #[arg(long)]
    pub content_only: bool,

    /// Leave out the generator meta tags
    #[arg(long)]
    pub no_meta: bool,

    /// Leave [toc] placeholders as text
    #[arg(long)]
    pub no_toc: bool,

    /// Class name of the table of contents container
    #[arg(long, value_name = "NAME")]
    pub toc_class: Option<String>,

    /// Title used when the document has neither a front matter title nor a level-1 heading
    #[arg(long, value_name = "NAME")]
    pub title: Option<String>,

    /// Open each written file with the default viewer
    #[arg(short, long)]
    pub launch: bool,

    /// JSON file with conversion settings; command-line flags take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Conversion settings: the config file (if any) with flags applied on top.
    pub fn convert_options(&self) -> Result<ConvertOptions, Md2HtmlError> {
        let mut options = match &self.config {
            Some(path) => load_config(path)?,
            None => ConvertOptions::default(),
        };

        options.content_only |= self.content_only;
        options.skip_meta |= self.no_meta;
        options.skip_toc |= self.no_toc;
        if let Some(class) = &self.toc_class {
            options.toc_class = class.clone();
        }
        if !self.styles.is_empty() {
            options.styles = self.styles.clone();
        }
        if let Some(path) = &self.highlighter {
            options.highlighter = Some(path.clone());
        }
        Ok(options)
    }

    /// Batch settings; fails if the output directory does not exist.
    pub fn batch_options(&self) -> Result<BatchOptions, Md2HtmlError> {
        let output = match &self.out_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(Md2HtmlError::OutputDirNotFound(dir.clone()));
                }
                Output::Files {
                    out_dir: Some(dir.clone()),
                    overwrite: self.overwrite,
                    launch: self.launch,
                }
            }
            None if self.to_file => Output::Files {
                out_dir: None,
                overwrite: self.overwrite,
                launch: self.launch,
            },
            None => Output::Stdout,
        };

        Ok(BatchOptions {
            output,
            jobs: self.jobs,
            quiet: self.quiet,
            title: self.title.clone(),
        })
    }
}

/// Reads [`ConvertOptions`] from a JSON file.
pub fn load_config(path: &Path) -> Result<ConvertOptions, Md2HtmlError> {
    let text = fs::read_to_string(path)
        .map_err(|err| Md2HtmlError::Config(format!("{}: {err}", path.display())))?;
    let options = serde_json::from_str(&text)
        .map_err(|err| Md2HtmlError::Config(format!("{}: {err}", path.display())))?;
    log::debug!("loaded settings from {}", path.display());
    Ok(options)
}
