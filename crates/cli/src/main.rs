//! md2html - Markdown to HTML converter

use std::io;
use std::process::ExitCode;

use clap::Parser;

use md2html_cli::{Cli, run};

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let stdout = io::stdout();
    let stderr = io::stderr();
    let code = run(&cli, &mut stdout.lock(), &mut stderr.lock());
    ExitCode::from(code)
}
