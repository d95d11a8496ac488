//! Opening written files with the platform's default viewer.

use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

#[cfg(target_os = "windows")]
fn opener(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg("start").arg("").arg(path);
    command
}

#[cfg(target_os = "macos")]
fn opener(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn opener(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}

/// Starts `command` with null stdio and waits for it on a background
/// thread, so the child is reaped once it exits.
fn spawn_detached(command: &mut Command) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(thread::spawn(move || child.wait()))
}

/// Opens `path` without waiting for the viewer. Failures are logged only.
pub fn launch(path: &Path) {
    match spawn_detached(&mut opener(path)) {
        Ok(_) => log::debug!("launched viewer for {}", path.display()),
        Err(err) => log::warn!("could not open {}: {err}", path.display()),
    }
}
