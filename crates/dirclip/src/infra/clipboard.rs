//! Clipboard integration.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};

/// Hidden argument that turns the binary into a short-lived clipboard owner.
pub const CLIPBOARD_DAEMON_FLAG: &str = "__dirclip_clipboard_daemon";

/// Destination for the aggregated payload text.
pub trait ClipboardSink {
    fn write(&mut self, text: &str) -> Result<()>;

    /// Keep the last written text available after the process exits.
    fn persist(&mut self) -> Result<()> {
        Ok(())
    }
}

/// System clipboard via `arboard`, with shell utilities as a fallback for headless sessions.
pub struct SystemClipboard {
    primary: Option<arboard::Clipboard>,
    primary_error: Option<String>,
    shell_fallback: bool,
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    owned_text: Option<String>,
}

impl SystemClipboard {
    /// Connect to the system clipboard. A failed connection is retried through the shell
    /// fallback on every write when `shell_fallback` is set.
    pub fn new(shell_fallback: bool) -> Self {
        let (primary, primary_error) = match arboard::Clipboard::new() {
            Ok(clipboard) => (Some(clipboard), None),
            Err(err) => {
                tracing::debug!(error = %err, "system clipboard unavailable");
                (None, Some(err.to_string()))
            }
        };
        Self {
            primary,
            primary_error,
            shell_fallback,
            owned_text: None,
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ClipboardSink for SystemClipboard {
    fn write(&mut self, text: &str) -> Result<()> {
        if let Some(primary) = self.primary.as_mut() {
            match primary.set_text(text.to_owned()) {
                Ok(()) => {
                    self.owned_text = Some(text.to_owned());
                    return Ok(());
                }
                Err(err) => self.primary_error = Some(err.to_string()),
            }
            self.primary = None;
        }
        self.owned_text = None;

        if !self.shell_fallback {
            return Err(backends_exhausted(self.primary_error.as_deref(), None));
        }
        fallback_copy(text)
            .map_err(|err| backends_exhausted(self.primary_error.as_deref(), Some(err)))
    }

    /// On X11 the selection dies with its owner, so the text is handed to a detached copy of
    /// this binary that holds it until another program takes the clipboard.
    #[cfg(target_os = "linux")]
    fn persist(&mut self) -> Result<()> {
        let Some(text) = self.owned_text.take() else {
            return Ok(());
        };
        let exe = std::env::current_exe().context("failed to locate current executable")?;
        let mut child = Command::new(exe)
            .arg(CLIPBOARD_DAEMON_FLAG)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .current_dir("/")
            .spawn()
            .context("failed to spawn clipboard owner")?;
        let mut stdin = child
            .stdin
            .take()
            .context("clipboard owner has no stdin")?;
        stdin
            .write_all(text.as_bytes())
            .context("failed to hand clipboard contents over")?;
        tracing::debug!(pid = child.id(), bytes = text.len(), "clipboard handed to owner process");
        Ok(())
    }
}

/// Run as clipboard owner when started with [`CLIPBOARD_DAEMON_FLAG`]. Returns `Ok(false)`
/// for a normal launch.
pub fn run_daemon_if_requested() -> Result<bool> {
    if !std::env::args().skip(1).any(|arg| arg == CLIPBOARD_DAEMON_FLAG) {
        return Ok(false);
    }
    hold_clipboard()?;
    Ok(true)
}

#[cfg(target_os = "linux")]
fn hold_clipboard() -> Result<()> {
    use arboard::SetExtLinux;

    let text =
        std::io::read_to_string(std::io::stdin()).context("failed to read clipboard text")?;
    let mut clipboard = arboard::Clipboard::new()?;
    // returns once another program owns the clipboard
    clipboard.set().wait().text(text)?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn hold_clipboard() -> Result<()> {
    Ok(())
}

fn fallback_copy(text: &str) -> Result<()> {
    let mut last_error = None;
    for command in fallback_commands() {
        match try_command_copy(command, text) {
            Ok(()) => return Ok(()),
            Err(err) => {
                tracing::debug!(command = command[0], error = %err, "clipboard fallback failed");
                last_error = Some(err);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| anyhow!("no clipboard command for this platform")))
}

fn backends_exhausted(
    primary_error: Option<&str>,
    fallback_error: Option<anyhow::Error>,
) -> anyhow::Error {
    let primary = primary_error.unwrap_or("not available");
    match fallback_error {
        Some(err) => anyhow!(
            "failed to copy text to clipboard using available backends (system clipboard: {primary}; fallback: {err:#})"
        ),
        None => anyhow!("system clipboard: {primary}"),
    }
}

fn try_command_copy(command: &[&str], text: &str) -> Result<()> {
    let (program, args) = command
        .split_first()
        .context("clipboard command missing program")?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to spawn clipboard command: {program}"))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .context("failed to write clipboard contents")?;
    }

    let status = child
        .wait()
        .with_context(|| format!("clipboard command did not exit cleanly: {program}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("clipboard command exited with status {status}"))
    }
}

#[cfg(target_os = "macos")]
fn fallback_commands() -> Vec<&'static [&'static str]> {
    vec![&["pbcopy"]]
}

#[cfg(all(unix, not(target_os = "macos")))]
fn fallback_commands() -> Vec<&'static [&'static str]> {
    vec![&["wl-copy"], &["xclip", "-selection", "clipboard"]]
}

#[cfg(target_os = "windows")]
fn fallback_commands() -> Vec<&'static [&'static str]> {
    vec![&["powershell.exe", "-NoProfile", "-Command", "Set-Clipboard"]]
}

#[cfg(not(any(unix, target_os = "windows")))]
fn fallback_commands() -> Vec<&'static [&'static str]> {
    Vec::new()
}

/// In-memory sink that records writes, optionally failing every one.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub writes: Vec<String>,
    pub fail_with: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            writes: Vec::new(),
            fail_with: Some(message.into()),
        }
    }

    pub fn last(&self) -> Option<&str> {
        self.writes.last().map(String::as_str)
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write(&mut self, text: &str) -> Result<()> {
        if let Some(message) = &self.fail_with {
            return Err(anyhow!(message.clone()));
        }
        self.writes.push(text.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_backends_keep_the_system_clipboard_cause() {
        let err = backends_exhausted(
            Some("X11 server connection timed out"),
            Some(anyhow!("failed to spawn clipboard command: xclip")),
        );
        let message = err.to_string();
        assert!(message.contains("X11 server connection timed out"));
        assert!(message.contains("xclip"));

        let err = backends_exhausted(Some("no display"), None);
        assert_eq!(err.to_string(), "system clipboard: no display");
    }

    #[test]
    fn disabled_fallback_reports_connection_error() {
        let mut clipboard = SystemClipboard {
            primary: None,
            primary_error: Some("unknown display".into()),
            shell_fallback: false,
            owned_text: None,
        };
        let err = clipboard.write("text").unwrap_err();
        assert!(err.to_string().contains("unknown display"));
        assert!(clipboard.persist().is_ok());
    }

    #[test]
    fn memory_clipboard_records_or_fails() {
        let mut clipboard = MemoryClipboard::new();
        clipboard.write("one").unwrap();
        assert_eq!(clipboard.last(), Some("one"));
        assert!(clipboard.persist().is_ok());

        let mut failing = MemoryClipboard::failing("busy");
        assert_eq!(failing.write("two").unwrap_err().to_string(), "busy");
        assert!(failing.writes.is_empty());
    }
}
