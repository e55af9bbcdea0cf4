//! Text previews for files opened from a listing.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::domain::errors::{AccessError, BrowseError};
use crate::infra::fs::FileSystem;

/// Line budget used when the configured one is zero.
const DEFAULT_MAX_LINES: usize = 200;

/// Bytes inspected when deciding whether a file is binary.
const BINARY_SNIFF_LEN: usize = 1024;

/// Displayable file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    pub path: PathBuf,
    pub lines: Vec<String>,
    pub total_bytes: usize,
    pub truncated: bool,
    pub notice: Option<String>,
}

impl PreviewDocument {
    pub fn title(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Read `path` and prepare at most `max_lines` lines of it for display.
pub fn load_preview(
    fs: &dyn FileSystem,
    path: &Path,
    max_lines: usize,
) -> Result<PreviewDocument, BrowseError> {
    let bytes = fs.read_file_bytes(path).map_err(|err| {
        BrowseError::FileAccess(AccessError::Read {
            path: path.to_path_buf(),
            cause: err.message,
        })
    })?;

    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    if sniff.contains(&0) {
        return Ok(PreviewDocument {
            path: path.to_path_buf(),
            lines: Vec::new(),
            total_bytes: bytes.len(),
            truncated: false,
            notice: Some(format!(
                "Binary file ({} bytes); preview not available.",
                bytes.len()
            )),
        });
    }

    let limit = if max_lines == 0 {
        DEFAULT_MAX_LINES
    } else {
        max_lines
    };

    let text = String::from_utf8_lossy(&bytes);
    let notice = matches!(text, Cow::Owned(_))
        .then(|| "Invalid UTF-8 sequences were replaced.".to_owned());

    let mut lines = Vec::new();
    let mut truncated = false;
    for line in text.lines() {
        if lines.len() == limit {
            truncated = true;
            break;
        }
        lines.push(line.to_owned());
    }

    Ok(PreviewDocument {
        path: path.to_path_buf(),
        lines,
        total_bytes: bytes.len(),
        truncated,
        notice,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use anyhow::Result;
    use tempfile::tempdir;

    use crate::infra::fs::LocalFileSystem;

    #[test]
    fn text_file_is_split_into_lines() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("hello.rs");
        std::fs::write(&file, "fn main() {\r\n    println!(\"hi\");\n}\n")?;

        let doc = load_preview(&LocalFileSystem, &file, 400)?;

        assert_eq!(doc.lines, vec!["fn main() {", "    println!(\"hi\");", "}"]);
        assert!(!doc.truncated);
        assert!(doc.notice.is_none());
        assert_eq!(doc.title(), "hello.rs");
        Ok(())
    }

    #[test]
    fn long_file_is_truncated_at_the_line_budget() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("long.txt");
        let content = (0..50).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        std::fs::write(&file, content)?;

        let doc = load_preview(&LocalFileSystem, &file, 10)?;

        assert_eq!(doc.lines.len(), 10);
        assert_eq!(doc.lines[9], "9");
        assert!(doc.truncated);
        Ok(())
    }

    #[test]
    fn binary_file_returns_notice() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("data.bin");
        std::fs::write(&file, [0, 159, 146, 150])?;

        let doc = load_preview(&LocalFileSystem, &file, 400)?;

        assert!(doc.lines.is_empty());
        assert!(doc.notice.as_ref().is_some_and(|n| n.contains("Binary file (4 bytes)")));
        Ok(())
    }

    #[test]
    fn lossy_content_carries_notice() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("lossy.txt");
        std::fs::write(&file, b"hello\xffworld\n")?;

        let doc = load_preview(&LocalFileSystem, &file, 400)?;

        assert_eq!(doc.lines.len(), 1);
        assert!(doc.notice.as_ref().is_some_and(|n| n.contains("Invalid UTF-8")));
        Ok(())
    }

    #[test]
    fn missing_file_is_file_access_error() {
        let dir = tempdir().unwrap();
        let err = load_preview(&LocalFileSystem, &dir.path().join("nope"), 10).unwrap_err();
        assert!(err.to_string().starts_with("Error reading file "));
    }
}
