//! Domain models for listings and clipboard payloads.

use std::path::{Path, PathBuf};

/// Classification of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    /// Sockets, fifos, dangling links and anything else that is neither.
    Other,
}

impl EntryKind {
    pub fn is_dir(self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// One directory read, partitioned into folders and files and sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub directory: PathBuf,
    pub folders: Vec<ListedEntry>,
    pub files: Vec<ListedEntry>,
}

impl Listing {
    /// Folders first, then files.
    pub fn iter(&self) -> impl Iterator<Item = &ListedEntry> {
        self.folders.iter().chain(self.files.iter())
    }

    pub fn len(&self) -> usize {
        self.folders.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

/// Header plus raw contents of a single source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock {
    pub display_name: String,
    pub source: PathBuf,
    pub contents: Vec<u8>,
}

impl FileBlock {
    pub fn header(&self) -> String {
        format!("--- {} ---\n", self.display_name)
    }

    fn write_into(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(self.header().as_bytes());
        buffer.extend_from_slice(&self.contents);
        buffer.push(b'\n');
    }
}

/// Ordered file blocks destined for the clipboard. Built fresh for every copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardPayload {
    blocks: Vec<FileBlock>,
}

impl ClipboardPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, display_name: impl Into<String>, source: &Path, contents: Vec<u8>) {
        self.blocks.push(FileBlock {
            display_name: display_name.into(),
            source: source.to_path_buf(),
            contents,
        });
    }

    pub fn blocks(&self) -> &[FileBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Exact serialized bytes: every block's header, contents and trailing newline.
    pub fn to_bytes(&self) -> Vec<u8> {
        let capacity = self
            .blocks
            .iter()
            .map(|block| block.display_name.len() + block.contents.len() + 10)
            .sum();
        let mut buffer = Vec::with_capacity(capacity);
        for block in &self.blocks {
            block.write_into(&mut buffer);
        }
        buffer
    }

    /// Clipboard text. Invalid UTF-8 is replaced rather than rejected.
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.to_bytes()).into_owned()
    }
}
