//! Source storage for a build session.
//!
//! Every module text read during a build (and every embedded prelude fragment)
//! is kept here for the whole session so diagnostics can quote it.

use std::path::{Path, PathBuf};

use crate::span::{SourceRef, Span};

/// Lightweight handle to a source in a build session.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct SourceId(u32);

impl SourceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Describes the origin of a source.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SourceKind {
    /// A module file on disk.
    File(PathBuf),
    /// A fragment compiled into the binary (prelude modules).
    Embedded(String),
    /// An in-memory buffer, addressed by a document URI.
    Memory(String),
}

impl SourceKind {
    /// Returns the display name for diagnostics.
    pub fn display_name(&self) -> String {
        match self {
            SourceKind::File(path) => path.display().to_string(),
            SourceKind::Embedded(name) => format!("<prelude:{name}>"),
            SourceKind::Memory(uri) => uri.clone(),
        }
    }
}

/// A borrowed view of a source: id, kind, and content.
#[derive(Clone, Debug)]
pub struct Source<'s> {
    pub id: SourceId,
    pub kind: &'s SourceKind,
    pub content: &'s str,
}

#[derive(Clone, Debug)]
struct SourceEntry {
    kind: SourceKind,
    content: String,
    /// Byte offsets where each line starts.
    line_starts: Vec<u32>,
}

/// Registry of all sources.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    entries: Vec<SourceEntry>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: &Path, content: impl Into<String>) -> SourceId {
        self.push_entry(SourceKind::File(path.to_path_buf()), content.into())
    }

    pub fn add_embedded(&mut self, name: &str, content: impl Into<String>) -> SourceId {
        self.push_entry(SourceKind::Embedded(name.to_owned()), content.into())
    }

    pub fn add_memory(&mut self, uri: &str, content: impl Into<String>) -> SourceId {
        self.push_entry(SourceKind::Memory(uri.to_owned()), content.into())
    }

    pub fn content(&self, id: SourceId) -> &str {
        self.entry(id).content.as_str()
    }

    pub fn kind(&self, id: SourceId) -> &SourceKind {
        &self.entry(id).kind
    }

    /// Get the file path if this source is a file, None otherwise.
    pub fn path(&self, id: SourceId) -> Option<&Path> {
        match &self.entry(id).kind {
            SourceKind::File(path) => Some(path),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: SourceId) -> Source<'_> {
        let entry = self.entry(id);
        Source {
            id,
            kind: &entry.kind,
            content: &entry.content,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Source<'_>> {
        self.entries.iter().enumerate().map(|(idx, entry)| Source {
            id: SourceId(idx as u32),
            kind: &entry.kind,
            content: &entry.content,
        })
    }

    /// One-based line and column (in characters) of a byte offset.
    pub fn line_column(&self, id: SourceId, offset: u32) -> (u32, u32) {
        let entry = self.entry(id);
        let line = match entry.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = entry.line_starts[line] as usize;
        let end = (offset as usize).min(entry.content.len());
        let column = entry.content[line_start..end].chars().count();
        (line as u32 + 1, column as u32 + 1)
    }

    /// Resolve a span into the user-facing reference (URI, line, column, length).
    pub fn source_ref(&self, span: Span) -> SourceRef {
        let (line, column) = self.line_column(span.source, span.start);
        SourceRef {
            uri: self.kind(span.source).display_name(),
            line,
            column,
            length: span.len(),
        }
    }

    fn entry(&self, id: SourceId) -> &SourceEntry {
        self.entries.get(id.index()).expect("invalid SourceId")
    }

    fn push_entry(&mut self, kind: SourceKind, content: String) -> SourceId {
        let id = SourceId(self.entries.len() as u32);
        let line_starts = std::iter::once(0)
            .chain(
                content
                    .match_indices('\n')
                    .map(|(offset, _)| offset as u32 + 1),
            )
            .collect();
        self.entries.push(SourceEntry {
            kind,
            content,
            line_starts,
        });
        id
    }
}
