//! Filesystem-backed DocumentSource
//!
//! Maps a local directory tree onto the folder-listing contract:
//! subdirectories are folders, `.md`/`.txt` files are native documents,
//! everything else is `Other`. Entry ids are paths relative to the root.
//! Lets the walker and the CLI run without any cloud provider.

use adjutant_domain::traits::{DocumentSource, EntryKind, FolderEntry};
use std::path::{Path, PathBuf};

/// File extensions treated as native documents
const DOCUMENT_EXTENSIONS: &[&str] = &["md", "txt"];

/// A DocumentSource over a local directory tree
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Create a source rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The folder id of the root directory
    pub fn root_id(&self) -> &str {
        ""
    }

    fn resolve(&self, id: &str) -> PathBuf {
        if id.is_empty() {
            self.root.clone()
        } else {
            self.root.join(id)
        }
    }

    fn entry_kind(path: &Path) -> EntryKind {
        if path.is_dir() {
            return EntryKind::Folder;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
            EntryKind::Document
        } else {
            EntryKind::Other
        }
    }
}

impl DocumentSource for FsSource {
    type Error = std::io::Error;

    fn list_children(&self, folder_id: &str) -> Result<Vec<FolderEntry>, Self::Error> {
        let dir = self.resolve(folder_id);
        let mut entries = Vec::new();

        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let id = if folder_id.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", folder_id, name)
            };
            entries.push(FolderEntry {
                id,
                name,
                kind: Self::entry_kind(&entry.path()),
            });
        }

        // Deterministic listing order
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn fetch_text(&self, doc_id: &str) -> Result<String, Self::Error> {
        std::fs::read_to_string(self.resolve(doc_id))
    }

    fn doc_link(&self, doc_id: &str) -> Option<String> {
        let path = self.resolve(doc_id);
        path.canonicalize()
            .ok()
            .map(|p| format!("file://{}", p.display()))
    }
}
