//! Proto source documents and a per-run cache keyed by path.

use crate::error::ExtractError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// Raw text of one proto file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Path the text was read from.
    pub path: PathBuf,
    /// File contents.
    pub text: String,
}

impl SourceDocument {
    /// Creates a document from in-memory text.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Reads proto sources relative to a list of roots, once per path.
///
/// Descriptor file names are relative to the compiler's include paths, so
/// each root is tried in order until the file is found. Failed reads are not
/// cached.
#[derive(Debug)]
pub struct SourceCache {
    roots: Vec<PathBuf>,
    documents: HashMap<String, Rc<SourceDocument>>,
}

impl SourceCache {
    /// Creates a cache that resolves files against `roots`.
    ///
    /// An empty root list means the current directory.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        let roots = if roots.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            roots
        };
        Self {
            roots,
            documents: HashMap::new(),
        }
    }

    /// Returns the configured roots.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Inserts a document under a descriptor file name, bypassing the filesystem.
    pub fn insert(&mut self, file_name: impl Into<String>, document: SourceDocument) {
        self.documents.insert(file_name.into(), Rc::new(document));
    }

    /// Returns the source for a descriptor file name, reading it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::FileRead`] if no root contains a readable file.
    pub fn load(&mut self, file_name: &str) -> Result<Rc<SourceDocument>, ExtractError> {
        if let Some(doc) = self.documents.get(file_name) {
            return Ok(Rc::clone(doc));
        }

        let doc = Rc::new(self.read(file_name)?);
        self.documents
            .insert(file_name.to_string(), Rc::clone(&doc));
        Ok(doc)
    }

    fn read(&self, file_name: &str) -> Result<SourceDocument, ExtractError> {
        let mut last_error = None;

        for root in &self.roots {
            let path = root.join(file_name);
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    debug!("Read proto source {}", path.display());
                    return Ok(SourceDocument { path, text });
                }
                Err(e) => last_error = Some((path, e)),
            }
        }

        // `roots` is never empty, so at least one attempt was made.
        let (path, source) = last_error.unwrap_or_else(|| {
            (
                Path::new(file_name).to_path_buf(),
                std::io::Error::from(std::io::ErrorKind::NotFound),
            )
        });
        Err(ExtractError::FileRead { path, source })
    }
}

impl Default for SourceCache {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
