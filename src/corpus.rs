use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{
    document::{self, Document},
    identity::{IdAssignment, IdRegistry},
    walker,
};

/// File extension scanned for documents when none is configured.
pub const DEFAULT_EXTENSION: &str = "md";

/// Where and what to scan for documents.
#[derive(Debug, Clone)]
pub struct CorpusSource {
    root: PathBuf,
    extension: String,
}

impl CorpusSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run the full pipeline: scan, build, dedup, sort.
    ///
    /// Files are built in parallel; duplicate-id resolution then runs
    /// sequentially in scan order so the first-encountered document always
    /// wins, regardless of build timing. Per-file failures drop that file
    /// only.
    pub fn build(&self) -> Corpus {
        let files = walker::discover_files(&self.root, &self.extension);

        let built: Vec<Option<Document>> = files
            .par_iter()
            .map(|file| match document::build_document(file) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    warn!(path = %file.path.display(), error = %e, "skipping file");
                    None
                }
            })
            .collect();

        let mut registry = IdRegistry::new();
        let mut documents = Vec::new();
        for doc in built.into_iter().flatten() {
            match registry.assign(&doc.source_path) {
                IdAssignment::Fresh(_) => documents.push(doc),
                IdAssignment::CollisionWith { id, existing } => {
                    warn!(
                        id,
                        existing = %existing,
                        dropped = %doc.source_path,
                        "duplicate document id, dropping later file"
                    );
                }
            }
        }

        debug!(count = documents.len(), root = %self.root.display(), "corpus built");
        Corpus::from_documents(documents)
    }
}

/// Narrowing applied to a document listing.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
}

/// An immutable corpus snapshot, sorted by publication time descending.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Wrap already-built documents, establishing the sort invariant.
    pub fn from_documents(mut documents: Vec<Document>) -> Self {
        documents.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Self { documents }
    }

    /// All documents, newest first.
    pub fn all(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents matching the filter, newest first. Category and tag match
    /// case-insensitively.
    pub fn documents(&self, filter: &DocumentFilter) -> Vec<&Document> {
        self.documents
            .iter()
            .filter(|doc| {
                filter.category.as_deref().is_none_or(|category| {
                    doc.category.eq_ignore_ascii_case(category)
                })
            })
            .filter(|doc| {
                filter.tag.as_deref().is_none_or(|tag| {
                    doc.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
                })
            })
            .collect()
    }

    /// First document carrying `slug`, in sort order. Slugs are derived from
    /// filenames only, so files sharing a name across categories share a
    /// slug; the newest one wins here.
    pub fn document_by_slug(&self, slug: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.slug == slug)
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .documents
            .iter()
            .map(|doc| doc.category.as_str())
            .collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Distinct tags, sorted.
    pub fn tags(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .documents
            .iter()
            .flat_map(|doc| doc.tags.iter().map(String::as_str))
            .collect();
        set.into_iter().map(str::to_string).collect()
    }
}
