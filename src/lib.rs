//! kindred - a markdown content corpus and related-posts engine.
//!
//! kindred turns a directory tree of markdown files with embedded metadata
//! headers into a stable, deduplicated, queryable document collection, and
//! ranks related documents with a weighted tag/category/title similarity
//! score. The collection is memoized behind a TTL- and tag-invalidated
//! cache, so repeated queries never re-walk the filesystem.
//!
//! # Quick start
//!
//! ```no_run
//! use kindred::{CorpusCache, CorpusSource, DocumentFilter, related};
//!
//! let cache = CorpusCache::new(CorpusSource::new("content"));
//!
//! let corpus = cache.documents();
//! for doc in corpus.documents(&DocumentFilter::default()) {
//!     println!("{} ({})", doc.title, doc.slug);
//! }
//!
//! if let Some(reference) = corpus.document_by_slug("hello-world") {
//!     for doc in related::related_documents(reference, corpus.all(), 3) {
//!         println!("related: {}", doc.slug);
//!     }
//! }
//! ```

pub mod cache;
pub mod corpus;
pub mod document;
pub mod error;
pub mod front_matter;
pub mod identity;
pub mod related;
pub mod walker;

pub use cache::CorpusCache;
pub use corpus::{Corpus, CorpusSource, DocumentFilter};
pub use document::Document;
pub use error::{Error, Result};
pub use related::Strategy;
