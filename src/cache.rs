use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::{
    corpus::{Corpus, CorpusSource},
    document::Document,
    identity,
};

/// How long a snapshot is served before the source tree is re-scanned.
pub const DEFAULT_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Invalidation tag the cache listens to by default.
pub const DEFAULT_TAG: &str = "corpus";

struct CachedSnapshot {
    corpus: Arc<Corpus>,
    built_at: Instant,
}

/// Memoizes the built corpus behind a TTL window and an invalidation tag.
///
/// One instance is constructed per process and passed to consumers; there is
/// no ambient global cache. The snapshot slot is guarded by a mutex, which
/// also serializes rebuilds: concurrent misses on an expired slot trigger
/// exactly one rebuild, and readers arriving mid-rebuild wait for it rather
/// than observing a partial collection. `invalidate` takes effect for the
/// next read, never retroactively.
pub struct CorpusCache {
    source: CorpusSource,
    ttl: Duration,
    tag: String,
    slot: Mutex<Option<CachedSnapshot>>,
}

impl CorpusCache {
    pub fn new(source: CorpusSource) -> Self {
        Self {
            source,
            ttl: DEFAULT_TTL,
            tag: DEFAULT_TAG.to_string(),
            slot: Mutex::new(None),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// The full collection, rebuilding on the first call, after TTL expiry,
    /// or after a matching `invalidate`. No filesystem access on a hit.
    pub fn documents(&self) -> Arc<Corpus> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(snapshot) = slot.as_ref()
            && snapshot.built_at.elapsed() < self.ttl
        {
            debug!("corpus cache hit");
            return Arc::clone(&snapshot.corpus);
        }

        debug!(root = %self.source.root().display(), "corpus cache miss, rebuilding");
        let built = self.source.build();
        let corpus = if built.is_empty() {
            warn!(
                root = %self.source.root().display(),
                "corpus is empty, serving fallback documents"
            );
            Arc::new(fallback_corpus())
        } else {
            Arc::new(built)
        };

        *slot = Some(CachedSnapshot {
            corpus: Arc::clone(&corpus),
            built_at: Instant::now(),
        });
        corpus
    }

    /// Single-document lookup, served from the same snapshot as
    /// [`documents`](Self::documents).
    pub fn document_by_slug(&self, slug: &str) -> Option<Document> {
        self.documents().document_by_slug(slug).cloned()
    }

    /// Drop the snapshot if `tag` matches this cache's tag. Returns whether
    /// anything was invalidated; reads already holding the old snapshot are
    /// unaffected.
    pub fn invalidate(&self, tag: &str) -> bool {
        if tag != self.tag {
            return false;
        }
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        let had_snapshot = slot.is_some();
        *slot = None;
        debug!(tag, "corpus cache invalidated");
        had_snapshot
    }
}

/// Built-in documents served when the pipeline yields nothing, so dependent
/// features stay populated even with a missing or empty content directory.
fn fallback_corpus() -> Corpus {
    let samples: [(&str, &str, &[&str], &str, &str); 3] = [
        (
            "Welcome",
            "dev",
            &["blog", "meta"],
            "2024-01-05T00:00:00Z",
            "This site is generated from a directory of markdown files. \
             Drop documents into the content directory to replace these \
             placeholders.",
        ),
        (
            "Writing Posts",
            "dev",
            &["blog", "markdown"],
            "2024-01-04T00:00:00Z",
            "Each post is a markdown file with an optional metadata header \
             carrying a title, date, and tags.",
        ),
        (
            "Organizing Content",
            "life",
            &["blog"],
            "2024-01-03T00:00:00Z",
            "The first directory under the content root becomes the \
             document's category.",
        ),
    ];

    let documents = samples
        .into_iter()
        .map(|(title, category, tags, date, body)| {
            let slug = identity::slugify(title);
            let source_path = format!("fallback/{category}/{slug}.md");
            Document {
                id: identity::path_id(&source_path),
                title: title.to_string(),
                body: body.to_string(),
                description: body.chars().take(150).collect(),
                category: category.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                published_at: DateTime::parse_from_rfc3339(date)
                    .map(|d| d.with_timezone(&Utc))
                    .unwrap_or(DateTime::UNIX_EPOCH),
                slug,
                source_path,
            }
        })
        .collect();

    Corpus::from_documents(documents)
}
