//! End-to-end pipeline tests: scan, build, cache, and related-document
//! ranking over a real fixture tree.

use std::path::Path;
use std::time::Duration;

use kindred::{
    CorpusCache, CorpusSource, DocumentFilter, related,
};

fn write_doc(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

fn fixture_tree(root: &Path) {
    write_doc(
        root,
        "dev/rust-ownership.md",
        "---\n\
         title: Understanding Ownership\n\
         date: 2024-06-01T09:00:00Z\n\
         tags: [rust, memory]\n\
         ---\n\
         Ownership is Rust's central concept.",
    );
    write_doc(
        root,
        "dev/rust-borrowing.md",
        "---\n\
         title: Understanding Borrowing\n\
         date: 2024-06-15T09:00:00Z\n\
         tags: [rust, memory]\n\
         ---\n\
         Borrowing builds on ownership.",
    );
    write_doc(
        root,
        "dev/python-asyncio.md",
        "---\n\
         title: Python Asyncio Notes\n\
         date: 2024-02-10T09:00:00Z\n\
         tags: [python, async]\n\
         ---\n\
         Event loops and coroutines.",
    );
    write_doc(
        root,
        "life/marathon.md",
        "---\n\
         title: Marathon Training\n\
         date: 2024-04-20T09:00:00Z\n\
         tags: [running]\n\
         ---\n\
         Twenty weeks of training.",
    );
    write_doc(root, "scratchpad.md", "No header, no category.");
}

#[test]
fn full_pipeline_through_cache() {
    let tmp = tempfile::tempdir().unwrap();
    fixture_tree(tmp.path());

    let cache = CorpusCache::new(CorpusSource::new(tmp.path()));
    let corpus = cache.documents();

    assert_eq!(corpus.len(), 5);
    for pair in corpus.all().windows(2) {
        assert!(pair[0].published_at >= pair[1].published_at);
    }

    // Root-level file: default category, category-derived tags.
    let scratch = corpus.document_by_slug("scratchpad").unwrap();
    assert_eq!(scratch.category, "Uncategorized");
    assert_eq!(scratch.tags, vec!["Uncategorized"]);

    // Filters narrow by category and tag.
    let dev = corpus.documents(&DocumentFilter {
        category: Some("dev".into()),
        tag: None,
    });
    assert_eq!(dev.len(), 3);
    let memory = corpus.documents(&DocumentFilter {
        category: None,
        tag: Some("memory".into()),
    });
    assert_eq!(memory.len(), 2);

    assert_eq!(corpus.categories(), vec!["Uncategorized", "dev", "life"]);
    assert!(corpus.tags().contains(&"rust".to_string()));
}

#[test]
fn related_ranking_over_built_corpus() {
    let tmp = tempfile::tempdir().unwrap();
    fixture_tree(tmp.path());

    let cache = CorpusCache::new(CorpusSource::new(tmp.path()));
    let corpus = cache.documents();
    let reference = corpus.document_by_slug("rust-ownership").unwrap();

    let results = related::related_documents(reference, corpus.all(), 3);

    // Never the reference itself, never more than asked for.
    assert!(results.len() <= 3);
    assert!(results.iter().all(|d| d.id != reference.id));

    // The sibling rust post shares tags, category, and a title token.
    assert_eq!(results[0].slug, "rust-borrowing");

    // The running post shares nothing and scores zero.
    assert!(results.iter().all(|d| d.slug != "marathon"));
}

#[test]
fn ids_are_stable_across_rebuilds() {
    let tmp = tempfile::tempdir().unwrap();
    fixture_tree(tmp.path());

    let first = CorpusSource::new(tmp.path()).build();
    let second = CorpusSource::new(tmp.path()).build();

    let ids = |c: &kindred::Corpus| {
        c.all().iter().map(|d| d.id).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn invalidation_makes_new_content_visible() {
    let tmp = tempfile::tempdir().unwrap();
    fixture_tree(tmp.path());

    let cache = CorpusCache::new(CorpusSource::new(tmp.path()));
    assert_eq!(cache.documents().len(), 5);

    write_doc(
        tmp.path(),
        "dev/new-post.md",
        "---\ntitle: New Post\n---\nFresh content.",
    );

    // Within the TTL the old snapshot is served.
    assert_eq!(cache.documents().len(), 5);

    assert!(cache.invalidate(kindred::cache::DEFAULT_TAG));
    assert_eq!(cache.documents().len(), 6);
    assert!(cache.document_by_slug("new-post").is_some());
}

#[test]
fn missing_root_degrades_to_fallback_not_error() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("does-not-exist");

    let cache = CorpusCache::new(CorpusSource::new(&missing))
        .with_ttl(Duration::from_secs(60));
    let corpus = cache.documents();

    // Dependent features stay populated.
    assert!(!corpus.is_empty());
    assert!(!corpus.categories().is_empty());

    let all = corpus.documents(&DocumentFilter::default());
    assert_eq!(all.len(), corpus.len());
}
