use std::collections::HashSet;

use crate::document::Document;

/// Signal weights for the combined relevance score.
const TAG_WEIGHT: f64 = 0.5;
const CATEGORY_WEIGHT: f64 = 0.3;
const TITLE_WEIGHT: f64 = 0.2;

/// Default number of related documents returned.
pub const DEFAULT_MAX_RESULTS: usize = 3;

/// Ranking strategy for related-document queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Weighted tag + category + title scoring.
    Score,
    /// Same category, pool order, no scoring.
    Category,
    /// Fraction of the reference's tags present in the candidate.
    Tags,
}

/// Rank `pool` against `reference` and return the top candidates.
pub fn related(
    strategy: Strategy,
    reference: &Document,
    pool: &[Document],
    max_results: usize,
) -> Vec<Document> {
    match strategy {
        Strategy::Score => related_documents(reference, pool, max_results),
        Strategy::Category => related_by_category(reference, pool, max_results),
        Strategy::Tags => related_by_tags(reference, pool, max_results),
    }
}

/// Up to `max_results` documents from `pool` most similar to `reference`,
/// by combined score, descending. The reference itself (matched by id or
/// slug) and zero-score candidates are excluded. Candidates with equal
/// scores keep their relative pool order.
pub fn related_documents(
    reference: &Document,
    pool: &[Document],
    max_results: usize,
) -> Vec<Document> {
    rank(reference, pool, max_results, |candidate| {
        similarity_score(reference, candidate)
    })
}

/// Weighted similarity between two documents:
/// `0.5·tags + 0.3·category + 0.2·title`.
pub fn similarity_score(reference: &Document, candidate: &Document) -> f64 {
    let tag_sim = tag_similarity(&reference.tags, &candidate.tags);
    let category_sim = if reference.category.to_lowercase()
        == candidate.category.to_lowercase()
    {
        1.0
    } else {
        0.0
    };
    let title_sim = title_similarity(&reference.title, &candidate.title);

    TAG_WEIGHT * tag_sim + CATEGORY_WEIGHT * category_sim + TITLE_WEIGHT * title_sim
}

/// Category-only variant: same category as the reference, pool order,
/// capped.
pub fn related_by_category(
    reference: &Document,
    pool: &[Document],
    max_results: usize,
) -> Vec<Document> {
    pool.iter()
        .filter(|candidate| !is_same_document(reference, candidate))
        .filter(|candidate| {
            candidate.category.to_lowercase() == reference.category.to_lowercase()
        })
        .take(max_results)
        .cloned()
        .collect()
}

/// Tag-only variant: scored by the fraction of the reference's tags the
/// candidate carries.
pub fn related_by_tags(
    reference: &Document,
    pool: &[Document],
    max_results: usize,
) -> Vec<Document> {
    let reference_tags: HashSet<String> = lowercase_set(&reference.tags);
    rank(reference, pool, max_results, |candidate| {
        if reference_tags.is_empty() {
            return 0.0;
        }
        let candidate_tags = lowercase_set(&candidate.tags);
        let shared = reference_tags
            .iter()
            .filter(|tag| candidate_tags.contains(*tag))
            .count();
        shared as f64 / reference_tags.len() as f64
    })
}

/// Score, filter, and cap candidates. `sort_by` is stable, so candidates
/// with equal scores keep their relative pool order.
fn rank(
    reference: &Document,
    pool: &[Document],
    max_results: usize,
    score: impl Fn(&Document) -> f64,
) -> Vec<Document> {
    let mut scored: Vec<(&Document, f64)> = pool
        .iter()
        .filter(|candidate| !is_same_document(reference, candidate))
        .map(|candidate| (candidate, score(candidate)))
        .filter(|(_, score)| *score > 0.0)
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal)
    });

    scored
        .into_iter()
        .take(max_results)
        .map(|(candidate, _)| candidate.clone())
        .collect()
}

fn is_same_document(reference: &Document, candidate: &Document) -> bool {
    candidate.id == reference.id || candidate.slug == reference.slug
}

/// Jaccard index over lowercase tag sets; 0 when either set is empty.
fn tag_similarity(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let set_a = lowercase_set(a);
    let set_b = lowercase_set(b);
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Shared-token ratio over whitespace-tokenized, lowercased titles, with
/// tokens of one or two characters discarded; 0 when either side has no
/// tokens left.
fn title_similarity(a: &str, b: &str) -> f64 {
    let tokens_a = title_tokens(a);
    let tokens_b = title_tokens(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    let shared = tokens_b.iter().filter(|t| tokens_a.contains(*t)).count();
    shared as f64 / tokens_a.len().max(tokens_b.len()) as f64
}

fn title_tokens(title: &str) -> HashSet<String> {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|token| token.chars().count() > 2)
        .collect()
}

fn lowercase_set(tags: &[String]) -> HashSet<String> {
    tags.iter().map(|t| t.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    fn doc(id: u32, slug: &str, title: &str, category: &str, tags: &[&str]) -> Document {
        Document {
            id,
            title: title.to_string(),
            body: String::new(),
            description: String::new(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            published_at: DateTime::UNIX_EPOCH,
            slug: slug.to_string(),
            source_path: format!("content/{category}/{slug}.md"),
        }
    }

    #[test]
    fn excludes_the_reference_itself() {
        let reference = doc(1, "a", "Alpha", "dev", &["rust"]);
        let pool = vec![
            reference.clone(),
            doc(2, "b", "Beta", "dev", &["rust"]),
        ];

        let related = related_documents(&reference, &pool, 5);
        assert!(related.iter().all(|d| d.id != reference.id));
        assert_eq!(related.len(), 1);
    }

    #[test]
    fn excludes_same_slug_different_id() {
        // Same filename in two categories: different ids, one slug.
        let reference = doc(1, "setup", "Setup", "dev", &["rust"]);
        let twin = doc(2, "setup", "Setup", "life", &["rust"]);
        let pool = vec![reference.clone(), twin];

        let related = related_documents(&reference, &pool, 5);
        assert!(related.is_empty());
    }

    #[test]
    fn shared_tags_and_category_score_high() {
        let reference =
            doc(1, "a", "Borrow Checker Deep Dive", "dev", &["rust", "memory"]);
        let candidate =
            doc(2, "b", "Completely Different Words", "dev", &["rust", "memory"]);

        let score = similarity_score(&reference, &candidate);
        // tag 1.0 * 0.5 + category 1.0 * 0.3 + title 0.0 * 0.2
        assert!(score >= 0.8);
        assert!((score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn empty_tag_sets_score_zero_not_nan() {
        let reference = doc(1, "a", "Alpha", "dev", &[]);
        let candidate = doc(2, "b", "Beta", "life", &[]);

        let score = similarity_score(&reference, &candidate);
        assert!(!score.is_nan());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn tag_similarity_is_jaccard() {
        let reference = doc(1, "a", "Alpha", "dev", &["Rust", "cli"]);
        let candidate = doc(2, "b", "Beta", "life", &["rust", "web", "cli"]);

        // intersection {rust, cli} = 2, union {rust, cli, web} = 3
        let score = similarity_score(&reference, &candidate);
        assert!((score - TAG_WEIGHT * (2.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn title_similarity_ignores_short_tokens() {
        let reference = doc(1, "a", "An Ode to the Borrow Checker", "dev", &[]);
        let candidate = doc(2, "b", "My Borrow Checker", "life", &[]);

        // Reference tokens: {ode, the, borrow, checker}; candidate: {borrow, checker}.
        // Shared 2 / max(4, 2) = 0.5.
        let score = similarity_score(&reference, &candidate);
        assert!((score - TITLE_WEIGHT * 0.5).abs() < 1e-9);
    }

    #[test]
    fn zero_score_candidates_are_dropped() {
        let reference = doc(1, "a", "Alpha", "dev", &["rust"]);
        let unrelated = doc(2, "b", "Beta", "life", &["cooking"]);
        let pool = vec![reference.clone(), unrelated];

        assert!(related_documents(&reference, &pool, 5).is_empty());
    }

    #[test]
    fn respects_max_results_and_orders_descending() {
        let reference = doc(1, "r", "Reference", "dev", &["rust", "cli"]);
        let pool = vec![
            doc(2, "b", "Beta", "life", &["rust"]), // tags only
            doc(3, "c", "Gamma", "dev", &["rust", "cli"]), // tags + category
            doc(4, "d", "Delta", "dev", &["cooking"]), // category only
            doc(5, "e", "Epsilon", "dev", &["rust"]), // partial tags + category
        ];

        let related = related_documents(&reference, &pool, 3);
        assert_eq!(related.len(), 3);
        assert_eq!(related[0].slug, "c");

        let scores: Vec<f64> = related
            .iter()
            .map(|d| similarity_score(&reference, d))
            .collect();
        for pair in scores.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn ties_preserve_pool_order() {
        let reference = doc(1, "r", "Reference", "dev", &["rust"]);
        let pool = vec![
            doc(2, "first", "One", "dev", &["rust"]),
            doc(3, "second", "Two", "dev", &["rust"]),
            doc(4, "third", "Three", "dev", &["rust"]),
        ];

        let related = related_documents(&reference, &pool, 3);
        let slugs: Vec<_> = related.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(slugs, vec!["first", "second", "third"]);
    }

    #[test]
    fn category_variant_keeps_pool_order_and_cap() {
        let reference = doc(1, "r", "Reference", "dev", &[]);
        let pool = vec![
            doc(2, "a", "A", "dev", &[]),
            doc(3, "b", "B", "life", &[]),
            doc(4, "c", "C", "DEV", &[]),
            doc(5, "d", "D", "dev", &[]),
        ];

        let related = related_by_category(&reference, &pool, 2);
        let slugs: Vec<_> = related.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "c"]);
    }

    #[test]
    fn tags_variant_scores_reference_tag_coverage() {
        let reference = doc(1, "r", "Reference", "dev", &["rust", "cli"]);
        let pool = vec![
            doc(2, "half", "Half", "life", &["rust"]),
            doc(3, "full", "Full", "life", &["rust", "cli", "extra"]),
            doc(4, "none", "None", "life", &["cooking"]),
        ];

        let related = related_by_tags(&reference, &pool, 5);
        let slugs: Vec<_> = related.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(slugs, vec!["full", "half"]);
    }

    #[test]
    fn strategy_dispatch() {
        let reference = doc(1, "r", "Reference", "dev", &["rust"]);
        let pool = vec![doc(2, "a", "A", "dev", &["rust"])];

        for strategy in [Strategy::Score, Strategy::Category, Strategy::Tags] {
            assert_eq!(related(strategy, &reference, &pool, 3).len(), 1);
        }
    }
}
