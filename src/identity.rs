use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Terminal fallback when a filename yields no usable slug characters.
const FALLBACK_SLUG: &str = "untitled-post";

/// Derive a URL-safe slug from a filename stem.
///
/// Emoji are removed outright; any remaining character that is not a letter
/// (any script), digit, whitespace, or hyphen becomes a hyphen; whitespace
/// and hyphen runs collapse to a single hyphen; edge hyphens are trimmed.
/// If nothing survives, non-ASCII letters alone are extracted from the stem,
/// and failing that the literal `untitled-post` is returned.
pub fn slugify(stem: &str) -> String {
    let mut slug = String::with_capacity(stem.len());
    let mut prev_hyphen = true; // swallow leading hyphens

    for c in stem.chars() {
        if is_emoji(c) {
            continue;
        }
        let c = if c.is_alphanumeric() || c == '-' {
            c
        } else {
            // Whitespace and disallowed punctuation both map to hyphens.
            '-'
        };
        if c == '-' {
            if !prev_hyphen {
                slug.push('-');
                prev_hyphen = true;
            }
        } else {
            slug.push(c);
            prev_hyphen = false;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if !slug.is_empty() {
        return slug;
    }

    let non_latin: String = stem
        .chars()
        .filter(|c| c.is_alphabetic() && !c.is_ascii())
        .collect();
    if !non_latin.is_empty() {
        return non_latin;
    }

    FALLBACK_SLUG.to_string()
}

/// Character ranges removed before slug derivation.
fn is_emoji(c: char) -> bool {
    matches!(c,
        '\u{1F000}'..='\u{1FAFF}' // pictographs, emoticons, transport, symbols
        | '\u{2600}'..='\u{27BF}' // misc symbols, dingbats
        | '\u{2B00}'..='\u{2BFF}' // arrows and stars used as emoji
        | '\u{FE00}'..='\u{FE0F}' // variation selectors
        | '\u{200D}' // zero-width joiner
    )
}

/// Stable numeric identity for a document, derived from its path.
///
/// Path separators are normalized to `/`, then a 31-multiplier polynomial
/// hash is accumulated over the UTF-16 code units of the string in wrapping
/// 32-bit signed arithmetic; the result is the absolute value. This exact
/// sequence is the sole uniqueness guarantee in the system and must stay
/// bit-for-bit reproducible for a given path string.
pub fn path_id(path: &str) -> u32 {
    let normalized = path.replace('\\', "/");
    let mut h: i32 = 0;
    for unit in normalized.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    h.unsigned_abs()
}

/// Outcome of registering a path with the [`IdRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdAssignment {
    /// The id is unique so far.
    Fresh(u32),
    /// Another path already claimed this id.
    CollisionWith {
        id: u32,
        /// The path that registered the id first.
        existing: String,
    },
}

/// Tracks assigned ids so duplicate hashes surface as explicit collisions
/// instead of silently replacing a document.
#[derive(Debug, Default)]
pub struct IdRegistry {
    seen: HashMap<u32, String>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the id for `path` and record it. The first path to claim an
    /// id wins; later paths get a [`IdAssignment::CollisionWith`].
    pub fn assign(&mut self, path: &str) -> IdAssignment {
        let id = path_id(path);
        match self.seen.entry(id) {
            Entry::Occupied(entry) => IdAssignment::CollisionWith {
                id,
                existing: entry.get().clone(),
            },
            Entry::Vacant(entry) => {
                entry.insert(path.to_string());
                IdAssignment::Fresh(id)
            }
        }
    }
}
