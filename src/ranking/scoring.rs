//! Relevance scoring primitives
//!
//! Pure functions over embedding vectors and token sets. The ranker composes
//! these into the fused score; keeping them free-standing keeps each signal
//! testable on its own.

use ahash::AHashSet;

/// Synonym table for the semantic signal. Lookup is one-way: the key is a
/// query token and the values are accepted stand-ins in document text. A
/// document saying "drill" answers a query for "well", not the reverse.
const SYNONYMS: [(&str, &[&str]); 5] = [
    ("well", &["drill", "bore", "hole", "shaft"]),
    ("formation", &["layer", "unit", "zone", "horizon"]),
    ("depth", &["footage", "interval", "level"]),
    ("oil", &["petroleum", "hydrocarbon", "crude"]),
    ("gas", &["natural gas", "methane", "hydrocarbon"]),
];

/// Cosine similarity between two vectors.
///
/// A zero-norm input yields 0.0 rather than NaN; a zero vector is similar to
/// nothing as far as ranking is concerned.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Lower-cased whitespace tokens of `text`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(|t| t.to_lowercase()).collect()
}

/// Fraction of distinct query tokens that occur in the document's token set.
///
/// Both sides are set-valued: repeating a token in the query or the document
/// does not change the score. An empty query scores 0.
pub fn keyword_overlap(query_tokens: &[String], doc_tokens: &AHashSet<&str>) -> f32 {
    let query_set: AHashSet<&str> = query_tokens.iter().map(String::as_str).collect();
    if query_set.is_empty() {
        return 0.0;
    }

    let matched = query_set
        .iter()
        .filter(|token| doc_tokens.contains(**token))
        .count();
    matched as f32 / query_set.len() as f32
}

/// Mean per-token occurrence credit over the query token list.
///
/// A token found verbatim anywhere in `haystack` earns 1.0; a token whose
/// synonym appears earns `synonym_credit`; otherwise 0. `haystack` must
/// already be lower-cased. Substring matching is deliberate: it lets the
/// multi-word synonym "natural gas" and inflected forms like "drilling"
/// count. An empty query scores 0.
pub fn semantic_score(query_tokens: &[String], haystack: &str, synonym_credit: f32) -> f32 {
    if query_tokens.is_empty() {
        return 0.0;
    }

    let total: f32 = query_tokens
        .iter()
        .map(|token| {
            if haystack.contains(token.as_str()) {
                1.0
            } else if synonym_matches(token, haystack) {
                synonym_credit
            } else {
                0.0
            }
        })
        .sum();
    total / query_tokens.len() as f32
}

fn synonym_matches(token: &str, haystack: &str) -> bool {
    SYNONYMS
        .iter()
        .find(|(key, _)| *key == token)
        .is_some_and(|(_, alternatives)| alternatives.iter().any(|alt| haystack.contains(alt)))
}
