//! Text weighting for book descriptions and tags.
//!
//! Tokenizes free text, drops common English stop words, and produces
//! sparse TF-IDF vectors over unigrams and adjacent bigrams, normalized to
//! unit length so cosine similarity reduces to a dot product.
//!
//! Determinism contract: given the same corpus, the fitted vocabulary and
//! every produced vector are identical. Vocabulary selection orders terms
//! by descending corpus frequency, ties by the term itself; column indices
//! are then assigned in alphabetical term order.

use std::collections::{HashMap, HashSet};

/// Common English words excluded from the vocabulary.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "it", "in", "on", "of", "to", "and", "or", "for", "with", "this",
    "that", "be", "are", "was", "were", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "can", "shall", "not", "no",
    "but", "if", "at", "by", "from", "as", "into", "about", "up", "out", "so", "its", "you",
    "your", "i", "my", "we", "our", "they", "them", "their", "he", "she", "his", "her",
];

/// Lowercase, split on non-alphanumeric boundaries, drop stop words and
/// single-character fragments.
pub fn tokenize(text: &str) -> Vec<String> {
    let stop: HashSet<&str> = STOP_WORDS.iter().copied().collect();
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() > 1 && !stop.contains(token))
        .map(|token| token.to_string())
        .collect()
}

/// Unigrams plus adjacent bigrams over the stop-word-filtered token stream.
fn terms_of(tokens: &[String]) -> Vec<String> {
    let mut terms: Vec<String> = tokens.to_vec();
    for pair in tokens.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

/// TF-IDF vectorizer with a capped vocabulary.
///
/// Fit once over the whole corpus, then transform individual documents into
/// sparse `(column, weight)` pairs. Weights use smoothed inverse document
/// frequency, `ln((1 + n) / (1 + df)) + 1`, and each output vector is
/// L2-normalized.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f64>,
}

impl TfIdfVectorizer {
    /// Fit the vocabulary and IDF weights on a corpus.
    ///
    /// Keeps at most `max_features` terms, selected by total corpus
    /// frequency (ties broken alphabetically so selection is a pure
    /// function of the corpus text).
    pub fn fit(documents: &[String], max_features: usize) -> Self {
        let term_lists: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| terms_of(&tokenize(doc)))
            .collect();

        let mut corpus_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for terms in &term_lists {
            for term in terms {
                *corpus_counts.entry(term.clone()).or_insert(0) += 1;
            }
            let unique: HashSet<&String> = terms.iter().collect();
            for term in unique {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, usize)> = corpus_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let vocabulary: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();

        let n_docs = documents.len() as f64;
        let idf: Vec<f64> = terms
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        Self {
            vocabulary,
            terms,
            idf,
        }
    }

    /// Number of vocabulary terms (output dimensions)
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Vocabulary terms in column order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Transform a document into sparse `(column, weight)` pairs sorted by
    /// column, L2-normalized. Out-of-vocabulary terms are ignored.
    pub fn transform(&self, document: &str) -> Vec<(usize, f64)> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in terms_of(&tokenize(document)) {
            if let Some(&col) = self.vocabulary.get(&term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut weighted: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(col, tf)| (col, tf * self.idf[col]))
            .collect();
        weighted.sort_by_key(|&(col, _)| col);

        let norm = weighted
            .iter()
            .map(|(_, w)| w * w)
            .sum::<f64>()
            .sqrt();
        if norm > 0.0 {
            for (_, w) in &mut weighted {
                *w /= norm;
            }
        }
        weighted
    }
}
