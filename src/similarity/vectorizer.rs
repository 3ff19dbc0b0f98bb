//! Bag-of-words vectorizer.
//!
//! The vocabulary is fit once over the whole corpus: the `max_features` most
//! frequent terms by corpus-wide count, stop words excluded. After fitting it
//! never changes; terms outside it are ignored when transforming.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use super::stopwords::is_stop_word;

/// Two or more word characters.
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("static regex"));

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|term| !is_stop_word(term))
}

/// Sparse term-count vector, entries sorted by term index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermVector {
    entries: Vec<(usize, u32)>,
}

impl TermVector {
    pub fn entries(&self) -> &[(usize, u32)] {
        &self.entries
    }

    #[allow(dead_code)]
    pub fn get(&self, term: usize) -> u32 {
        self.entries
            .binary_search_by_key(&term, |(t, _)| *t)
            .map(|idx| self.entries[idx].1)
            .unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dense form, one slot per vocabulary term.
    #[allow(dead_code)]
    pub fn to_dense(&self, vocabulary_size: usize) -> Vec<u32> {
        let mut dense = vec![0; vocabulary_size];
        for &(term, count) in &self.entries {
            dense[term] = count;
        }
        dense
    }
}

#[derive(Debug, Clone)]
pub struct CountVectorizer {
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
}

impl CountVectorizer {
    /// Learn the vocabulary from `documents`.
    pub fn fit<S: AsRef<str>>(documents: &[S], max_features: usize) -> Self {
        let mut term_freq: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            for term in tokenize(doc.as_ref()) {
                *term_freq.entry(term).or_insert(0) += 1;
            }
        }

        // frequency DESC, then term ASC
        let mut ranked: Vec<(String, usize)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(max_features);

        let terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        let vocabulary = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();

        log::debug!("vocabulary fit: {} terms", terms.len());

        Self { vocabulary, terms }
    }

    pub fn transform(&self, document: &str) -> TermVector {
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for term in tokenize(document) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }

        let mut entries: Vec<(usize, u32)> = counts.into_iter().collect();
        entries.sort_unstable_by_key(|(term, _)| *term);
        TermVector { entries }
    }

    pub fn fit_transform<S: AsRef<str>>(
        documents: &[S],
        max_features: usize,
    ) -> (Self, Vec<TermVector>) {
        let vectorizer = Self::fit(documents, max_features);
        let vectors = documents
            .iter()
            .map(|doc| vectorizer.transform(doc.as_ref()))
            .collect();
        (vectorizer, vectors)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    #[allow(dead_code)]
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    #[allow(dead_code)]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_short_tokens_and_stop_words() {
        let tokens: Vec<String> = tokenize("the a dune of arrakis x").collect();
        assert_eq!(tokens, vec!["dune", "arrakis"]);
    }

    #[test]
    fn test_tokenize_splits_punctuation() {
        let tokens: Vec<String> = tokenize("sci-fi: herbert's dune").collect();
        assert_eq!(tokens, vec!["sci", "fi", "herbert", "dune"]);
    }

    #[test]
    fn test_fit_ranks_by_frequency_then_term() {
        let docs = ["dune spice", "dune worm", "spice dune"];
        let vectorizer = CountVectorizer::fit(&docs, 10);
        assert_eq!(vectorizer.terms(), ["dune", "spice", "worm"]);
    }

    #[test]
    fn test_fit_respects_max_features() {
        let docs = ["dune spice", "dune worm", "spice dune"];
        let vectorizer = CountVectorizer::fit(&docs, 2);
        assert_eq!(vectorizer.vocabulary_size(), 2);
        assert!(vectorizer.term_index("worm").is_none());
    }

    #[test]
    fn test_transform_counts_terms() {
        let docs = ["dune dune spice", "worm"];
        let (vectorizer, vectors) = CountVectorizer::fit_transform(&docs, 10);

        let dune = vectorizer.term_index("dune").unwrap();
        let spice = vectorizer.term_index("spice").unwrap();
        let worm = vectorizer.term_index("worm").unwrap();

        assert_eq!(vectors[0].get(dune), 2);
        assert_eq!(vectors[0].get(spice), 1);
        assert_eq!(vectors[0].get(worm), 0);
        assert_eq!(vectors[1].to_dense(3)[worm], 1);
    }

    #[test]
    fn test_transform_ignores_unknown_terms() {
        let vectorizer = CountVectorizer::fit(&["dune"], 10);
        let vector = vectorizer.transform("foundation empire");
        assert!(vector.is_zero());
    }

    #[test]
    fn test_only_stop_words_yields_zero_vector() {
        let (vectorizer, vectors) = CountVectorizer::fit_transform(&["the and of", "dune"], 10);
        assert_eq!(vectorizer.vocabulary_size(), 1);
        assert!(vectors[0].is_zero());
    }
}
