//! TF-IDF text vectorization for catalog documents.
//!
//! Turns free text into L2-normalized term vectors in a shared vocabulary
//! space, so the cosine similarity between two documents reduces to a dot
//! product of their vectors.
//!
//! ## Pipeline
//! 1. Tokenize: lowercase alphanumeric runs
//! 2. Drop English stop words
//! 3. Cap the vocabulary at the most frequent terms
//! 4. Weight by smoothed TF-IDF and normalize each vector to unit length

use std::collections::{HashMap, HashSet};

/// Common English stop words, dropped before vocabulary construction.
///
/// Based on the usual NLTK/scikit-learn lists; catalog text is English.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    // Articles, conjunctions, prepositions
    "a", "an", "the", "and", "but", "or", "nor", "so", "yet", "both", "either", "neither",
    "at", "by", "for", "from", "in", "into", "of", "off", "on", "onto", "out", "over",
    "to", "under", "up", "with", "about", "above", "after", "against", "before", "below",
    "between", "during", "through", "until", "upon", "within", "without",
    // Pronouns
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "he", "him", "his", "himself", "she", "her", "hers", "herself", "it",
    "its", "itself", "they", "them", "their", "theirs", "themselves",
    // Question words and demonstratives
    "what", "which", "who", "whom", "whose", "this", "that", "these", "those", "where",
    "when", "why", "how",
    // Verbs and auxiliaries
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "having", "do", "does", "did", "doing", "will", "would", "shall", "should", "can",
    "could", "may", "might", "must",
    // Common fillers
    "all", "any", "each", "few", "more", "most", "other", "some", "such", "no", "not",
    "only", "own", "same", "than", "too", "very", "just", "also", "then", "once", "here",
    "there", "again", "further", "as", "if", "because", "while", "now", "s", "t",
];

/// Split text into lowercase alphanumeric tokens.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .collect()
}

/// TF-IDF vectorizer with a bounded vocabulary.
///
/// `fit` learns the vocabulary and IDF weights from a document corpus;
/// `transform` maps documents into that space. The vocabulary is capped at
/// `max_features` terms, keeping the most frequent ones (ties broken
/// alphabetically so rebuilds are deterministic).
#[derive(Debug)]
pub struct TfidfVectorizer {
    max_features: usize,
    stop_words: HashSet<&'static str>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        }
    }

    /// Tokenize one document, dropping stop words.
    fn terms(&self, document: &str) -> Vec<String> {
        tokenize(document)
            .into_iter()
            .filter(|token| !self.stop_words.contains(token.as_str()))
            .collect()
    }

    /// Learn the vocabulary and IDF weights from a corpus.
    pub fn fit(&mut self, documents: &[String]) {
        let n_docs = documents.len();
        let mut term_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for document in documents {
            let mut seen: HashSet<&str> = HashSet::new();
            let terms = self.terms(document);
            for term in &terms {
                *term_freq.entry(term.clone()).or_insert(0) += 1;
            }
            for term in &terms {
                if seen.insert(term) {
                    *doc_freq.entry(term.clone()).or_insert(0) += 1;
                }
            }
        }

        // Keep the most frequent terms, alphabetical within ties
        let mut ranked: Vec<(String, usize)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);

        self.vocabulary = ranked
            .into_iter()
            .enumerate()
            .map(|(idx, (term, _))| (term, idx))
            .collect();

        // Smoothed IDF: ln((1 + n) / (1 + df)) + 1
        self.idf = vec![0.0; self.vocabulary.len()];
        for (term, &idx) in &self.vocabulary {
            let df = doc_freq.get(term).copied().unwrap_or(0);
            self.idf[idx] = ((1.0 + n_docs as f32) / (1.0 + df as f32)).ln() + 1.0;
        }
    }

    /// Map documents into the learned space as unit-length TF-IDF vectors.
    ///
    /// A document with no in-vocabulary terms maps to the zero vector.
    pub fn transform(&self, documents: &[String]) -> Vec<Vec<f32>> {
        documents
            .iter()
            .map(|document| {
                let mut vector = vec![0.0f32; self.vocabulary.len()];
                for term in self.terms(document) {
                    if let Some(&idx) = self.vocabulary.get(&term) {
                        vector[idx] += 1.0;
                    }
                }
                for (idx, value) in vector.iter_mut().enumerate() {
                    *value *= self.idf[idx];
                }

                let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
                if norm > 0.0 {
                    for value in &mut vector {
                        *value /= norm;
                    }
                }
                vector
            })
            .collect()
    }

    /// Fit the corpus, then transform it.
    pub fn fit_transform(&mut self, documents: &[String]) -> Vec<Vec<f32>> {
        self.fit(documents);
        self.transform(documents)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tokenizer_lowercases_and_splits_on_punctuation() {
        let tokens = tokenize("Blade-Runner: 2049!");
        assert_eq!(tokens, vec!["blade", "runner", "2049"]);
    }

    #[test]
    fn stop_words_do_not_enter_the_vocabulary() {
        let mut vectorizer = TfidfVectorizer::new(5000);
        vectorizer.fit(&docs(&["the quick fox", "the lazy dog"]));

        assert_eq!(vectorizer.vocabulary_size(), 4);
        assert!(!vectorizer.vocabulary.contains_key("the"));
    }

    #[test]
    fn vectors_are_unit_length() {
        let mut vectorizer = TfidfVectorizer::new(5000);
        let corpus = docs(&["space station crew", "space mining crew", "desert chase"]);
        let vectors = vectorizer.fit_transform(&corpus);

        for vector in &vectors {
            let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn empty_document_maps_to_zero_vector() {
        let mut vectorizer = TfidfVectorizer::new(5000);
        let corpus = docs(&["haunted house", ""]);
        let vectors = vectorizer.fit_transform(&corpus);

        assert!(vectors[1].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn max_features_caps_the_vocabulary() {
        let mut vectorizer = TfidfVectorizer::new(2);
        vectorizer.fit(&docs(&["alpha beta gamma", "alpha beta", "alpha"]));

        // "alpha" (3) and "beta" (2) survive, "gamma" is cut
        assert_eq!(vectorizer.vocabulary_size(), 2);
        assert!(vectorizer.vocabulary.contains_key("alpha"));
        assert!(vectorizer.vocabulary.contains_key("beta"));
    }

    #[test]
    fn shared_terms_produce_larger_dot_products() {
        let mut vectorizer = TfidfVectorizer::new(5000);
        let corpus = docs(&[
            "robot uprising in space",
            "robot rebellion in space",
            "romantic comedy wedding",
        ]);
        let vectors = vectorizer.fit_transform(&corpus);

        let dot = |a: &[f32], b: &[f32]| -> f32 {
            a.iter().zip(b).map(|(x, y)| x * y).sum()
        };
        assert!(dot(&vectors[0], &vectors[1]) > dot(&vectors[0], &vectors[2]));
    }
}
