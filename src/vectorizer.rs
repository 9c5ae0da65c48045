//! TF-IDF vectorization of catalog feature texts.
//!
//! Statistics are corpus-relative: all feature texts of one catalog are
//! fitted together, producing a shared [`Vocabulary`] and one L2-normalized
//! [`TermVector`] per item, so that cosine similarity becomes a dot product.

use crate::stopwords::is_stop_word;
use rayon::prelude::*;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

static TOKEN_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Lower-cases `text` and returns its runs of two or more alphanumeric
/// characters, stop words removed. No stemming.
pub fn tokenize(text: &str) -> Vec<String> {
    let pattern = TOKEN_PATTERN
        .get_or_init(|| Regex::new(r"[\p{Alphabetic}\p{Nd}]{2,}").expect("valid token pattern"));
    let lowered = text.to_lowercase();
    pattern
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// Distinct terms of a corpus, ordered by first occurrence.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    fn intern(&mut self, term: &str) -> usize {
        if let Some(&idx) = self.index.get(term) {
            return idx;
        }
        let idx = self.terms.len();
        self.terms.push(term.to_string());
        self.index.insert(term.to_string(), idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[cfg(test)]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    #[cfg(test)]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Sparse, non-negative weights keyed by vocabulary index, sorted by index.
/// An item without surviving tokens has no entries (the zero vector).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    entries: Vec<(usize, f64)>,
}

impl TermVector {
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    #[cfg(test)]
    pub fn weight(&self, term: usize) -> f64 {
        self.entries
            .binary_search_by_key(&term, |&(idx, _)| idx)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    #[cfg(test)]
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Merge-join over the non-zero dimensions of both vectors.
    pub fn dot(&self, other: &TermVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            if a_idx == b_idx {
                sum += a_w * b_w;
                i += 1;
                j += 1;
            } else if a_idx < b_idx {
                i += 1;
            } else {
                j += 1;
            }
        }
        sum
    }
}

/// Result of fitting a corpus: vocabulary plus one vector per input text, in
/// input order.
#[derive(Debug, Clone)]
pub struct FittedCorpus {
    pub vocabulary: Vocabulary,
    pub vectors: Vec<TermVector>,
}

#[derive(Debug, Clone, Copy)]
pub struct TfidfVectorizer {
    /// Added to every IDF value. The default `1.0` keeps a term present in
    /// every item at a positive weight; `0.0` drops such terms entirely.
    idf_bias: f64,
}

pub const DEFAULT_IDF_BIAS: f64 = 1.0;

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self {
            idf_bias: DEFAULT_IDF_BIAS,
        }
    }
}

impl TfidfVectorizer {
    pub fn new(idf_bias: f64) -> Self {
        Self { idf_bias }
    }

    /// Weight of term t in item d: `tf(t, d) * (ln((1 + N) / (1 + df(t))) + bias)`,
    /// then each row is scaled to unit L2 norm.
    pub fn fit_transform<S: AsRef<str> + Sync>(&self, texts: &[S]) -> FittedCorpus {
        let token_streams: Vec<Vec<String>> =
            texts.par_iter().map(|text| tokenize(text.as_ref())).collect();

        let mut vocabulary = Vocabulary::default();
        let mut counts: Vec<HashMap<usize, usize>> = Vec::with_capacity(token_streams.len());
        for tokens in &token_streams {
            let mut tf: HashMap<usize, usize> = HashMap::new();
            for token in tokens {
                *tf.entry(vocabulary.intern(token)).or_insert(0) += 1;
            }
            counts.push(tf);
        }

        let mut doc_freq = vec![0usize; vocabulary.len()];
        for tf in &counts {
            for &term in tf.keys() {
                doc_freq[term] += 1;
            }
        }

        let n = texts.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + self.idf_bias)
            .collect();

        let vectors: Vec<TermVector> = counts
            .into_par_iter()
            .map(|tf| Self::weigh(tf, &idf))
            .collect();

        let corpus = FittedCorpus { vocabulary, vectors };
        log::debug!(
            "Vectorized {} items over a vocabulary of {} terms ({} without any terms)",
            texts.len(),
            corpus.vocabulary.len(),
            corpus.vectors.iter().filter(|v| v.is_zero()).count()
        );
        corpus
    }

    fn weigh(tf: HashMap<usize, usize>, idf: &[f64]) -> TermVector {
        let mut entries: Vec<(usize, f64)> = tf
            .into_iter()
            .map(|(term, count)| (term, count as f64 * idf[term]))
            .filter(|&(_, weight)| weight > 0.0)
            .collect();
        entries.sort_unstable_by_key(|&(term, _)| term);

        let norm = entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            return TermVector::default();
        }
        for entry in &mut entries {
            entry.1 /= norm;
        }
        TermVector { entries }
    }
}
