use crate::catalog::Catalog;
use crate::vectorizer::{TermVector, TfidfVectorizer};
use rayon::prelude::*;
use std::collections::HashMap;

/// Square, symmetric cosine-similarity matrix over one catalog snapshot,
/// addressed by title through an explicit title-to-row table.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    titles: Vec<String>,
    index: HashMap<String, usize>,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Vectorizes the catalog's feature texts and scores every pair. Rows
    /// follow catalog order.
    pub fn from_catalog(catalog: &Catalog, vectorizer: &TfidfVectorizer) -> Self {
        let fitted = vectorizer.fit_transform(&catalog.feature_texts());
        log::debug!(
            "Sizing {} {} against {} vocabulary terms",
            catalog.len(),
            catalog.category().plural(),
            fitted.vocabulary.len()
        );
        Self::compute(catalog.titles(), &fitted.vectors)
    }

    /// `titles[i]` labels `vectors[i]`; vectors must be L2-normalized.
    ///
    /// Each unordered pair is computed once and mirrored. Rows of the upper
    /// triangle are independent, so they are computed in parallel and
    /// assembled afterwards. The diagonal is set to 1.0 rather than computed.
    pub fn compute(titles: Vec<String>, vectors: &[TermVector]) -> Self {
        debug_assert_eq!(titles.len(), vectors.len(), "one title per term vector");
        let n = vectors.len();

        let upper: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                vectors[i + 1..]
                    .iter()
                    // Rounding can push identical rows just past 1.0.
                    .map(|other| vectors[i].dot(other).clamp(0.0, 1.0))
                    .collect()
            })
            .collect();

        let mut values = vec![0.0; n * n];
        for (i, row) in upper.into_iter().enumerate() {
            values[i * n + i] = 1.0;
            for (offset, score) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                values[i * n + j] = score;
                values[j * n + i] = score;
            }
        }

        let index = titles
            .iter()
            .enumerate()
            .map(|(i, title)| (title.clone(), i))
            .collect();

        log::debug!("Computed {}x{} similarity matrix", n, n);
        Self { titles, index, values }
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn position(&self, title: &str) -> Option<usize> {
        self.index.get(title).copied()
    }

    #[cfg(test)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.len() + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.len();
        &self.values[i * n..(i + 1) * n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogItem, Category};

    fn build(texts: &[&str]) -> SimilarityMatrix {
        let fitted = TfidfVectorizer::default().fit_transform(texts);
        let titles = (0..texts.len()).map(|i| format!("item{}", i)).collect();
        SimilarityMatrix::compute(titles, &fitted.vectors)
    }

    fn sample() -> SimilarityMatrix {
        build(&[
            "sci-fi space war epic",
            "sci-fi space battle saga",
            "romance love story in paris",
            "romance war drama",
            "the of and",
            "sci-fi space war epic",
        ])
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let m = sample();
        for i in 0..m.len() {
            for j in 0..m.len() {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn test_diagonal_is_exactly_one() {
        let m = sample();
        for i in 0..m.len() {
            assert_eq!(m.get(i, i), 1.0);
        }
    }

    #[test]
    fn test_entries_in_unit_interval() {
        let m = sample();
        for i in 0..m.len() {
            assert!(m.row(i).iter().all(|&s| (0.0..=1.0).contains(&s)));
        }
        // Identical feature texts.
        assert!((m.get(0, 5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vector_similarity_is_zero() {
        let m = sample();
        for j in 0..m.len() {
            if j != 4 {
                assert_eq!(m.get(4, j), 0.0);
            }
        }
        assert_eq!(m.get(4, 4), 1.0);
    }

    #[test]
    fn test_shared_vocabulary_scores_higher() {
        let m = sample();
        assert!(m.get(0, 1) > m.get(0, 2));
        assert_eq!(m.get(0, 2), 0.0);
    }

    #[test]
    fn test_identical_items_sharing_every_term_score_one() {
        let m = build(&["drama war story", "drama war story"]);
        assert!((m.get(0, 1) - 1.0).abs() < 1e-12);
        assert_eq!(m.get(0, 1), m.get(1, 0));
    }

    #[test]
    fn test_shared_genre_contributes_to_similarity() {
        let m = build(&["drama war story", "drama war story", "drama courtroom"]);
        assert!(m.get(0, 2) > 0.0);
        assert!(m.get(0, 1) > m.get(0, 2));
    }

    #[test]
    fn test_from_catalog_rows_follow_catalog_order() {
        let catalog = Catalog::from_items(
            Category::Movie,
            vec![
                CatalogItem::new("A", "drama", "war story"),
                CatalogItem::new("B", "drama", "war story"),
                CatalogItem::new("C", "comedy", "road trip"),
            ],
        )
        .unwrap();
        let m = SimilarityMatrix::from_catalog(&catalog, &TfidfVectorizer::default());
        assert_eq!(m.len(), catalog.len());
        assert_eq!(m.titles(), &["A", "B", "C"]);
        assert!((m.get(0, 1) - 1.0).abs() < 1e-12);
        assert_eq!(m.get(0, 2), 0.0);
    }

    #[test]
    fn test_empty_catalog_yields_empty_matrix() {
        let m = SimilarityMatrix::compute(Vec::new(), &[]);
        assert!(m.is_empty());
        let empty = SimilarityMatrix::from_catalog(&Catalog::new(Category::Book), &TfidfVectorizer::default());
        assert!(empty.is_empty());
        assert_eq!(m.position("anything"), None);
    }

    #[test]
    fn test_rows_addressed_by_title() {
        let m = sample();
        assert_eq!(m.position("item2"), Some(2));
        assert_eq!(m.row(2).len(), m.len());
        assert_eq!(m.titles()[3], "item3");
    }
}
