use crate::error::ItemNotFound;
use crate::similarity::SimilarityMatrix;
use std::fmt;

pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub title: String,
    /// Full precision; only rounded when displayed.
    pub score: f64,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: Similarity Score {:.2}", self.title, self.score)
    }
}

/// Up to `k` titles most similar to `query`, best first. The query itself is
/// never returned; equal scores keep catalog order.
pub fn top_k(
    matrix: &SimilarityMatrix,
    query: &str,
    k: usize,
) -> Result<Vec<Recommendation>, ItemNotFound> {
    let row_idx = matrix.position(query).ok_or_else(|| ItemNotFound {
        title: query.to_string(),
    })?;

    let mut scored: Vec<(usize, f64)> = matrix
        .row(row_idx)
        .iter()
        .copied()
        .enumerate()
        .filter(|&(idx, _)| idx != row_idx)
        .collect();
    // Stable sort, so ties stay in catalog order.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(scored
        .into_iter()
        .take(k)
        .map(|(idx, score)| Recommendation {
            title: matrix.titles()[idx].clone(),
            score,
        })
        .collect())
}
