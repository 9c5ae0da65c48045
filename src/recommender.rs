use crate::catalog::{Catalog, CatalogSource, Category};
use crate::error::{CatalogError, ItemNotFound};
use crate::provider::{ItemDetails, MetadataProvider, ProviderLookup};
use crate::ranker::{top_k, Recommendation};
use crate::similarity::SimilarityMatrix;
use crate::vectorizer::TfidfVectorizer;

/// Why the local catalog could not answer a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NotInDataset,
    /// The title is present but nothing else shares its catalog.
    NoOtherItems,
}

/// Where a request's answer came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Dataset(Vec<Recommendation>),
    Provider {
        reason: FallbackReason,
        details: Option<ItemDetails>,
        similar: Vec<ItemDetails>,
    },
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        match self {
            Outcome::Dataset(recs) => recs.is_empty(),
            Outcome::Provider { similar, .. } => similar.is_empty(),
        }
    }
}

/// Full content-based pipeline over one catalog snapshot: feature texts,
/// TF-IDF, similarity matrix, top-K.
pub fn recommend_from_catalog(
    catalog: &Catalog,
    query: &str,
    k: usize,
    vectorizer: &TfidfVectorizer,
) -> Result<Vec<Recommendation>, ItemNotFound> {
    // Skip the quadratic work when the answer is already known.
    if catalog.position(query).is_none() {
        return Err(ItemNotFound {
            title: query.to_string(),
        });
    }
    let matrix = SimilarityMatrix::from_catalog(catalog, vectorizer);
    top_k(&matrix, query, k)
}

/// Answers one request from the local catalog, falling back to the category's
/// metadata provider when the catalog cannot. Holds no per-request state.
pub struct Recommender<S: CatalogSource> {
    catalogs: S,
    movies: Box<dyn MetadataProvider>,
    books: Box<dyn MetadataProvider>,
    vectorizer: TfidfVectorizer,
    top_k: usize,
}

impl<S: CatalogSource> Recommender<S> {
    pub fn new(
        catalogs: S,
        movies: Box<dyn MetadataProvider>,
        books: Box<dyn MetadataProvider>,
        vectorizer: TfidfVectorizer,
        top_k: usize,
    ) -> Self {
        if top_k == 0 {
            log::warn!("top_k must be at least 1; using 1");
        }
        Self {
            catalogs,
            movies,
            books,
            vectorizer,
            top_k: top_k.max(1),
        }
    }

    fn provider(&self, category: Category) -> &dyn MetadataProvider {
        match category {
            Category::Movie => self.movies.as_ref(),
            Category::Book => self.books.as_ref(),
        }
    }

    /// Schema violations in the catalog are returned; everything else ends in
    /// an `Outcome`, possibly an empty one.
    pub fn recommend(&self, category: Category, name: &str) -> Result<Outcome, CatalogError> {
        let catalog = match self.catalogs.load(category) {
            Ok(catalog) => catalog,
            Err(e) if !e.is_schema_error() => {
                log::warn!("{}; continuing without a local {} catalog", e, category);
                Catalog::new(category)
            }
            Err(e) => return Err(e),
        };

        let reason = match recommend_from_catalog(&catalog, name, self.top_k, &self.vectorizer) {
            Ok(recs) if !recs.is_empty() => return Ok(Outcome::Dataset(recs)),
            Ok(_) => {
                log::info!("'{}' is the only {} in the dataset", name, catalog.category());
                FallbackReason::NoOtherItems
            }
            Err(not_found) => {
                log::info!("{}", not_found);
                FallbackReason::NotInDataset
            }
        };

        Ok(self.fallback(category, name, reason))
    }

    fn fallback(&self, category: Category, name: &str, reason: FallbackReason) -> Outcome {
        let ProviderLookup { details, similar } = self.provider(category).lookup(name);
        match &details {
            Some(found) => log::debug!("Provider matched '{}' to '{}'", name, found.title()),
            None => log::debug!("Provider has no details for '{}'", name),
        }
        Outcome::Provider {
            reason,
            details,
            similar,
        }
    }
}
