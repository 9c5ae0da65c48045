//! Metadata providers queried when an item is not in the local catalog.
//!
//! Providers own their retry policy: transport failures never reach the
//! caller, which only sees `None` or an empty list.

#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetails {
    pub id: Option<u64>,
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookDetails {
    pub title: String,
    /// Author names joined by ", ".
    pub authors: String,
    pub description: Option<String>,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemDetails {
    Movie(MovieDetails),
    Book(BookDetails),
}

impl ItemDetails {
    pub fn title(&self) -> &str {
        match self {
            ItemDetails::Movie(movie) => &movie.title,
            ItemDetails::Book(book) => &book.title,
        }
    }
}

/// What a provider knows about a requested title.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderLookup {
    pub details: Option<ItemDetails>,
    pub similar: Vec<ItemDetails>,
}

pub trait MetadataProvider {
    /// Best match for `name`, if the provider knows it.
    fn fetch_details(&self, name: &str) -> Option<ItemDetails>;

    /// Key accepted by [`fetch_similar`](Self::fetch_similar) for this lookup.
    /// Providers differ: some need an id from `details`, others take the name.
    fn similar_reference(&self, name: &str, details: Option<&ItemDetails>) -> Option<String>;

    fn fetch_similar(&self, reference: &str) -> Vec<ItemDetails>;

    /// Details plus similar items for `name`. Providers whose two lookups hit
    /// the same endpoint override this to query once.
    fn lookup(&self, name: &str) -> ProviderLookup {
        let details = self.fetch_details(name);
        let similar = match self.similar_reference(name, details.as_ref()) {
            Some(reference) => self.fetch_similar(&reference),
            None => Vec::new(),
        };
        ProviderLookup { details, similar }
    }
}
