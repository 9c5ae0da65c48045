use crate::http::{create_http_client, get_json};
use crate::provider::{BookDetails, ItemDetails, MetadataProvider, ProviderLookup};
use crate::retry::RetryPolicy;
use reqwest::blocking::Client;
use serde::Deserialize;
use urlencoding::encode;

#[derive(Deserialize, Debug, Default)]
struct VolumeList {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Deserialize, Debug)]
struct Volume {
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

#[derive(Deserialize, Debug, Default)]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    description: Option<String>,
    #[serde(rename = "averageRating")]
    average_rating: Option<f64>,
}

impl From<Volume> for ItemDetails {
    fn from(volume: Volume) -> Self {
        let info = volume.volume_info;
        ItemDetails::Book(BookDetails {
            title: info.title.unwrap_or_default(),
            authors: info.authors.join(", "),
            description: info.description,
            average_rating: info.average_rating,
        })
    }
}

/// Google Books volume search. The same query serves both lookups: the first
/// hit is the book itself, the full hit list is the "similar" set.
pub struct GoogleBooksProvider {
    client: Client,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
}

impl GoogleBooksProvider {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            client: create_http_client(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry,
        }
    }

    fn search_url(&self, query: &str) -> String {
        let mut url = format!("{}?q={}", self.base_url, encode(query));
        if !self.api_key.is_empty() {
            url.push_str("&key=");
            url.push_str(&encode(&self.api_key));
        }
        url
    }

    fn search(&self, what: &str, query: &str) -> Vec<ItemDetails> {
        let url = self.search_url(query);
        self.retry
            .run(what, || get_json::<VolumeList>(&self.client, &url))
            .unwrap_or_default()
            .items
            .into_iter()
            .map(ItemDetails::from)
            .collect()
    }
}

/// The first hit stands for the book itself; every hit counts as similar.
fn split_hits(hits: Vec<ItemDetails>) -> ProviderLookup {
    ProviderLookup {
        details: hits.first().cloned(),
        similar: hits,
    }
}

impl MetadataProvider for GoogleBooksProvider {
    fn fetch_details(&self, name: &str) -> Option<ItemDetails> {
        log::debug!("Searching Google Books for '{}'", name);
        let first = self.search("Google Books search", name).into_iter().next();
        if first.is_none() {
            log::info!("Google Books has no results for '{}'", name);
        }
        first
    }

    fn similar_reference(&self, name: &str, _details: Option<&ItemDetails>) -> Option<String> {
        Some(name.to_string())
    }

    fn fetch_similar(&self, reference: &str) -> Vec<ItemDetails> {
        log::debug!("Fetching Google Books volumes similar to '{}'", reference);
        self.search("Google Books similar volumes", reference)
    }

    fn lookup(&self, name: &str) -> ProviderLookup {
        log::debug!("Searching Google Books for '{}' and its neighbours", name);
        let found = split_hits(self.search("Google Books search", name));
        if found.details.is_none() {
            log::info!("Google Books has no results for '{}'", name);
        }
        found
    }
}
