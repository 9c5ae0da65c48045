use crate::http::{create_http_client, get_json};
use crate::provider::{ItemDetails, MetadataProvider, MovieDetails};
use crate::retry::RetryPolicy;
use reqwest::blocking::Client;
use serde::Deserialize;
use urlencoding::encode;

#[derive(Deserialize, Debug, Default)]
struct MovieList {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

#[derive(Deserialize, Debug)]
struct TmdbMovie {
    id: Option<u64>,
    title: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f64>,
}

impl From<TmdbMovie> for ItemDetails {
    fn from(movie: TmdbMovie) -> Self {
        ItemDetails::Movie(MovieDetails {
            id: movie.id,
            title: movie.title.unwrap_or_default(),
            overview: movie.overview,
            release_date: movie.release_date,
            rating: movie.vote_average,
        })
    }
}

/// The Movie Database: title search plus the per-movie "similar" listing.
pub struct TmdbProvider {
    client: Client,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
}

impl TmdbProvider {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            client: create_http_client(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry,
        }
    }

    fn search_url(&self, name: &str) -> String {
        format!(
            "{}/search/movie?api_key={}&query={}",
            self.base_url,
            encode(&self.api_key),
            encode(name)
        )
    }

    fn similar_url(&self, movie_id: &str) -> String {
        format!(
            "{}/movie/{}/similar?api_key={}",
            self.base_url,
            encode(movie_id),
            encode(&self.api_key)
        )
    }

    fn fetch_list(&self, what: &str, url: &str) -> Option<MovieList> {
        if self.api_key.is_empty() {
            log::warn!("TMDb API key is not configured; skipping {}", what);
            return None;
        }
        self.retry.run(what, || get_json::<MovieList>(&self.client, url))
    }
}

impl MetadataProvider for TmdbProvider {
    fn fetch_details(&self, name: &str) -> Option<ItemDetails> {
        log::debug!("Searching TMDb for movie '{}'", name);
        let first = self
            .fetch_list("TMDb movie search", &self.search_url(name))?
            .results
            .into_iter()
            .next();
        if first.is_none() {
            log::info!("TMDb has no results for movie '{}'", name);
        }
        first.map(ItemDetails::from)
    }

    fn similar_reference(&self, _name: &str, details: Option<&ItemDetails>) -> Option<String> {
        match details {
            Some(ItemDetails::Movie(MovieDetails { id: Some(id), .. })) => Some(id.to_string()),
            _ => None,
        }
    }

    fn fetch_similar(&self, reference: &str) -> Vec<ItemDetails> {
        log::debug!("Fetching TMDb movies similar to id {}", reference);
        self.fetch_list("TMDb similar movies", &self.similar_url(reference))
            .unwrap_or_default()
            .results
            .into_iter()
            .map(ItemDetails::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn provider(api_key: &str) -> TmdbProvider {
        TmdbProvider::new(
            api_key,
            "https://api.themoviedb.org/3/",
            RetryPolicy::new(1, Duration::ZERO),
        )
    }

    #[test]
    fn test_urls_are_encoded() {
        let tmdb = provider("k3y");
        assert_eq!(
            tmdb.search_url("The Matrix & more"),
            "https://api.themoviedb.org/3/search/movie?api_key=k3y&query=The%20Matrix%20%26%20more"
        );
        assert_eq!(
            tmdb.similar_url("603"),
            "https://api.themoviedb.org/3/movie/603/similar?api_key=k3y"
        );
    }

    #[test]
    fn test_decodes_search_results() {
        let body = r#"{"page":1,"results":[
            {"id":603,"title":"The Matrix","overview":"A hacker learns the truth.",
             "release_date":"1999-03-30","vote_average":8.2},
            {"id":604,"title":"The Matrix Reloaded"}
        ]}"#;
        let list: MovieList = serde_json::from_str(body).unwrap();
        let items: Vec<ItemDetails> = list.results.into_iter().map(ItemDetails::from).collect();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0],
            ItemDetails::Movie(MovieDetails {
                id: Some(603),
                title: "The Matrix".to_string(),
                overview: Some("A hacker learns the truth.".to_string()),
                release_date: Some("1999-03-30".to_string()),
                rating: Some(8.2),
            })
        );
        assert_eq!(items[1].title(), "The Matrix Reloaded");
    }

    #[test]
    fn test_missing_results_field_is_empty() {
        let list: MovieList = serde_json::from_str(r#"{"status_code":34}"#).unwrap();
        assert!(list.results.is_empty());
    }

    #[test]
    fn test_similar_reference_is_movie_id() {
        let tmdb = provider("k3y");
        let details = ItemDetails::Movie(MovieDetails {
            id: Some(603),
            title: "The Matrix".to_string(),
            overview: None,
            release_date: None,
            rating: None,
        });
        assert_eq!(
            tmdb.similar_reference("The Matrix", Some(&details)),
            Some("603".to_string())
        );
        assert_eq!(tmdb.similar_reference("The Matrix", None), None);
    }

    #[test]
    fn test_unconfigured_key_skips_network() {
        let tmdb = provider("");
        assert_eq!(tmdb.fetch_details("The Matrix"), None);
        assert!(tmdb.fetch_similar("603").is_empty());
    }
}
