use anyhow::{Context, Result};
use serde::Deserialize;
use config::{Config as ConfigLoader, Environment, File, FileFormat};
use std::time::Duration;

use crate::ranker::DEFAULT_TOP_K;
use crate::retry::RetryPolicy;
use crate::vectorizer::DEFAULT_IDF_BIAS;

/// Configuration structure holding all settings for the recommender
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    // Metadata providers
    pub tmdb_api_key: String,
    pub tmdb_api_url: String,
    pub google_books_api_key: String,
    pub google_books_api_url: String,

    // Local catalogs
    pub movie_data_file: String,
    pub book_data_file: String,

    // Ranking
    pub top_k: usize,
    pub idf_bias: f64,

    // Provider retries
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Config {
    /// Load configuration from ~/.recommend.conf, then RECOMMEND_* environment variables
    pub fn load() -> Result<Self> {
        let mut builder = ConfigLoader::builder();

        match dirs::home_dir() {
            Some(home) => {
                builder = builder.add_source(
                    File::from(home.join(".recommend.conf"))
                        .format(FileFormat::Ini)
                        .required(false),
                );
            }
            None => log::warn!("Could not determine home directory; skipping ~/.recommend.conf"),
        }

        let loader = builder
            .add_source(Environment::with_prefix("RECOMMEND").try_parsing(true))
            .build()
            .context("Failed to build config")?;

        loader.try_deserialize().context("Failed to deserialize config")
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts, Duration::from_millis(self.retry_delay_ms))
    }

    /// Display configuration summary (for debug mode)
    pub fn display_summary(&self) {
        println!("=== Recommender Configuration ===");
        println!("TMDb API URL: {}", self.tmdb_api_url);
        println!("TMDb API Key: {}", mask(&self.tmdb_api_key));
        println!("Google Books API URL: {}", self.google_books_api_url);
        println!("Google Books API Key: {}", mask(&self.google_books_api_key));
        println!("Movie dataset: {}", self.movie_data_file);
        println!("Book dataset: {}", self.book_data_file);
        println!("Top K: {}", self.top_k);
        println!("IDF bias: {}", self.idf_bias);
        let retry = self.retry_policy();
        println!("Retries: {} x {:?}", retry.attempts(), retry.delay());
        println!("=================================");
    }
}

fn mask(key: &str) -> String {
    if key.is_empty() {
        "<not set>".to_string()
    } else if key.chars().count() > 4 {
        format!("{}***", key.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_api_key: "".to_string(),
            tmdb_api_url: "https://api.themoviedb.org/3".to_string(),
            google_books_api_key: "".to_string(),
            google_books_api_url: "https://www.googleapis.com/books/v1/volumes".to_string(),
            movie_data_file: "movies.csv".to_string(),
            book_data_file: "books.csv".to_string(),
            top_k: DEFAULT_TOP_K,
            idf_bias: DEFAULT_IDF_BIAS,
            retry_attempts: 3,
            retry_delay_ms: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.idf_bias, 1.0);
        assert_eq!(config.retry_policy(), RetryPolicy::new(3, Duration::from_secs(2)));
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let loader = ConfigLoader::builder()
            .add_source(File::from_str(
                "top_k = 3\ntmdb_api_key = secret\nidf_bias = 0.0",
                FileFormat::Ini,
            ))
            .build()
            .unwrap();
        let config: Config = loader.try_deserialize().unwrap();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.tmdb_api_key, "secret");
        assert_eq!(config.idf_bias, 0.0);
        assert_eq!(config.movie_data_file, "movies.csv");
    }

    #[test]
    fn test_mask_hides_keys() {
        assert_eq!(mask(""), "<not set>");
        assert_eq!(mask("abc"), "***");
        assert_eq!(mask("abcdefgh"), "abcd***");
    }
}
