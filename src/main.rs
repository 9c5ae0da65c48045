use clap::builder::RangedU64ValueParser;
use clap::Parser;
use colored::{Color, Colorize};
use dialoguer::Input;
use log::LevelFilter;

mod config;
use crate::config::Config;

mod catalog;
mod display;
mod error;
mod google_books;
mod http;
mod provider;
mod ranker;
mod recommender;
mod retry;
mod similarity;
mod stopwords;
mod tmdb;
mod vectorizer;

use crate::catalog::{Category, CsvCatalogSource};
use crate::display::{print_error, print_outcome};
use crate::google_books::GoogleBooksProvider;
use crate::recommender::Recommender;
use crate::tmdb::TmdbProvider;
use crate::vectorizer::TfidfVectorizer;

#[derive(Parser)]
#[command(name = "recommend")]
#[command(about = "Recommends movies or books similar to one you name")]
struct Args {
    /// What to search for: movie or book (prompted when omitted)
    #[arg(short, long)]
    category: Option<String>,

    /// Title to find recommendations for (prompted when omitted)
    #[arg(short, long)]
    name: Option<String>,

    /// Number of dataset recommendations to show (at least 1)
    #[arg(short = 'k', long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    top_k: Option<usize>,

    /// Enable debug output for troubleshooting
    #[arg(long)]
    debug: bool,
}

fn prompt(text: &str) -> String {
    match Input::<String>::new().with_prompt(text).allow_empty(true).interact_text() {
        Ok(value) => value,
        Err(e) => {
            print_error(&format!("Input error: {}", e));
            std::process::exit(1);
        }
    }
}

fn main() {
    let args = Args::parse();
    dotenv::dotenv().ok();

    env_logger::Builder::new()
        .filter_level(if args.debug { LevelFilter::Debug } else { LevelFilter::Warn })
        .parse_default_env()
        .init();

    // Load configuration
    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            print_error(&format!("Error: {:#}", e));
            std::process::exit(1);
        }
    };

    if args.debug {
        config.display_summary();
        println!();
    }

    let raw_category = args
        .category
        .unwrap_or_else(|| prompt("What would you like to search for (movie, book)?"));
    let category: Category = match raw_category.parse() {
        Ok(category) => category,
        Err(message) => {
            print_error(&message);
            std::process::exit(1);
        }
    };

    let name = args
        .name
        .unwrap_or_else(|| prompt(&format!("Enter the {} name", category)));
    let name = name.trim();
    if name.is_empty() {
        print_error(&format!("Please enter a {} name.", category));
        std::process::exit(1);
    }

    let retry = config.retry_policy();
    let recommender = Recommender::new(
        CsvCatalogSource::new(&config.movie_data_file, &config.book_data_file),
        Box::new(TmdbProvider::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            retry,
        )),
        Box::new(GoogleBooksProvider::new(
            config.google_books_api_key.clone(),
            config.google_books_api_url.clone(),
            retry,
        )),
        TfidfVectorizer::new(config.idf_bias),
        args.top_k.unwrap_or(config.top_k),
    );

    println!(
        "{}",
        format!("Looking for {}s similar to '{}'...", category, name).color(Color::Cyan)
    );

    match recommender.recommend(category, name) {
        Ok(outcome) => print_outcome(category, name, &outcome),
        Err(e) => {
            print_error(&format!("Error processing recommendations: {}", e));
            std::process::exit(1);
        }
    }
}
