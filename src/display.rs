use colored::{Color, Colorize};

use crate::catalog::Category;
use crate::provider::{BookDetails, ItemDetails, MovieDetails};
use crate::ranker::Recommendation;
use crate::recommender::{FallbackReason, Outcome};

const RULE_WIDTH: usize = 40;

pub fn print_error(message: &str) {
    println!("{}", message.color(Color::Red));
}

/// Explains why results come from the API rather than the dataset.
pub fn fallback_notice(category: Category, name: &str, reason: FallbackReason) -> String {
    match reason {
        FallbackReason::NotInDataset => format!(
            "Fetching similar {} from API since '{}' is not in the dataset.",
            category.plural(),
            name
        ),
        FallbackReason::NoOtherItems => format!(
            "Fetching similar {} from API since '{}' is the only {} in the dataset.",
            category.plural(),
            name,
            category
        ),
    }
}

pub fn print_outcome(category: Category, name: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Dataset(recs) => print_dataset(name, recs),
        Outcome::Provider {
            reason,
            details,
            similar,
        } => {
            if let Some(ItemDetails::Book(book)) = details {
                println!();
                println!(
                    "{}",
                    format!("Details for Book '{}':", name).color(Color::Cyan).bold()
                );
                print_book(book);
            }
            println!(
                "\n{}",
                fallback_notice(category, name, *reason).color(Color::Yellow)
            );
            if outcome.is_empty() {
                print_error(&format!(
                    "No recommendations found for {} '{}'.",
                    category.label(),
                    name
                ));
                return;
            }
            println!(
                "\n{}",
                format!("Similar {} to '{}':", category.plural(), name)
                    .color(Color::Cyan)
                    .bold()
            );
            for item in similar {
                match item {
                    ItemDetails::Movie(movie) => print_movie(movie),
                    ItemDetails::Book(book) => print_book(book),
                }
                println!("{}", "-".repeat(RULE_WIDTH));
            }
        }
    }
}

fn print_dataset(name: &str, recs: &[Recommendation]) {
    println!(
        "\n{}",
        format!("Recommendations similar to '{}' from dataset:", name)
            .color(Color::Cyan)
            .bold()
    );
    for rec in recs {
        println!("{}", rec);
    }
}

fn or_na<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "N/A".to_string())
}

fn print_movie(movie: &MovieDetails) {
    println!("{} {}", "Title:".bold(), movie.title);
    println!("{} {}", "Overview:".bold(), or_na(&movie.overview));
    println!("{} {}", "Release Date:".bold(), or_na(&movie.release_date));
    println!("{} {}", "Rating:".bold(), or_na(&movie.rating));
}

fn print_book(book: &BookDetails) {
    println!("{} {}", "Title:".bold(), book.title);
    println!("{} {}", "Authors:".bold(), book.authors);
    println!("{} {}", "Description:".bold(), or_na(&book.description));
    println!("{} {}", "Average Rating:".bold(), or_na(&book.average_rating));
}
