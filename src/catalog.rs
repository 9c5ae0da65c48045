use crate::error::CatalogError;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Kind of item a catalog holds. Decides which columns form the feature text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Movie,
    Book,
}

impl Category {
    /// Columns concatenated into the feature text, in order.
    pub fn feature_columns(self) -> [&'static str; 2] {
        match self {
            Category::Movie => ["Genre", "Overview"],
            Category::Book => ["Genre", "Description"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Movie => "Movie",
            Category::Book => "Book",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Category::Movie => "movies",
            Category::Book => "books",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Movie => write!(f, "movie"),
            Category::Book => write!(f, "book"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(Category::Movie),
            "book" => Ok(Category::Book),
            other => Err(format!(
                "Invalid item type '{}'. Valid types are: movie, book.",
                other
            )),
        }
    }
}

pub const TITLE_COLUMN: &str = "Title";

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub title: String,
    pub genre: String,
    /// Synopsis for movies, description for books.
    pub text: String,
}

impl CatalogItem {
    #[cfg(test)]
    pub fn new(title: impl Into<String>, genre: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            genre: genre.into(),
            text: text.into(),
        }
    }

    pub fn feature_text(&self) -> String {
        format!("{} {}", self.genre, self.text)
    }
}

/// Items of one category keyed by unique title. Insertion order is kept and
/// doubles as the tie-break order for ranking.
#[derive(Debug, Clone)]
pub struct Catalog {
    category: Category,
    items: Vec<CatalogItem>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn from_items<I>(category: Category, items: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = CatalogItem>,
    {
        let mut catalog = Self::new(category);
        for item in items {
            catalog.insert(item)?;
        }
        Ok(catalog)
    }

    fn insert(&mut self, item: CatalogItem) -> Result<(), CatalogError> {
        if self.index.contains_key(&item.title) {
            return Err(CatalogError::DuplicateTitle(item.title));
        }
        self.index.insert(item.title.clone(), self.items.len());
        self.items.push(item);
        Ok(())
    }

    /// Parses a CSV catalog with a header row. Columns are located by name;
    /// a missing column or an empty required cell rejects the whole load.
    pub fn from_csv<R: Read>(category: Category, reader: R) -> Result<Self, CatalogError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| CatalogError::MissingColumn(name.to_string()))
        };

        let [genre_col, text_col] = category.feature_columns();
        let title_idx = column(TITLE_COLUMN)?;
        let genre_idx = column(genre_col)?;
        let text_idx = column(text_col)?;

        let mut catalog = Self::new(category);
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            // Header is line 1, so data rows start at 2.
            let field = |idx: usize, name: &str| {
                record
                    .get(idx)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
                    .ok_or_else(|| CatalogError::MissingField {
                        row: row + 2,
                        field: name.to_string(),
                    })
            };
            catalog.insert(CatalogItem {
                title: field(title_idx, TITLE_COLUMN)?,
                genre: field(genre_idx, genre_col)?,
                text: field(text_idx, text_col)?,
            })?;
        }

        log::debug!("Loaded {} {} from catalog", catalog.len(), category.plural());
        Ok(catalog)
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn titles(&self) -> Vec<String> {
        self.items.iter().map(|item| item.title.clone()).collect()
    }

    pub fn position(&self, title: &str) -> Option<usize> {
        self.index.get(title).copied()
    }

    /// Corpus builder: one feature text per item, in catalog order.
    pub fn feature_texts(&self) -> Vec<String> {
        self.items.iter().map(CatalogItem::feature_text).collect()
    }
}

/// Where the orchestrator gets a catalog snapshot for a category.
pub trait CatalogSource {
    fn load(&self, category: Category) -> Result<Catalog, CatalogError>;
}

/// Catalog files on disk, one CSV per category.
pub struct CsvCatalogSource {
    movie_file: PathBuf,
    book_file: PathBuf,
}

impl CsvCatalogSource {
    pub fn new(movie_file: impl Into<PathBuf>, book_file: impl Into<PathBuf>) -> Self {
        Self {
            movie_file: movie_file.into(),
            book_file: book_file.into(),
        }
    }

    fn path_for(&self, category: Category) -> &Path {
        match category {
            Category::Movie => &self.movie_file,
            Category::Book => &self.book_file,
        }
    }
}

impl CatalogSource for CsvCatalogSource {
    fn load(&self, category: Category) -> Result<Catalog, CatalogError> {
        let path = self.path_for(category);
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Catalog::from_csv(category, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVIES: &str = "\
Title,Genre,Overview,Year
Alien,sci-fi,crew hunted aboard a ship,1979
Amelie,romance,a shy waitress in paris,2001
";

    #[test]
    fn test_category_parsing() {
        assert_eq!("movie".parse::<Category>(), Ok(Category::Movie));
        assert_eq!(" BOOK ".parse::<Category>(), Ok(Category::Book));
        let err = "music".parse::<Category>().unwrap_err();
        assert_eq!(err, "Invalid item type 'music'. Valid types are: movie, book.");
    }

    #[test]
    fn test_from_csv_keeps_insertion_order() {
        let catalog = Catalog::from_csv(Category::Movie, MOVIES.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.titles(), vec!["Alien", "Amelie"]);
        assert_eq!(catalog.position("Amelie"), Some(1));
        assert_eq!(catalog.position("Heat"), None);
    }

    #[test]
    fn test_feature_text_joins_genre_and_text() {
        let catalog = Catalog::from_csv(Category::Movie, MOVIES.as_bytes()).unwrap();
        assert_eq!(
            catalog.feature_texts(),
            vec!["sci-fi crew hunted aboard a ship", "romance a shy waitress in paris"]
        );
    }

    #[test]
    fn test_books_use_description_column() {
        let csv = "Title,Genre,Description\nDune,sci-fi,desert planet politics\n";
        let catalog = Catalog::from_csv(Category::Book, csv.as_bytes()).unwrap();
        assert_eq!(catalog.feature_texts(), vec!["sci-fi desert planet politics"]);

        // A movie catalog layout is not a valid book catalog.
        let err = Catalog::from_csv(Category::Book, MOVIES.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn(ref c) if c == "Description"));
    }

    #[test]
    fn test_missing_genre_column_fails_load() {
        let csv = "Title,Overview\nAlien,crew hunted aboard a ship\n";
        let err = Catalog::from_csv(Category::Movie, csv.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn(ref c) if c == "Genre"));
        assert!(err.is_schema_error());
    }

    #[test]
    fn test_row_missing_genre_fails_whole_load() {
        let csv = "Title,Genre,Overview\nAlien,sci-fi,ship\nHeat,,heist in los angeles\n";
        let err = Catalog::from_csv(Category::Movie, csv.as_bytes()).unwrap_err();
        match err {
            CatalogError::MissingField { row, field } => {
                assert_eq!(row, 3);
                assert_eq!(field, "Genre");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_short_row_fails_whole_load() {
        let csv = "Title,Genre,Overview\nAlien,sci-fi\n";
        let err = Catalog::from_csv(Category::Movie, csv.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingField { .. }));
    }

    #[test]
    fn test_duplicate_title_rejected() {
        let items = vec![
            CatalogItem::new("Alien", "sci-fi", "ship"),
            CatalogItem::new("Alien", "horror", "ship"),
        ];
        let err = Catalog::from_items(Category::Movie, items).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateTitle(ref t) if t == "Alien"));
        assert!(err.is_schema_error());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = CsvCatalogSource::new("/nonexistent/movies.csv", "/nonexistent/books.csv");
        let err = source.load(Category::Book).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        assert!(!err.is_schema_error());
    }
}
