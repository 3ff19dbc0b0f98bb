use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::{fmt, fs::File, io, path::Path};

/// Thumbnail used when a row has none.
pub const DEFAULT_THUMBNAIL: &str = "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcSOAp5VXoGKS16VrxT0PuDgPsktnBnT614axA&s";

const UNKNOWN: &str = "Unknown";

/// Abbreviated header names found in exported catalogs.
const COLUMN_ALIASES: [(&str, &str); 3] = [
    ("published", "published_year"),
    ("average_r", "average_rating"),
    ("num_page", "num_pages"),
];

const REQUIRED_COLUMNS: [&str; 8] = [
    "title",
    "authors",
    "categories",
    "average_rating",
    "ratings_count",
    "num_pages",
    "published_year",
    "thumbnail",
];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub title: String,
    pub authors: String,
    pub categories: String,
    pub average_rating: f64,
    pub ratings_count: u64,
    pub num_pages: u32,
    pub published_year: i32,
    pub thumbnail_url: String,

    /// Lower-cased title, authors and categories. Stemmed in place when the
    /// recommender is built.
    #[serde(skip)]
    pub tags: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    MissingTitle,
    MissingNumPages,
    MissingPublishedYear,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::MissingTitle => write!(f, "missing title"),
            DropReason::MissingNumPages => write!(f, "missing num_pages"),
            DropReason::MissingPublishedYear => write!(f, "missing published_year"),
        }
    }
}

/// A source row excluded from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    /// 1-based line in the source, header included.
    pub line: u64,
    pub reason: DropReason,
}

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("catalog is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub placeholder_thumbnail: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            placeholder_thumbnail: DEFAULT_THUMBNAIL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub books: Vec<Book>,
    pub dropped: Vec<DroppedRow>,
}

/// Positions of the canonical columns in the source header.
struct Columns {
    title: usize,
    authors: usize,
    categories: usize,
    average_rating: usize,
    ratings_count: usize,
    num_pages: usize,
    published_year: usize,
    thumbnail: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, CatalogError> {
        let names: Vec<String> = headers.iter().map(canonical_column).collect();
        let find = |name: &str| names.iter().position(|n| n == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| find(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CatalogError::MissingColumns(missing));
        }

        let at = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            title: at("title"),
            authors: at("authors"),
            categories: at("categories"),
            average_rating: at("average_rating"),
            ratings_count: at("ratings_count"),
            num_pages: at("num_pages"),
            published_year: at("published_year"),
            thumbnail: at("thumbnail"),
        })
    }
}

fn canonical_column(header: &str) -> String {
    let header = header.trim();
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == header)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| header.to_string())
}

/// Collapses whitespace runs to a single space and trims the ends.
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE.replace_all(value, " ").trim().to_string()
}

fn text_field(value: Option<&str>) -> Option<String> {
    value.map(collapse_whitespace).filter(|v| !v.is_empty())
}

fn number_field(value: Option<&str>) -> Option<f64> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// A source row before defaults are applied.
struct RawRow {
    line: u64,
    title: Option<String>,
    authors: Option<String>,
    categories: Option<String>,
    average_rating: Option<f64>,
    ratings_count: Option<f64>,
    num_pages: Option<f64>,
    published_year: Option<f64>,
    thumbnail: Option<String>,
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

impl Catalog {
    pub fn load(path: impl AsRef<Path>, opts: &LoadOptions) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        log::info!("loading catalog from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(file, opts)
    }

    pub fn from_reader<R: io::Read>(reader: R, opts: &LoadOptions) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let columns = Columns::resolve(csv_reader.headers()?)?;

        let mut raw_rows = Vec::new();
        for (idx, record) in csv_reader.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map(|pos| pos.line())
                .unwrap_or(idx as u64 + 2);

            raw_rows.push(RawRow {
                line,
                title: text_field(record.get(columns.title)),
                authors: text_field(record.get(columns.authors)),
                categories: text_field(record.get(columns.categories)),
                average_rating: number_field(record.get(columns.average_rating)),
                ratings_count: number_field(record.get(columns.ratings_count)),
                num_pages: number_field(record.get(columns.num_pages)),
                published_year: number_field(record.get(columns.published_year)),
                thumbnail: text_field(record.get(columns.thumbnail)),
            });
        }

        // the median covers every row that carries a rating, dropped ones included
        let mut ratings: Vec<f64> = raw_rows.iter().filter_map(|r| r.average_rating).collect();
        let rating_fill = median(&mut ratings).unwrap_or(0.0);

        let mut catalog = Catalog::default();
        for row in raw_rows {
            match Self::finish_row(row, rating_fill, opts) {
                Ok(book) => catalog.books.push(book),
                Err(dropped) => {
                    log::warn!("dropping catalog row at line {}: {}", dropped.line, dropped.reason);
                    catalog.dropped.push(dropped);
                }
            }
        }

        if !catalog.dropped.is_empty() {
            log::warn!(
                "{} catalog rows dropped for missing required fields",
                catalog.dropped.len()
            );
        }
        log::info!("catalog loaded: {} books", catalog.books.len());

        Ok(catalog)
    }

    fn finish_row(row: RawRow, rating_fill: f64, opts: &LoadOptions) -> Result<Book, DroppedRow> {
        let dropped = |reason| DroppedRow {
            line: row.line,
            reason,
        };

        let num_pages = row
            .num_pages
            .filter(|n| *n >= 0.0 && *n <= u32::MAX as f64)
            .ok_or_else(|| dropped(DropReason::MissingNumPages))?;
        let published_year = row
            .published_year
            .filter(|y| y.abs() <= i32::MAX as f64)
            .ok_or_else(|| dropped(DropReason::MissingPublishedYear))?;
        let title = row.title.ok_or_else(|| dropped(DropReason::MissingTitle))?;

        let authors = row.authors.unwrap_or_else(|| UNKNOWN.to_string());
        let categories = row.categories.unwrap_or_else(|| UNKNOWN.to_string());
        let tags = format!("{title} {authors} {categories}").to_lowercase();

        Ok(Book {
            title,
            authors,
            categories,
            average_rating: row.average_rating.unwrap_or(rating_fill),
            ratings_count: row.ratings_count.filter(|c| *c >= 0.0).unwrap_or(0.0) as u64,
            num_pages: num_pages as u32,
            published_year: published_year as i32,
            thumbnail_url: row
                .thumbnail
                .unwrap_or_else(|| opts.placeholder_thumbnail.clone()),
            tags,
        })
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_column_renames_aliases() {
        assert_eq!(canonical_column(" published "), "published_year");
        assert_eq!(canonical_column("average_r"), "average_rating");
        assert_eq!(canonical_column("num_page"), "num_pages");
        assert_eq!(canonical_column("title"), "title");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  The   Lord\tof\nthe Rings "), "The Lord of the Rings");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn test_number_field_rejects_garbage() {
        assert_eq!(number_field(Some(" 1996.0 ")), Some(1996.0));
        assert_eq!(number_field(Some("")), None);
        assert_eq!(number_field(Some("n/a")), None);
        assert_eq!(number_field(None), None);
    }
}
