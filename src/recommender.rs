//! Recommendation service over a loaded catalog.
//!
//! Built once from a [`Catalog`]: tags are stemmed in place, vectorized, and
//! the pairwise similarity matrix is computed eagerly. The service is
//! immutable afterwards, so queries can be shared across threads.

use serde::Serialize;
use std::{collections::BTreeSet, time::Instant};

use crate::catalog::{collapse_whitespace, Book, Catalog};
use crate::similarity::{stem_text, CountVectorizer, SimilarityMatrix, DEFAULT_MAX_FEATURES};

/// Number of similar books returned by a title query.
pub const DEFAULT_SIMILAR_COUNT: usize = 5;
/// Number of books returned by a category query.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone)]
pub struct RecommenderOptions {
    pub max_features: usize,
    pub similar_count: usize,
}

impl Default for RecommenderOptions {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            similar_count: DEFAULT_SIMILAR_COUNT,
        }
    }
}

/// A recommended book with the score it was ranked by.
#[derive(Debug, Clone, Serialize)]
pub struct Recommended<'a> {
    #[serde(flatten)]
    pub book: &'a Book,
    /// Cosine similarity for title queries, rating × count for category queries.
    pub score: f64,
}

#[derive(Debug, Clone)]
pub enum Recommendation<'a> {
    Found(Vec<Recommended<'a>>),
    NotFound { message: String },
}

impl<'a> Recommendation<'a> {
    #[allow(dead_code)]
    pub fn books(&self) -> Vec<&'a Book> {
        match self {
            Recommendation::Found(items) => items.iter().map(|item| item.book).collect(),
            Recommendation::NotFound { .. } => vec![],
        }
    }

    #[allow(dead_code)]
    pub fn is_found(&self) -> bool {
        matches!(self, Recommendation::Found(_))
    }
}

pub struct Recommender {
    catalog: Catalog,
    similarity: SimilarityMatrix,
    /// Lower-cased titles, index-aligned with the catalog.
    title_keys: Vec<String>,
    /// Lower-cased categories, index-aligned with the catalog.
    category_keys: Vec<String>,
    vocabulary_size: usize,
    similar_count: usize,
}

impl Recommender {
    pub fn build(mut catalog: Catalog, opts: &RecommenderOptions) -> Self {
        let _span = tracing::info_span!("build_recommender", books = catalog.len()).entered();
        let started = Instant::now();

        for book in catalog.books.iter_mut() {
            book.tags = stem_text(&book.tags);
        }

        let tags: Vec<&str> = catalog.books.iter().map(|b| b.tags.as_str()).collect();
        let (vectorizer, vectors) = CountVectorizer::fit_transform(&tags, opts.max_features);
        let vocabulary_size = vectorizer.vocabulary_size();

        let similarity = SimilarityMatrix::from_vectors(&vectors, vocabulary_size);

        let zero_rows = vectors.iter().filter(|v| v.is_zero()).count();
        if zero_rows > 0 {
            log::debug!("{zero_rows} books have no vocabulary terms");
        }
        log::info!(
            "recommender built: books={} vocabulary={} elapsed={:?}",
            catalog.len(),
            vocabulary_size,
            started.elapsed()
        );

        let title_keys = catalog.books.iter().map(|b| b.title.to_lowercase()).collect();
        let category_keys = catalog
            .books
            .iter()
            .map(|b| b.categories.to_lowercase())
            .collect();

        Self {
            catalog,
            similarity,
            title_keys,
            category_keys,
            vocabulary_size,
            similar_count: opts.similar_count,
        }
    }

    #[allow(dead_code)]
    pub fn books(&self) -> &[Book] {
        &self.catalog.books
    }

    #[allow(dead_code)]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[allow(dead_code)]
    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    #[allow(dead_code)]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    /// Index of the first book whose title equals `title`, ignoring case.
    pub fn find_title(&self, title: &str) -> Option<usize> {
        let key = collapse_whitespace(title).to_lowercase();
        if key.is_empty() {
            return None;
        }
        self.title_keys.iter().position(|t| *t == key)
    }

    /// Books most similar to `title`. The book itself is never included.
    pub fn by_title(&self, title: &str) -> Recommendation<'_> {
        let Some(index) = self.find_title(title) else {
            return Recommendation::NotFound {
                message: format!("Book titled '{title}' not found."),
            };
        };

        let row = self.similarity.row(index);
        let mut ranked: Vec<(usize, f32)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|(j, _)| *j != index)
            .collect();
        // stable: equal scores keep catalog order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(self.similar_count);

        log::debug!("title query {title:?} matched book #{index}");

        Recommendation::Found(
            ranked
                .into_iter()
                .map(|(j, score)| Recommended {
                    book: &self.catalog.books[j],
                    score: score as f64,
                })
                .collect(),
        )
    }

    /// Top `top_n` books whose categories contain `category`, ignoring case,
    /// ranked by average rating × ratings count.
    pub fn by_category(&self, category: &str, top_n: usize) -> Recommendation<'_> {
        let needle = collapse_whitespace(category).to_lowercase();
        let not_found = || Recommendation::NotFound {
            message: format!("No books found in category '{category}'."),
        };
        if needle.is_empty() {
            return not_found();
        }

        let mut ranked: Vec<(usize, f64)> = self
            .category_keys
            .iter()
            .enumerate()
            .filter(|(_, categories)| categories.contains(&needle))
            .map(|(idx, _)| {
                let book = &self.catalog.books[idx];
                (idx, book.average_rating * book.ratings_count as f64)
            })
            .collect();
        if ranked.is_empty() {
            return not_found();
        }

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(top_n);

        Recommendation::Found(
            ranked
                .into_iter()
                .map(|(idx, score)| Recommended {
                    book: &self.catalog.books[idx],
                    score,
                })
                .collect(),
        )
    }

    /// Distinct titles, sorted.
    pub fn titles(&self) -> Vec<&str> {
        self.catalog
            .books
            .iter()
            .map(|b| b.title.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct individual categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        self.catalog
            .books
            .iter()
            .flat_map(|b| b.categories.split(','))
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
