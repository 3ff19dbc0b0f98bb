//! Content-based similarity over book tag strings.
//!
//! # Architecture
//!
//! - `stem`: Porter stemmer for single tokens
//! - `preprocess`: Stems a whole tag string
//! - `stopwords`: English stop-word list used by the vectorizer
//! - `vectorizer`: Bag-of-words vocabulary and term-count vectors
//! - `matrix`: Dense pairwise cosine-similarity matrix

mod matrix;
mod preprocess;
mod stem;
mod stopwords;
mod vectorizer;

pub use matrix::SimilarityMatrix;
pub use preprocess::stem_text;
pub use vectorizer::CountVectorizer;

/// Default vocabulary size cap.
pub const DEFAULT_MAX_FEATURES: usize = 5000;
