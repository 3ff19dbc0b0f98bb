//! Tag-string normalization ahead of vectorization.

use super::stem::PorterStemmer;

/// Stem every whitespace-separated token and rejoin with single spaces.
pub fn stem_text(text: &str) -> String {
    let stemmer = PorterStemmer::new();
    text.split_whitespace()
        .map(|token| stemmer.stem(token))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stems_each_token() {
        assert_eq!(stem_text("running books"), "run book");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(stem_text("  dune \t frank   herbert "), "dune frank herbert");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(stem_text(""), "");
        assert_eq!(stem_text("   "), "");
    }

    #[test]
    fn test_preserves_token_order() {
        assert_eq!(stem_text("fiction science"), "fiction scienc");
        assert_eq!(stem_text("science fiction"), "scienc fiction");
    }
}
