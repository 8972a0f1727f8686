//! Tag splitting for free-text tag/subject fields
//!
//! The backend stores tags as a single string with no fixed delimiter
//! convention, so display splitting is deliberately loose.

/// Maximum number of tags shown per item
pub const MAX_TAGS: usize = 8;

const DELIMITERS: [char; 4] = [',', ';', '|', '/'];

/// Split on any of `,;|/`, trim, drop empties, keep at most [`MAX_TAGS`].
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(DELIMITERS)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .take(MAX_TAGS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_delimiters() {
        assert_eq!(
            split_tags("Fiction, Classic; Drama|1900s"),
            vec!["Fiction", "Classic", "Drama", "1900s"]
        );
    }

    #[test]
    fn test_runs_of_delimiters_and_blanks() {
        assert_eq!(split_tags(" ,;a//b | ;; c,, "), vec!["a", "b", "c"]);
        assert!(split_tags("").is_empty());
        assert!(split_tags(" |/;, ").is_empty());
    }

    #[test]
    fn test_capped_at_eight() {
        let tags = split_tags("1,2,3,4,5,6,7,8,9,10");
        assert_eq!(tags.len(), MAX_TAGS);
        assert_eq!(tags.last().map(String::as_str), Some("8"));
    }

    #[test]
    fn test_inner_whitespace_kept() {
        assert_eq!(
            split_tags("Science fiction / Space opera"),
            vec!["Science fiction", "Space opera"]
        );
    }
}
