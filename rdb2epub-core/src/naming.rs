//! Deterministic output file names
//!
//! The name of a package only depends on the article id and title, so the
//! presence of the file on disk is enough to know an article was already
//! synchronized.

use regex::Regex;
use std::sync::LazyLock;

/// Prefix of every generated package name
pub const FILE_PREFIX: &str = "rdb_";

/// Extension of every generated package name
pub const FILE_EXTENSION: &str = ".epub";

/// Number of title characters kept in the name
pub const TITLE_CHARS: usize = 15;

/// Anything but ASCII word characters, parentheses, hyphen, period and ASCII whitespace
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9_()\-.\t\n\x0B\x0C\r ]").expect("file name pattern is valid")
});

/// Compute the package file name for an article.
///
/// `rdb_<id>_<first 15 chars of title>.epub`, where every character outside
/// the allowed set is replaced by a single space.
pub fn output_file_name(article_id: &str, title: &str) -> String {
    let short_title: String = title.chars().take(TITLE_CHARS).collect();
    let raw = format!("{FILE_PREFIX}{article_id}_{short_title}{FILE_EXTENSION}");
    DISALLOWED.replace_all(&raw, " ").into_owned()
}

/// Whether `c` may appear in a generated file name
pub fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '_' | '(' | ')' | '-' | '.' | '\t' | '\n' | '\x0B' | '\x0C' | '\r' | ' ')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_short_title_used_whole() {
        assert_eq!(output_file_name("42", "Rust"), "rdb_42_Rust.epub");
    }

    #[test]
    fn test_title_truncated_to_15_chars() {
        assert_eq!(
            output_file_name("abc123", "A Very Long Example Title About Testing"),
            "rdb_abc123_A Very Long Exa.epub"
        );
    }

    #[test]
    fn test_disallowed_chars_become_spaces() {
        assert_eq!(
            output_file_name("id/1", "What? Yes: (no)"),
            "rdb_id 1_What  Yes  (no).epub"
        );
    }

    #[test]
    fn test_each_char_replaced_once() {
        // one space per character, multi-byte characters included
        assert_eq!(output_file_name("7", "café!"), "rdb_7_caf  .epub");
    }

    #[test]
    fn test_truncation_counts_characters() {
        let name = output_file_name("1", "ééééééééééééééééééé");
        assert_eq!(name, format!("rdb_1_{}.epub", " ".repeat(15)));
    }

    #[test]
    fn test_empty_title() {
        assert_eq!(output_file_name("9", ""), "rdb_9_.epub");
    }

    proptest! {
        #[test]
        fn names_only_contain_allowed_chars(id in "[a-z0-9]{1,10}", title in "\\PC{0,40}") {
            let name = output_file_name(&id, &title);
            prop_assert!(name.chars().all(is_allowed_char), "bad name {:?}", name);
            prop_assert!(name.starts_with(FILE_PREFIX));
            prop_assert!(name.ends_with(FILE_EXTENSION));
        }

        #[test]
        fn names_are_deterministic(id in "[a-z0-9]{1,10}", title in "\\PC{0,40}") {
            prop_assert_eq!(output_file_name(&id, &title), output_file_name(&id, &title));
        }

        #[test]
        fn title_part_is_at_most_15_chars(title in "\\PC{0,40}") {
            let name = output_file_name("x", &title);
            let title_part = &name[FILE_PREFIX.len() + 2..name.len() - FILE_EXTENSION.len()];
            prop_assert_eq!(title_part.chars().count(), title.chars().count().min(TITLE_CHARS));
        }
    }
}
