//! Filename parsing for the `YYYY-MM-DD-slug` post convention.
//!
//! Post sources carry their publication date in the filename:
//!
//! - `2024-06-01-category-theory.tex` → date=2024-06-01, slug="category-theory"
//! - `notes-on-logic.tex` → no date, slug="notes-on-logic"
//!
//! A stem that does not match (wrong digit counts, impossible calendar date,
//! empty slug) is not an error. The loader assigns the build date and uses the
//! full stem as the slug.
//!
//! ## Display Titles
//!
//! When no sidecar supplies a title, one is derived from the slug: hyphens
//! become spaces and every word is capitalised, so `category-theory` reads
//! "Category Theory".

use chrono::NaiveDate;

/// Result of parsing a post filename stem.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStem {
    /// Date prefix if the stem follows `YYYY-MM-DD-slug`.
    pub date: Option<NaiveDate>,
    /// Slug after the date prefix, or the whole stem when undated.
    pub slug: String,
}

/// Parse a post stem following the `YYYY-MM-DD-slug` convention.
///
/// - `"2024-06-01-my-post"` → date=Some(2024-06-01), slug="my-post"
/// - `"2024-13-01-my-post"` → date=None, slug="2024-13-01-my-post"
/// - `"2024-06-01-"` → date=None, slug="2024-06-01-"
/// - `"draft"` → date=None, slug="draft"
pub fn parse_post_stem(stem: &str) -> ParsedStem {
    let bytes = stem.as_bytes();
    // "YYYY-MM-DD-" plus at least one slug character
    if bytes.len() > 11
        && is_digits(&bytes[0..4])
        && bytes[4] == b'-'
        && is_digits(&bytes[5..7])
        && bytes[7] == b'-'
        && is_digits(&bytes[8..10])
        && bytes[10] == b'-'
        && let Ok(date) = NaiveDate::parse_from_str(&stem[..10], "%Y-%m-%d")
    {
        return ParsedStem {
            date: Some(date),
            slug: stem[11..].to_string(),
        };
    }
    ParsedStem {
        date: None,
        slug: stem.to_string(),
    }
}

fn is_digits(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_digit)
}

/// Capitalise every word: first letter upper-cased, the rest lower-cased.
///
/// Words are separated by whitespace or hyphens; separators are preserved.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_whitespace() || c == '-' {
            out.push(c);
            at_word_start = true;
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Default display title for a slug: `my-first-post` → "My First Post".
pub fn slug_title(slug: &str) -> String {
    title_case(&slug.replace('-', " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn dated_stem_splits_date_and_slug() {
        let p = parse_post_stem("2024-06-01-category-theory");
        assert_eq!(p.date, Some(date(2024, 6, 1)));
        assert_eq!(p.slug, "category-theory");
    }

    #[test]
    fn undated_stem_keeps_full_slug() {
        let p = parse_post_stem("notes-on-logic");
        assert_eq!(p.date, None);
        assert_eq!(p.slug, "notes-on-logic");
    }

    #[test]
    fn impossible_date_falls_back() {
        let p = parse_post_stem("2024-13-40-bad");
        assert_eq!(p.date, None);
        assert_eq!(p.slug, "2024-13-40-bad");
    }

    #[test]
    fn short_year_falls_back() {
        let p = parse_post_stem("24-06-01-post");
        assert_eq!(p.date, None);
        assert_eq!(p.slug, "24-06-01-post");
    }

    #[test]
    fn empty_slug_falls_back() {
        let p = parse_post_stem("2024-06-01-");
        assert_eq!(p.date, None);
        assert_eq!(p.slug, "2024-06-01-");
    }

    #[test]
    fn date_only_stem_falls_back() {
        let p = parse_post_stem("2024-06-01");
        assert_eq!(p.date, None);
        assert_eq!(p.slug, "2024-06-01");
    }

    #[test]
    fn leap_day_is_accepted() {
        let p = parse_post_stem("2024-02-29-leap");
        assert_eq!(p.date, Some(date(2024, 2, 29)));
        assert_eq!(p.slug, "leap");
    }

    #[test]
    fn slug_title_capitalises_words() {
        assert_eq!(slug_title("my-first-post"), "My First Post");
        assert_eq!(slug_title("template"), "Template");
    }

    #[test]
    fn slug_title_lowercases_tail() {
        assert_eq!(slug_title("hello-WORLD"), "Hello World");
    }

    #[test]
    fn title_case_keeps_hyphens() {
        assert_eq!(title_case("category-theory"), "Category-Theory");
        assert_eq!(title_case("math"), "Math");
    }
}
