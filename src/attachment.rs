//! PDF attachment lookup.
//!
//! Each content kind has a short, ordered list of naming strategies. Lookup
//! tries them in order inside the kind's directory and returns the first file
//! that exists. Finding nothing is a normal state; the card simply omits its
//! PDF link.
//!
//! | Kind | Strategies (in order) |
//! |------|-----------------------|
//! | Post | `2024-06-01-slug.pdf`, `slug.pdf`, `slug/slug.pdf` |
//! | Publication | `<filename>.pdf`, `<id>.pdf` |
//! | Note | `<id>.pdf` |

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "pdf";

/// One way of deriving a candidate filename from an item's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingStrategy {
    /// `<date>-<name>.pdf`; skipped for undated items.
    DatedName,
    /// `<name>.pdf`
    Name,
    /// `<name>/<name>.pdf`, next to a rendered post body.
    NestedName,
    /// `<alias>.pdf`, where the record names its file explicitly.
    Alias,
}

pub const POST_STRATEGIES: &[NamingStrategy] = &[
    NamingStrategy::DatedName,
    NamingStrategy::Name,
    NamingStrategy::NestedName,
];

pub const PUBLICATION_STRATEGIES: &[NamingStrategy] =
    &[NamingStrategy::Alias, NamingStrategy::Name];

pub const NOTE_STRATEGIES: &[NamingStrategy] = &[NamingStrategy::Name];

/// Identity of the item whose attachment is being looked up.
#[derive(Debug, Clone, Copy)]
pub struct AttachmentKey<'a> {
    pub name: &'a str,
    pub date: Option<NaiveDate>,
    pub alias: Option<&'a str>,
}

impl<'a> AttachmentKey<'a> {
    pub fn named(name: &'a str) -> Self {
        Self {
            name,
            date: None,
            alias: None,
        }
    }
}

impl NamingStrategy {
    /// Candidate path relative to the kind's directory, if this strategy
    /// applies to the key.
    pub fn candidate(self, key: &AttachmentKey) -> Option<PathBuf> {
        match self {
            Self::DatedName => key
                .date
                .map(|d| PathBuf::from(format!("{}-{}.{EXTENSION}", d.format("%Y-%m-%d"), key.name))),
            Self::Name => Some(PathBuf::from(format!("{}.{EXTENSION}", key.name))),
            Self::NestedName => {
                Some(Path::new(key.name).join(format!("{}.{EXTENSION}", key.name)))
            }
            Self::Alias => key
                .alias
                .map(str::trim)
                .filter(|a| is_plain_name(a))
                .map(|a| PathBuf::from(format!("{}.{EXTENSION}", a.trim_end_matches(".pdf")))),
        }
    }
}

/// An alias must name a file in the kind's directory, nothing above or below it.
fn is_plain_name(alias: &str) -> bool {
    !alias.is_empty() && !alias.contains(['/', '\\']) && alias != "." && alias != ".."
}

/// Try each strategy in order; return the first candidate that exists as a file.
pub fn find_attachment(
    dir: &Path,
    strategies: &[NamingStrategy],
    key: &AttachmentKey,
) -> Option<PathBuf> {
    strategies
        .iter()
        .filter_map(|s| s.candidate(key))
        .map(|rel| dir.join(rel))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn june_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn dated_candidate_requires_date() {
        let key = AttachmentKey::named("post");
        assert_eq!(NamingStrategy::DatedName.candidate(&key), None);

        let key = AttachmentKey {
            date: Some(june_first()),
            ..AttachmentKey::named("post")
        };
        assert_eq!(
            NamingStrategy::DatedName.candidate(&key),
            Some(PathBuf::from("2024-06-01-post.pdf"))
        );
    }

    #[test]
    fn alias_rejects_paths() {
        let key = AttachmentKey {
            alias: Some("../secret"),
            ..AttachmentKey::named("p")
        };
        assert_eq!(NamingStrategy::Alias.candidate(&key), None);
    }

    #[test]
    fn alias_tolerates_pdf_suffix() {
        let key = AttachmentKey {
            alias: Some("itp25.pdf"),
            ..AttachmentKey::named("p")
        };
        assert_eq!(
            NamingStrategy::Alias.candidate(&key),
            Some(PathBuf::from("itp25.pdf"))
        );
    }

    #[test]
    fn first_existing_candidate_wins() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("post.pdf"), b"plain").unwrap();
        fs::write(tmp.path().join("2024-06-01-post.pdf"), b"dated").unwrap();

        let key = AttachmentKey {
            date: Some(june_first()),
            ..AttachmentKey::named("post")
        };
        let found = find_attachment(tmp.path(), POST_STRATEGIES, &key).unwrap();
        assert!(found.ends_with("2024-06-01-post.pdf"));
    }

    #[test]
    fn falls_through_to_nested_name() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("post")).unwrap();
        fs::write(tmp.path().join("post/post.pdf"), b"nested").unwrap();

        let found =
            find_attachment(tmp.path(), POST_STRATEGIES, &AttachmentKey::named("post")).unwrap();
        assert!(found.ends_with("post/post.pdf"));
    }

    #[test]
    fn no_match_is_none() {
        let tmp = TempDir::new().unwrap();
        let found = find_attachment(tmp.path(), POST_STRATEGIES, &AttachmentKey::named("post"));
        assert!(found.is_none());
    }

    #[test]
    fn directory_named_like_candidate_is_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("paper.pdf")).unwrap();
        let found =
            find_attachment(tmp.path(), NOTE_STRATEGIES, &AttachmentKey::named("paper"));
        assert!(found.is_none());
    }
}
