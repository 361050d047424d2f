//! Content records handed from the loader to the page generator.
//!
//! Every record is constructed once by [`crate::load`] and is read-only from
//! then on. Raw sidecar shapes (`*Meta` structs) deserialize straight from the
//! JSON files in the content store; the loader turns them into these records
//! after applying defaults.

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A blog post whose rendered HTML body exists in the content store.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub date: NaiveDate,
    /// Unique identifier derived from the source filename.
    pub slug: String,
    pub title: String,
    /// Lower-cased, de-duplicated tags; iteration order is sorted.
    pub tags: BTreeSet<String>,
    pub abstract_text: Option<String>,
    /// Source path of the PDF attachment, if one was found.
    pub attachment: Option<PathBuf>,
}

impl Post {
    pub fn has_attachment(&self) -> bool {
        self.attachment.is_some()
    }

    /// Value of the `data-tags` attribute consumed by the filter script.
    pub fn data_tags(&self) -> String {
        self.tags.iter().cloned().collect::<Vec<_>>().join(",")
    }
}

/// Sentinel year for publications that do not state one.
pub const UNKNOWN_YEAR: &str = "0";

/// External links attached to a publication.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublicationLinks {
    pub arxiv: Option<String>,
    pub doi: Option<String>,
    pub code: Option<String>,
}

impl PublicationLinks {
    pub fn is_empty(&self) -> bool {
        self.arxiv.is_none() && self.doi.is_none() && self.code.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    /// Metadata file stem (`itp25` for `itp25.meta.json`).
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub conference: String,
    pub venue: Option<String>,
    /// Year as written in the record, or [`UNKNOWN_YEAR`].
    pub year: String,
    pub pages: Option<String>,
    pub abstract_text: Option<String>,
    pub links: PublicationLinks,
    pub attachment: Option<PathBuf>,
}

impl Publication {
    /// Numeric sort key; anything unparseable sorts as year 0.
    pub fn sort_year(&self) -> i64 {
        self.year.trim().parse().unwrap_or(0)
    }

    /// The year for display, `None` for the sentinel.
    pub fn display_year(&self) -> Option<&str> {
        let year = self.year.trim();
        (!year.is_empty() && year != UNKNOWN_YEAR).then_some(year)
    }

    /// "Conference (Venue), Year" with absent parts left out.
    pub fn venue_line(&self) -> String {
        let mut line = self.conference.clone();
        if let Some(venue) = &self.venue {
            if line.is_empty() {
                line = venue.clone();
            } else {
                line.push_str(&format!(" ({venue})"));
            }
        }
        if let Some(year) = self.display_year() {
            if line.is_empty() {
                line = year.to_string();
            } else {
                line.push_str(&format!(", {year}"));
            }
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Talk {
    pub title: String,
    /// Category label such as "Invited talk" or "Poster".
    pub kind: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    /// ISO-style date (`YYYY-MM-DD`, `YYYY-MM` or `YYYY`); empty when unknown.
    pub date: String,
    pub abstract_text: Option<String>,
    pub slides: Option<String>,
    pub video: Option<String>,
    pub coauthors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Classification such as "Algebra" or "Logic".
    pub subject: Option<String>,
    pub attachment: Option<PathBuf>,
}

/// Reading progress, ordered by display precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ReadingStatus {
    Completed,
    InProgress,
    Planned,
    Reference,
    Unknown,
}

impl From<&str> for ReadingStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "completed" | "done" | "read" => Self::Completed,
            "in-progress" | "reading" => Self::InProgress,
            "planned" | "to-read" => Self::Planned,
            "reference" => Self::Reference,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for ReadingStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl ReadingStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::InProgress => "In progress",
            Self::Planned => "Planned",
            Self::Reference => "Reference",
            Self::Unknown => "Unknown",
        }
    }

    /// CSS class suffix: `status-completed`, `status-in-progress`, ...
    pub fn slug(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "in-progress",
            Self::Planned => "planned",
            Self::Reference => "reference",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReadingItem {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default = "unknown_status")]
    pub status: ReadingStatus,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

fn unknown_status() -> ReadingStatus {
    ReadingStatus::Unknown
}

// ============================================================================
// Raw sidecar shapes
// ============================================================================

/// `posts/<slug>.meta.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostMeta {
    pub title: Option<String>,
    pub tags: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
}

/// Authors may be written as a list or as one pre-joined string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Authors {
    List(Vec<String>),
    Single(String),
}

impl Default for Authors {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl Authors {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::List(list) => list,
            Self::Single(s) if s.trim().is_empty() => Vec::new(),
            Self::Single(s) => vec![s],
        }
    }
}

/// Years show up both as `"2024"` and as `2024`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Year {
    Number(i64),
    Text(String),
}

impl Year {
    pub fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// `publications/<id>.meta.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PublicationMeta {
    pub title: Option<String>,
    pub authors: Authors,
    pub conference: Option<String>,
    pub venue: Option<String>,
    pub year: Option<Year>,
    pub pages: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub arxiv: Option<String>,
    pub doi: Option<String>,
    pub code: Option<String>,
    /// Alternate PDF stem when it differs from the metadata file stem.
    pub filename: Option<String>,
}

/// One entry of `talks.meta.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TalkMeta {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub slides: Option<String>,
    pub video: Option<String>,
    pub coauthors: Authors,
}

/// `talks.meta.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TalksFile {
    pub talks: Vec<TalkMeta>,
}

/// `notes/<id>.meta.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NoteMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
}

/// `reading.meta.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReadingFile {
    pub items: Vec<ReadingItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publication(year: &str) -> Publication {
        Publication {
            id: "p".to_string(),
            title: "Paper".to_string(),
            authors: vec![],
            conference: "ITP".to_string(),
            venue: None,
            year: year.to_string(),
            pages: None,
            abstract_text: None,
            links: PublicationLinks::default(),
            attachment: None,
        }
    }

    #[test]
    fn status_precedence_order() {
        let mut statuses = vec![
            ReadingStatus::Unknown,
            ReadingStatus::Planned,
            ReadingStatus::Reference,
            ReadingStatus::Completed,
            ReadingStatus::InProgress,
        ];
        statuses.sort();
        assert_eq!(
            statuses,
            vec![
                ReadingStatus::Completed,
                ReadingStatus::InProgress,
                ReadingStatus::Planned,
                ReadingStatus::Reference,
                ReadingStatus::Unknown,
            ]
        );
    }

    #[test]
    fn status_parses_spelling_variants() {
        assert_eq!(ReadingStatus::from("Completed"), ReadingStatus::Completed);
        assert_eq!(ReadingStatus::from("in_progress"), ReadingStatus::InProgress);
        assert_eq!(ReadingStatus::from("In Progress"), ReadingStatus::InProgress);
        assert_eq!(ReadingStatus::from("planned"), ReadingStatus::Planned);
        assert_eq!(ReadingStatus::from("someday"), ReadingStatus::Unknown);
    }

    #[test]
    fn reading_item_without_status_is_unknown() {
        let item: ReadingItem = serde_json::from_str(r#"{"title": "Logic"}"#).unwrap();
        assert_eq!(item.status, ReadingStatus::Unknown);
    }

    #[test]
    fn authors_accept_list_or_string() {
        let meta: PublicationMeta =
            serde_json::from_str(r#"{"authors": ["A. Turing", "A. Church"]}"#).unwrap();
        assert_eq!(meta.authors.into_vec(), vec!["A. Turing", "A. Church"]);

        let meta: PublicationMeta = serde_json::from_str(r#"{"authors": "K. Gödel"}"#).unwrap();
        assert_eq!(meta.authors.into_vec(), vec!["K. Gödel"]);
    }

    #[test]
    fn year_accepts_number_or_string() {
        let meta: PublicationMeta = serde_json::from_str(r#"{"year": 2024}"#).unwrap();
        assert_eq!(meta.year.unwrap().into_string(), "2024");
        let meta: PublicationMeta = serde_json::from_str(r#"{"year": "2023"}"#).unwrap();
        assert_eq!(meta.year.unwrap().into_string(), "2023");
    }

    #[test]
    fn sentinel_year_is_never_displayed() {
        let p = publication(UNKNOWN_YEAR);
        assert_eq!(p.display_year(), None);
        assert_eq!(p.sort_year(), 0);
        assert_eq!(p.venue_line(), "ITP");
    }

    #[test]
    fn venue_line_joins_parts() {
        let mut p = publication("2025");
        p.venue = Some("Reykjavik".to_string());
        assert_eq!(p.venue_line(), "ITP (Reykjavik), 2025");
    }

    #[test]
    fn data_tags_are_sorted_and_joined() {
        let post = Post {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            slug: "s".to_string(),
            title: "S".to_string(),
            tags: ["math".to_string(), "logic".to_string()].into_iter().collect(),
            abstract_text: None,
            attachment: None,
        };
        assert_eq!(post.data_tags(), "logic,math");
    }
}
