//! Content discovery and record construction.
//!
//! Stage 1 of the build. Reads the content store and produces ordered,
//! validated record collections, one per content kind.
//!
//! ## Content Store Layout
//!
//! ```text
//! content/                             # Content root
//! ├── site.meta.json                   # Site configuration (optional)
//! ├── talks.meta.json                  # {"talks": [...]} (optional)
//! ├── reading.meta.json                # {"items": [...]} (optional)
//! ├── posts/
//! │   ├── 2024-06-01-category-theory.tex   # Source (date + slug in the name)
//! │   ├── category-theory.meta.json        # Sidecar: title, tags, abstract
//! │   ├── category-theory/index.html       # Rendered body (external renderer)
//! │   └── 2024-06-01-category-theory.pdf   # Attachment (optional)
//! ├── publications/
//! │   ├── itp25.meta.json                  # One record per publication
//! │   └── itp25.pdf
//! └── notes/
//!     ├── linear-algebra.meta.json
//!     └── linear-algebra.pdf
//! ```
//!
//! ## Rules
//!
//! - A post is listed only once its rendered `index.html` exists. Sources
//!   waiting on the external renderer are skipped without complaint.
//! - A post source whose stem is not `YYYY-MM-DD-slug` gets the build date and
//!   the whole stem as its slug.
//! - Missing directories and wrapper files read as empty collections.
//! - Two post sources resolving to the same slug are an error.
//!
//! ## Ordering
//!
//! All sorts are stable, so ties keep discovery order (sorted file paths).
//!
//! | Kind | Order |
//! |------|-------|
//! | Posts | date, newest first |
//! | Publications | year, newest first |
//! | Talks | date, newest first; undated last |
//! | Notes | title, case-insensitive |
//! | Reading list | status precedence, then title |

use crate::attachment::{self, AttachmentKey};
use crate::metadata::{self, MetadataError, META_SUFFIX};
use crate::naming;
use crate::types::{
    Note, NoteMeta, Post, PostMeta, Publication, PublicationLinks, PublicationMeta, ReadingFile,
    ReadingItem, Talk, TalksFile,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const POSTS_DIR: &str = "posts";
pub const PUBLICATIONS_DIR: &str = "publications";
pub const NOTES_DIR: &str = "notes";
pub const TALKS_FILE: &str = "talks.meta.json";
pub const READING_FILE: &str = "reading.meta.json";
/// Filename of a rendered post body inside `posts/<slug>/`.
pub const RENDERED_BODY: &str = "index.html";

const POST_SOURCE_EXTENSIONS: &[&str] = &["tex", "typ", "md"];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error("duplicate post slug '{slug}': {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Every collection the page generator needs, loaded in one pass.
#[derive(Debug, Clone, Default)]
pub struct Content {
    pub posts: Vec<Post>,
    pub publications: Vec<Publication>,
    pub talks: Vec<Talk>,
    pub notes: Vec<Note>,
    pub reading: Vec<ReadingItem>,
}

/// Read-only view of the content store.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    today: NaiveDate,
}

impl ContentStore {
    /// Open a store rooted at `root`, dating undated posts with today's date.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Override the build date used for undated post sources.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.root.join(POSTS_DIR)
    }

    pub fn publications_dir(&self) -> PathBuf {
        self.root.join(PUBLICATIONS_DIR)
    }

    pub fn notes_dir(&self) -> PathBuf {
        self.root.join(NOTES_DIR)
    }

    /// Where the external renderer leaves a post's HTML body.
    pub fn rendered_post_path(&self, slug: &str) -> PathBuf {
        self.posts_dir().join(slug).join(RENDERED_BODY)
    }

    pub fn load_all(&self) -> Result<Content, LoadError> {
        Ok(Content {
            posts: self.list_posts()?,
            publications: self.list_publications()?,
            talks: self.list_talks()?,
            notes: self.list_notes()?,
            reading: self.list_reading()?,
        })
    }

    /// All posts with a rendered body, newest first.
    pub fn list_posts(&self) -> Result<Vec<Post>, LoadError> {
        let dir = self.posts_dir();
        let sources = collect_entries(&dir)?
            .into_iter()
            .filter(|p| is_post_source(p));

        let mut seen: BTreeMap<String, PathBuf> = BTreeMap::new();
        let mut posts = Vec::new();
        for source in sources {
            let stem = file_stem(&source);
            let parsed = naming::parse_post_stem(&stem);

            if let Some(first) = seen.get(&parsed.slug) {
                return Err(LoadError::DuplicateSlug {
                    slug: parsed.slug,
                    first: first.clone(),
                    second: source,
                });
            }
            seen.insert(parsed.slug.clone(), source.clone());

            if !self.rendered_post_path(&parsed.slug).is_file() {
                continue;
            }

            let meta: PostMeta =
                metadata::read_json(&metadata::sidecar_path(&dir, &parsed.slug))?.unwrap_or_default();
            let key = AttachmentKey {
                name: &parsed.slug,
                date: parsed.date,
                alias: None,
            };
            let attachment = attachment::find_attachment(&dir, attachment::POST_STRATEGIES, &key);
            let title = metadata::resolve(&[meta.title.as_deref()])
                .unwrap_or_else(|| naming::slug_title(&parsed.slug));

            posts.push(Post {
                date: parsed.date.unwrap_or(self.today),
                title,
                tags: metadata::normalize_tags(&meta.tags),
                abstract_text: metadata::non_empty(meta.abstract_text),
                attachment,
                slug: parsed.slug,
            });
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    /// One publication per `publications/*.meta.json`, newest year first.
    pub fn list_publications(&self) -> Result<Vec<Publication>, LoadError> {
        let dir = self.publications_dir();
        let mut publications = Vec::new();
        for (id, path) in meta_records(&dir)? {
            let Some(meta) = metadata::read_json::<PublicationMeta>(&path)? else {
                continue;
            };
            let key = AttachmentKey {
                name: &id,
                date: None,
                alias: meta.filename.as_deref(),
            };
            let attachment =
                attachment::find_attachment(&dir, attachment::PUBLICATION_STRATEGIES, &key);
            let year = meta
                .year
                .map(|y| y.into_string())
                .and_then(|y| metadata::non_empty(Some(y)))
                .unwrap_or_else(|| crate::types::UNKNOWN_YEAR.to_string());

            publications.push(Publication {
                title: metadata::non_empty(meta.title).unwrap_or_else(|| "Untitled".to_string()),
                authors: meta.authors.into_vec(),
                conference: metadata::non_empty(meta.conference).unwrap_or_default(),
                venue: metadata::non_empty(meta.venue),
                year,
                pages: metadata::non_empty(meta.pages),
                abstract_text: metadata::non_empty(meta.abstract_text),
                links: PublicationLinks {
                    arxiv: metadata::non_empty(meta.arxiv),
                    doi: metadata::non_empty(meta.doi),
                    code: metadata::non_empty(meta.code),
                },
                attachment,
                id,
            });
        }

        publications.sort_by(|a, b| b.sort_year().cmp(&a.sort_year()));
        Ok(publications)
    }

    /// Talks from `talks.meta.json`, newest first.
    pub fn list_talks(&self) -> Result<Vec<Talk>, LoadError> {
        let file: TalksFile =
            metadata::read_json(&self.root.join(TALKS_FILE))?.unwrap_or_default();
        let mut talks: Vec<Talk> = file
            .talks
            .into_iter()
            .map(|meta| Talk {
                title: metadata::non_empty(meta.title).unwrap_or_else(|| "Untitled".to_string()),
                kind: metadata::non_empty(meta.kind),
                venue: metadata::non_empty(meta.venue),
                location: metadata::non_empty(meta.location),
                date: metadata::non_empty(meta.date).unwrap_or_default(),
                abstract_text: metadata::non_empty(meta.abstract_text),
                slides: metadata::non_empty(meta.slides),
                video: metadata::non_empty(meta.video),
                coauthors: meta.coauthors.into_vec(),
            })
            .collect();

        talks.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(talks)
    }

    /// One note per `notes/*.meta.json`, alphabetical by title.
    pub fn list_notes(&self) -> Result<Vec<Note>, LoadError> {
        let dir = self.notes_dir();
        let mut notes = Vec::new();
        for (id, path) in meta_records(&dir)? {
            let Some(meta) = metadata::read_json::<NoteMeta>(&path)? else {
                continue;
            };
            let attachment = attachment::find_attachment(
                &dir,
                attachment::NOTE_STRATEGIES,
                &AttachmentKey::named(&id),
            );
            notes.push(Note {
                title: metadata::resolve(&[meta.title.as_deref()])
                    .unwrap_or_else(|| naming::slug_title(&id)),
                description: metadata::non_empty(meta.description),
                subject: metadata::non_empty(meta.subject),
                attachment,
                id,
            });
        }

        notes.sort_by_key(|n| n.title.to_lowercase());
        Ok(notes)
    }

    /// Reading list from `reading.meta.json`, by status precedence then title.
    pub fn list_reading(&self) -> Result<Vec<ReadingItem>, LoadError> {
        let file: ReadingFile =
            metadata::read_json(&self.root.join(READING_FILE))?.unwrap_or_default();
        let mut items = file.items;
        items.sort_by_key(|i| (i.status, i.title.to_lowercase()));
        Ok(items)
    }
}

/// Sorted, non-hidden entries of `dir`; empty when the directory is absent.
fn collect_entries(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(LoadError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };
    let mut entries: Vec<PathBuf> = read
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .map(|n| !n.to_string_lossy().starts_with('.'))
                .unwrap_or(false)
        })
        .collect();

    entries.sort();
    Ok(entries)
}

/// `(id, path)` for every `*.meta.json` file directly inside `dir`.
fn meta_records(dir: &Path) -> Result<Vec<(String, PathBuf)>, LoadError> {
    Ok(collect_entries(dir)?
        .into_iter()
        .filter(|p| p.is_file())
        .filter_map(|p| metadata::meta_stem(&p).map(|id| (id, p)))
        .collect())
}

fn is_post_source(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    if name.ends_with(META_SUFFIX) {
        return false;
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    POST_SOURCE_EXTENSIONS.contains(&ext.as_str())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}
