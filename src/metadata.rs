//! Sidecar metadata reading and field resolution.
//!
//! Every content item may have a JSON sidecar record next to it:
//!
//! - posts: `posts/<slug>.meta.json` with `{title, tags, abstract}`
//! - publications and notes: the `*.meta.json` file *is* the record
//! - talks and the reading list: a single wrapper record each
//!
//! A missing sidecar is a normal state and reads as `None`. A sidecar that
//! exists but is not valid JSON is an error naming the file, because silently
//! dropping a hand-written record would hide a typo.
//!
//! ## Resolution priority
//!
//! Each field is resolved independently; the first non-empty value wins:
//!
//! - **Title**: sidecar title → slug-derived title
//! - **Abstract**: sidecar abstract → none

use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix shared by every sidecar record.
pub const META_SUFFIX: &str = ".meta.json";

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed metadata in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolve a metadata field from multiple sources.
///
/// Takes a list of optional values in priority order and returns the first
/// non-None, non-empty value, trimmed.
///
/// ```text
/// title: resolve(&[sidecar_title, slug_title])
/// ```
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Trim an optional string, mapping blank values to `None`.
pub fn non_empty(value: Option<String>) -> Option<String> {
    resolve(&[value.as_deref()])
}

/// Read and deserialize a JSON sidecar.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, MetadataError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(MetadataError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| MetadataError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Path of the sidecar record for `slug` inside `dir`.
pub fn sidecar_path(dir: &Path, slug: &str) -> PathBuf {
    dir.join(format!("{slug}{META_SUFFIX}"))
}

/// Stem of a `*.meta.json` file (`itp25` for `itp25.meta.json`).
pub fn meta_stem(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    name.strip_suffix(META_SUFFIX)
        .filter(|stem| !stem.is_empty())
        .map(String::from)
}

/// Case-normalise tags: trimmed, lower-cased, blanks dropped, de-duplicated.
///
/// A comma separates tags in the `data-tags` attribute, so `"math, logic"`
/// becomes two tags.
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .flat_map(|t| {
            t.as_ref()
                .split(',')
                .map(|part| part.trim().to_lowercase())
                .collect::<Vec<_>>()
        })
        .filter(|t| !t.is_empty())
        .collect()
}
