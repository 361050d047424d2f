//! Site configuration module.
//!
//! Handles loading and validating `site.meta.json` from the content root. The
//! user file is sparse: it is deep-merged over the stock defaults, so it only
//! needs the keys it wants to change. A missing file yields the stock record
//! unchanged and the build still completes.
//!
//! ## Configuration Options
//!
//! ```json
//! {
//!   "site": { "title": "Academic Portfolio", "description": "...", "author": "",
//!             "last_updated": "2025-09-06" },
//!   "about": { "title": "About", "content": "Markdown text",
//!              "profile_picture": "asset/me.jpg", "profile_alt": "Portrait" },
//!   "contact": { "email": "me@uni.edu", "institution": "...", "department": "...",
//!                "location": "...", "github": "https://github.com/me" },
//!   "navigation": { "brand": "Me", "items": [ { "name": "Blog", "url": "blog/index.html" } ] },
//!   "build": { "recent_posts": 5, "recent_publications": 5,
//!              "stylesheets": ["css/main.css"], "math": false }
//! }
//! ```
//!
//! Navigation URLs and stylesheet paths are written relative to the site root;
//! the template layer re-bases them for pages in subdirectories.
//!
//! The configuration is constructed once per build and passed by reference to
//! every loader, template and generator call. Nothing reads it from global state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Site-wide metadata record at the content root.
pub const SITE_META_FILE: &str = "site.meta.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed site metadata in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.meta.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteMeta {
    pub site: SiteInfo,
    pub about: About,
    pub contact: Contact,
    pub navigation: Navigation,
    pub build: BuildSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    pub title: String,
    pub description: String,
    pub author: String,
    /// Shown in the footer when set. Never filled in automatically, so
    /// rebuilding unchanged content produces identical pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Academic Portfolio".to_string(),
            description: "Personal academic homepage".to_string(),
            author: String::new(),
            last_updated: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct About {
    pub title: String,
    /// Markdown body of the about section.
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_alt: Option<String>,
}

impl Default for About {
    fn default() -> Self {
        Self {
            title: "About".to_string(),
            content: String::new(),
            profile_picture: None,
            profile_alt: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Any further entries (`"github": "https://..."`), rendered in key order.
    /// Only string values are shown; `null`, numbers and nested objects are kept
    /// but skipped.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl Contact {
    /// Labelled entries in display order, blank values skipped.
    pub fn entries(&self) -> Vec<(String, &str)> {
        let known = [
            ("Email", &self.email),
            ("Institution", &self.institution),
            ("Department", &self.department),
            ("Location", &self.location),
        ];
        let mut entries: Vec<(String, &str)> = known
            .into_iter()
            .filter_map(|(label, value)| value.as_deref().map(|v| (label.to_string(), v)))
            .collect();
        entries.extend(self.other.iter().filter_map(|(key, value)| {
            value
                .as_str()
                .map(|v| (crate::naming::slug_title(&key.replace('_', "-")), v))
        }));
        entries.retain(|(_, v)| !v.trim().is_empty());
        entries
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Navigation {
    /// Brand text in the header; the site title when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub items: Vec<NavItem>,
}

impl Default for Navigation {
    fn default() -> Self {
        let item = |name: &str, url: &str| NavItem {
            name: name.to_string(),
            url: url.to_string(),
            current: false,
        };
        Self {
            brand: None,
            items: vec![
                item("About", "index.html"),
                item("Blog", "blog/index.html"),
                item("Publications", "publications/index.html"),
                item("Notes", "notes/index.html"),
                item("Reading", "reading/index.html"),
            ],
        }
    }
}

/// A navigation entry.
///
/// `current` is accepted for compatibility with hand-written records but the
/// active entry is always computed per page from its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub current: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Build and layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Number of posts in the home page's recent section.
    pub recent_posts: usize,
    /// Number of publications in the home page's recent section.
    pub recent_publications: usize,
    /// Stylesheets linked from every page, relative to the site root.
    pub stylesheets: Vec<String>,
    /// Include KaTeX and auto-render math on every page.
    pub math: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            recent_posts: 5,
            recent_publications: 5,
            stylesheets: vec!["css/main.css".to_string()],
            math: false,
        }
    }
}

impl SiteMeta {
    /// Validate values the templates rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(pos) = self
            .navigation
            .items
            .iter()
            .position(|i| i.name.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "navigation.items[{pos}].name must not be empty"
            )));
        }
        if self.build.stylesheets.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "build.stylesheets entries must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Header brand text.
    pub fn brand(&self) -> &str {
        self.navigation
            .brand
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(&self.site.title)
    }
}

// =============================================================================
// Loading, merging, and validation
// =============================================================================

/// Returns the stock default record as a JSON value, the base layer for
/// merging user overrides on top.
pub fn stock_defaults_value() -> serde_json::Value {
    serde_json::to_value(SiteMeta::default()).expect("default site metadata must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Objects are merged key-by-key (overlay keys override base keys).
/// - Non-object values in overlay, arrays included, replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_json(base: serde_json::Value, overlay: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => merge_json(base_val, overlay_val),
                    None => overlay_val,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Load `site.meta.json` from the content root.
///
/// Merges user values on top of stock defaults and validates the result.
/// Returns the stock record when the file does not exist.
pub fn load_site_meta(root: &Path) -> Result<SiteMeta, ConfigError> {
    let path = root.join(SITE_META_FILE);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(SiteMeta::default()),
        Err(source) => return Err(ConfigError::Io { path, source }),
    };
    let json_err = |source| ConfigError::Json {
        path: path.clone(),
        source,
    };
    let overlay: serde_json::Value = serde_json::from_str(&content).map_err(json_err)?;
    let merged = merge_json(stock_defaults_value(), overlay);
    let meta: SiteMeta = serde_json::from_value(merged).map_err(json_err)?;
    meta.validate()?;
    Ok(meta)
}

/// The stock `site.meta.json`, pretty-printed. Used by the `gen-config` command.
pub fn stock_site_meta_json() -> String {
    serde_json::to_string_pretty(&stock_defaults_value())
        .expect("default site metadata must serialize")
}
