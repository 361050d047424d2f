//! Build orchestration.
//!
//! Stage 3 of the build pipeline and the only module that writes to disk.
//! [`Builder::build`] loads the site metadata and every collection, renders
//! each page through [`crate::generate`], then writes pages and copies
//! attachments and static directories into the output tree.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── blog/index.html
//! ├── publications/
//! │   ├── index.html
//! │   └── itp25.pdf              # Publication attachments
//! ├── notes/
//! │   ├── index.html
//! │   └── linear-algebra.pdf     # Note attachments
//! ├── reading/index.html
//! ├── posts/<slug>/index.html    # Rendered body, navigation filled in
//! ├── pdf/<slug>.pdf             # Post attachments
//! ├── css/                       # Copied verbatim
//! └── asset/                     # Copied verbatim
//! ```
//!
//! Existing files are overwritten and nothing else in the output directory
//! is touched. No timestamps are generated, so rebuilding unchanged content
//! produces byte-identical output.

use crate::config::{self, ConfigError, SiteMeta};
use crate::generate;
use crate::load::{Content, ContentStore, LoadError, RENDERED_BODY};
use crate::template;
use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Directories under the content root copied to the output unchanged.
pub const STATIC_DIRS: &[&str] = &["css", "asset"];

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("content root not found: {0}")]
    ContentRootMissing(PathBuf),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot copy {path}: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What a build produced.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BuildReport {
    /// Generated pages, relative to the output directory, in write order.
    pub pages: Vec<PathBuf>,
    /// Copied files (attachments and static directories), relative to the
    /// output directory.
    pub copied: Vec<PathBuf>,
    pub posts: usize,
    pub publications: usize,
    pub talks: usize,
    pub notes: usize,
    pub reading: usize,
}

impl BuildReport {
    /// Every path written, pages first.
    pub fn written(&self) -> impl Iterator<Item = &PathBuf> {
        self.pages.iter().chain(&self.copied)
    }
}

/// Builds the site from a content root into an output directory.
#[derive(Debug, Clone)]
pub struct Builder {
    store: ContentStore,
    output: PathBuf,
}

impl Builder {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            store: ContentStore::new(source),
            output: output.into(),
        }
    }

    /// Override the build date used for undated post sources.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.store = self.store.with_today(today);
        self
    }

    pub fn source(&self) -> &Path {
        self.store.root()
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Load site metadata and every collection without writing anything.
    pub fn load(&self) -> Result<(SiteMeta, Content), BuildError> {
        let root = self.store.root();
        if !root.is_dir() {
            return Err(BuildError::ContentRootMissing(root.to_path_buf()));
        }
        let meta = config::load_site_meta(root)?;
        let content = self.store.load_all()?;
        Ok((meta, content))
    }

    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let (meta, content) = self.load()?;
        let mut report = BuildReport {
            posts: content.posts.len(),
            publications: content.publications.len(),
            talks: content.talks.len(),
            notes: content.notes.len(),
            reading: content.reading.len(),
            ..BuildReport::default()
        };

        self.write_page(
            &mut report,
            template::HOME_PAGE,
            &generate::home_page(&meta, &content.posts, &content.publications),
        )?;
        self.write_page(
            &mut report,
            template::BLOG_PAGE,
            &generate::blog_index(&meta, &content.posts),
        )?;
        self.write_page(
            &mut report,
            template::PUBLICATIONS_PAGE,
            &generate::publications_index(&meta, &content.publications, &content.talks),
        )?;
        self.write_page(
            &mut report,
            template::NOTES_PAGE,
            &generate::notes_index(&meta, &content.notes),
        )?;
        self.write_page(
            &mut report,
            template::READING_PAGE,
            &generate::reading_index(&meta, &content.reading),
        )?;

        for post in &content.posts {
            let source = self.store.rendered_post_path(&post.slug);
            let rendered = fs::read_to_string(&source).map_err(|source_err| BuildError::Read {
                path: source.clone(),
                source: source_err,
            })?;
            let page = generate::post_page(&content.posts, &post.slug, &rendered);
            self.write_page(&mut report, &template::post_page_path(&post.slug), &page)?;
            self.copy_post_resources(&mut report, &post.slug)?;

            if let Some(pdf) = &post.attachment {
                self.copy_file(&mut report, pdf, &template::post_pdf_path(&post.slug))?;
            }
        }

        for publication in &content.publications {
            if let (Some(pdf), Some(rel)) = (
                &publication.attachment,
                template::publication_pdf_path(publication),
            ) {
                self.copy_file(&mut report, pdf, &rel)?;
            }
        }

        for note in &content.notes {
            if let (Some(pdf), Some(rel)) = (&note.attachment, template::note_pdf_path(note)) {
                self.copy_file(&mut report, pdf, &rel)?;
            }
        }

        for dir in STATIC_DIRS {
            let src = self.store.root().join(dir);
            self.copy_tree(&mut report, &src, Path::new(dir), |_| true)?;
        }

        Ok(report)
    }

    fn write_page(&self, report: &mut BuildReport, rel: &str, html: &str) -> Result<(), BuildError> {
        let path = self.output.join(rel);
        create_parent(&path).map_err(|source| BuildError::Write {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, html).map_err(|source| BuildError::Write {
            path: path.clone(),
            source,
        })?;
        report.pages.push(PathBuf::from(rel));
        Ok(())
    }

    fn copy_file(&self, report: &mut BuildReport, src: &Path, rel: &str) -> Result<(), BuildError> {
        let dst = self.output.join(rel);
        copy(src, &dst)?;
        report.copied.push(PathBuf::from(rel));
        Ok(())
    }

    /// Files the renderer left next to a post body (figures, local styles).
    fn copy_post_resources(&self, report: &mut BuildReport, slug: &str) -> Result<(), BuildError> {
        let src = self.store.posts_dir().join(slug);
        let rel = PathBuf::from(template::post_page_path(slug));
        let rel_dir = rel.parent().unwrap_or(Path::new(""));
        let body = src.join(RENDERED_BODY);
        self.copy_tree(report, &src, rel_dir, |path| path != body.as_path())
    }

    /// Copy every file under `src` to `rel_dir` in the output, in sorted
    /// order. A missing `src` copies nothing.
    fn copy_tree(
        &self,
        report: &mut BuildReport,
        src: &Path,
        rel_dir: &Path,
        include: impl Fn(&Path) -> bool,
    ) -> Result<(), BuildError> {
        if !src.is_dir() {
            return Ok(());
        }
        for entry in WalkDir::new(src).sort_by_file_name() {
            let entry = entry.map_err(|e| BuildError::Copy {
                path: src.to_path_buf(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() || !include(entry.path()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(src) else {
                continue;
            };
            let rel = rel_dir.join(relative);
            copy(entry.path(), &self.output.join(&rel))?;
            report.copied.push(rel);
        }
        Ok(())
    }
}

fn create_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
}

fn copy(src: &Path, dst: &Path) -> Result<(), BuildError> {
    let copy_err = |source| BuildError::Copy {
        path: src.to_path_buf(),
        source,
    };
    create_parent(dst).map_err(copy_err)?;
    fs::copy(src, dst).map_err(copy_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn builder(source: &Path, output: &Path) -> Builder {
        Builder::new(source, output).with_today(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
    }

    fn read(root: &Path, rel: &str) -> String {
        fs::read_to_string(root.join(rel)).unwrap_or_else(|e| panic!("{rel}: {e}"))
    }

    #[test]
    fn missing_content_root_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let result = builder(&tmp.path().join("nope"), &tmp.path().join("dist")).build();
        assert!(matches!(result, Err(BuildError::ContentRootMissing(_))));
    }

    #[test]
    fn empty_content_root_builds_stock_site() {
        let content = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let report = builder(content.path(), out.path()).build().unwrap();

        assert_eq!(report.pages.len(), 5);
        assert!(report.copied.is_empty());
        let home = read(out.path(), "index.html");
        assert!(home.contains("<title>Academic Portfolio</title>"));
    }

    #[test]
    fn fixture_build_writes_full_layout() {
        let content = setup_fixtures();
        let out = TempDir::new().unwrap();
        let report = builder(content.path(), out.path()).build().unwrap();

        for rel in [
            "index.html",
            "blog/index.html",
            "publications/index.html",
            "notes/index.html",
            "reading/index.html",
            "posts/category-theory/index.html",
            "posts/proof-assistants/index.html",
            "posts/template/index.html",
            "pdf/category-theory.pdf",
            "publications/itp25.pdf",
            "notes/linear-algebra.pdf",
            "css/main.css",
            "asset/profile.jpg",
        ] {
            assert!(out.path().join(rel).is_file(), "missing {rel}");
        }
        assert!(!out.path().join("posts/drafts-in-progress").exists());
        assert_eq!(report.posts, 3);
        assert_eq!(report.publications, 2);
        assert_eq!(report.written().count(), report.pages.len() + report.copied.len());
    }

    #[test]
    fn post_pages_get_navigation() {
        let content = setup_fixtures();
        let out = TempDir::new().unwrap();
        builder(content.path(), out.path()).build().unwrap();

        let page = read(out.path(), "posts/category-theory/index.html");
        assert!(!page.contains(template::NAV_PLACEHOLDER));
        assert!(page.contains(r#"href="../../index.html""#));
        assert!(page.contains("../../posts/proof-assistants/index.html"));
    }

    #[test]
    fn post_body_without_placeholder_copied_as_is() {
        let content = setup_fixtures();
        let out = TempDir::new().unwrap();
        builder(content.path(), out.path()).build().unwrap();

        assert_eq!(
            read(out.path(), "posts/template/index.html"),
            read(content.path(), "posts/template/index.html")
        );
    }

    #[test]
    fn post_resources_copied_beside_body() {
        let content = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_post(content.path(), "2024-01-01-figures", true);
        write_file(content.path(), "posts/figures/fig1.svg", "<svg/>");

        let report = builder(content.path(), out.path()).build().unwrap();
        assert_eq!(read(out.path(), "posts/figures/fig1.svg"), "<svg/>");
        assert!(report.copied.contains(&PathBuf::from("posts/figures/fig1.svg")));
        assert!(!report.copied.contains(&PathBuf::from("posts/figures/index.html")));
    }

    #[test]
    fn malformed_site_meta_is_fatal() {
        let content = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_file(content.path(), config::SITE_META_FILE, "{ broken");
        let result = builder(content.path(), out.path()).build();
        assert!(matches!(result, Err(BuildError::Config(_))));
    }

    #[test]
    fn load_does_not_write() {
        let content = setup_fixtures();
        let out = TempDir::new().unwrap();
        let dist = out.path().join("dist");
        let (meta, loaded) = builder(content.path(), &dist).load().unwrap();
        assert_eq!(meta.site.title, "Apiros3");
        assert_eq!(loaded.posts.len(), 3);
        assert!(!dist.exists());
    }
}
