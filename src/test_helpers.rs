//! Shared test utilities for the folio test suite.
//!
//! Provides fixture setup, small content-store writers, and lookup helpers
//! that panic with a clear message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let posts = ContentStore::new(tmp.path()).list_posts().unwrap();
//!
//! let post = find_post(&posts, "category-theory");
//! assert!(post.has_attachment());
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::naming;
use crate::types::Post;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Content store writers
// =========================================================================

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Write a post source `posts/<stem>.tex`, plus its rendered body when
/// `rendered` is set.
pub fn write_post(root: &Path, stem: &str, rendered: bool) {
    write_file(root, &format!("posts/{stem}.tex"), "\\section{Draft}");
    if rendered {
        let slug = naming::parse_post_stem(stem).slug;
        write_file(
            root,
            &format!("posts/{slug}/index.html"),
            "<html><body><!-- Navigation will be added by script --><p>body</p></body></html>",
        );
    }
}

// =========================================================================
// Lookups and extractors
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(posts: &'a [Post], slug: &str) -> &'a Post {
    posts.iter().find(|p| p.slug == slug).unwrap_or_else(|| {
        let slugs = post_slugs(posts);
        panic!("post '{slug}' not found. Available: {slugs:?}")
    })
}

/// All post slugs in order.
pub fn post_slugs(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|p| p.slug.as_str()).collect()
}

/// Position of `needle` in `haystack`. Panics with context if absent.
pub fn position_of(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not found in output"))
}

/// Count non-overlapping occurrences of `needle`.
pub fn count_of(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
