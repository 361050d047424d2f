//! CLI output formatting for the pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every entity (post,
//! publication, note) leads with its positional index and title; filesystem
//! paths follow as indented context lines. The output reads as a content
//! inventory while still letting users trace data back to specific files.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Site
//!     Apiros3
//!     Source: site.meta.json
//!
//! Posts
//! 001 A Gentle Introduction to Category Theory (2024-06-01)
//!     Source: posts/category-theory/index.html
//!     Tags: category-theory, math
//!     PDF: posts/2024-06-01-category-theory.pdf
//!
//! Publications
//! 001 Verified Parsing (2025)
//!     PDF: publications/itp25.pdf
//! ```
//!
//! ## Build
//!
//! ```text
//! Pages
//!     index.html
//!     blog/index.html
//!
//! Copied
//!     pdf/category-theory.pdf
//!
//! Built 3 posts, 2 publications, 2 talks, 2 notes, 4 reading items
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::build::BuildReport;
use crate::config::SiteMeta;
use crate::load::Content;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional detail.
///
/// ```text
/// 001 Category Theory (2024-06-01)
/// 001 Linear Algebra
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) if !d.is_empty() => format!("{} {} ({})", format_index(index), title, d),
        _ => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// Display a path relative to the content root when it lives inside it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Push a section title, separated from the previous section by a blank line.
fn section(lines: &mut Vec<String>, title: &str) {
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(title.to_string());
}

// ============================================================================
// Check output
// ============================================================================

/// Format the loaded content inventory.
pub fn format_load_output(meta: &SiteMeta, content: &Content, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let context = indent(1);

    section(&mut lines, "Site");
    lines.push(format!("{}{}", context, meta.site.title));
    let site_meta = source_root.join(crate::config::SITE_META_FILE);
    if site_meta.is_file() {
        lines.push(format!("{}Source: {}", context, crate::config::SITE_META_FILE));
    } else {
        lines.push(format!("{}Source: (stock defaults)", context));
    }

    section(&mut lines, "Posts");
    for (i, post) in content.posts.iter().enumerate() {
        let date = post.date.format("%Y-%m-%d").to_string();
        lines.push(entity_header(i + 1, &post.title, Some(date.as_str())));
        let body = source_root
            .join(crate::load::POSTS_DIR)
            .join(&post.slug)
            .join(crate::load::RENDERED_BODY);
        lines.push(format!("{}Source: {}", context, display_path(&body, source_root)));
        if !post.tags.is_empty() {
            let tags: Vec<&str> = post.tags.iter().map(String::as_str).collect();
            lines.push(format!("{}Tags: {}", context, tags.join(", ")));
        }
        if let Some(abstract_text) = &post.abstract_text {
            lines.push(format!("{}{}", context, truncate_desc(abstract_text.trim(), 60)));
        }
        if let Some(pdf) = &post.attachment {
            lines.push(format!("{}PDF: {}", context, display_path(pdf, source_root)));
        }
    }

    section(&mut lines, "Publications");
    for (i, publication) in content.publications.iter().enumerate() {
        lines.push(entity_header(i + 1, &publication.title, publication.display_year()));
        if let Some(pdf) = &publication.attachment {
            lines.push(format!("{}PDF: {}", context, display_path(pdf, source_root)));
        }
    }

    section(&mut lines, "Talks");
    for (i, talk) in content.talks.iter().enumerate() {
        lines.push(entity_header(i + 1, &talk.title, Some(talk.date.as_str())));
        if let Some(venue) = &talk.venue {
            lines.push(format!("{}Venue: {}", context, venue));
        }
    }

    section(&mut lines, "Notes");
    for (i, note) in content.notes.iter().enumerate() {
        lines.push(entity_header(i + 1, &note.title, note.subject.as_deref()));
        if let Some(pdf) = &note.attachment {
            lines.push(format!("{}PDF: {}", context, display_path(pdf, source_root)));
        }
    }

    section(&mut lines, "Reading");
    for (i, item) in content.reading.iter().enumerate() {
        lines.push(entity_header(i + 1, &item.title, Some(item.status.label())));
    }

    lines
}

/// Print the content inventory to stdout.
pub fn print_load_output(meta: &SiteMeta, content: &Content, source_root: &Path) {
    for line in format_load_output(meta, content, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format what a build wrote, followed by a one-line summary.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    section(&mut lines, "Pages");
    for page in &report.pages {
        lines.push(format!("{}{}", indent(1), page.display()));
    }

    if !report.copied.is_empty() {
        section(&mut lines, "Copied");
        for file in &report.copied {
            lines.push(format!("{}{}", indent(1), file.display()));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Built {} posts, {} publications, {} talks, {} notes, {} reading items",
        report.posts, report.publications, report.talks, report.notes, report.reading
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
