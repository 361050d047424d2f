//! Reusable HTML fragments.
//!
//! Every page is assembled from the functions in this module. Fragments are
//! pure: they take records and a `base_path` and return [`Markup`]. Nothing
//! here touches the filesystem.
//!
//! ## Base paths
//!
//! Links in the configuration and in content records are written relative to
//! the site root. A page in a subdirectory passes a `base_path` (`"../"` for
//! `blog/index.html`, `"../../"` for `posts/<slug>/index.html`) and
//! [`resolve_link`] re-bases every relative link through it. Absolute URLs
//! pass through unchanged.
//!
//! ## Site paths
//!
//! The functions under "Site paths" are the single source of truth for where
//! pages and attachments live in the output tree. Templates link to them and
//! the build writes to them.

use crate::config::{Contact, SiteMeta};
use crate::naming;
use crate::types::{Note, Post, Publication, ReadingItem, Talk};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::collections::BTreeSet;

const NAV_JS: &str = include_str!("../static/nav.js");
const MATH_JS: &str = include_str!("../static/math.js");
pub const TAG_FILTER_JS: &str = include_str!("../static/tag-filter.js");

const KATEX_CSS: &str = "https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css";
const KATEX_JS: &str = "https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.js";
const KATEX_AUTO_RENDER: &str =
    "https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/contrib/auto-render.min.js";

/// Marker the external renderer leaves where post navigation belongs.
pub const NAV_PLACEHOLDER: &str = "<!-- Navigation will be added by script -->";

/// Posts listed in a post page's navigation block.
pub const POST_NAV_LIMIT: usize = 10;

/// Data-tag of the "All" filter button.
const ALL_TAGS: &str = "all";

// ============================================================================
// Site paths
// ============================================================================

pub const HOME_PAGE: &str = "index.html";
pub const BLOG_PAGE: &str = "blog/index.html";
pub const PUBLICATIONS_PAGE: &str = "publications/index.html";
pub const NOTES_PAGE: &str = "notes/index.html";
pub const READING_PAGE: &str = "reading/index.html";

pub fn post_page_path(slug: &str) -> String {
    format!("posts/{slug}/index.html")
}

pub fn post_pdf_path(slug: &str) -> String {
    format!("pdf/{slug}.pdf")
}

/// Output path of a publication's PDF, keeping its source filename.
pub fn publication_pdf_path(publication: &Publication) -> Option<String> {
    let name = publication.attachment.as_ref()?.file_name()?.to_str()?;
    Some(format!("publications/{name}"))
}

/// Output path of a note's PDF, keeping its source filename.
pub fn note_pdf_path(note: &Note) -> Option<String> {
    let name = note.attachment.as_ref()?.file_name()?.to_str()?;
    Some(format!("notes/{name}"))
}

/// Prefix leading from a page back to the site root.
///
/// ```text
/// index.html                  → ""
/// blog/index.html             → "../"
/// posts/<slug>/index.html     → "../../"
/// ```
pub fn base_path_for(page_path: &str) -> String {
    "../".repeat(page_path.matches('/').count())
}

/// Re-base a root-relative link for a page at `base_path`.
///
/// A leading `./` is dropped. URLs with a scheme, protocol-relative URLs,
/// absolute paths and fragments are returned unchanged.
pub fn resolve_link(base_path: &str, url: &str) -> String {
    if is_absolute(url) {
        return url.to_string();
    }
    let rel = url.strip_prefix("./").unwrap_or(url);
    format!("{base_path}{rel}")
}

fn is_absolute(url: &str) -> bool {
    if url.starts_with('/') || url.starts_with('#') {
        return true;
    }
    // scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"
    match url.split_once(':') {
        Some((scheme, _)) => {
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

// ============================================================================
// Document structure
// ============================================================================

/// Full HTML document: head with stylesheets (and KaTeX when enabled), then
/// `content` inside the body.
pub fn page_shell(
    meta: &SiteMeta,
    title: &str,
    base_path: &str,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    let author = meta.site.author.trim();
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                @if !meta.site.description.is_empty() {
                    meta name="description" content=(meta.site.description);
                }
                @if !author.is_empty() {
                    meta name="author" content=(author);
                }
                @for sheet in &meta.build.stylesheets {
                    link rel="stylesheet" href=(resolve_link(base_path, sheet));
                }
                @if meta.build.math {
                    link rel="stylesheet" href=(KATEX_CSS);
                    script defer src=(KATEX_JS) {}
                    script defer src=(KATEX_AUTO_RENDER) {}
                    script { (PreEscaped(MATH_JS)) }
                }
            }
            body class=[body_class] {
                (content)
                script { (PreEscaped(NAV_JS)) }
            }
        }
    }
}

/// Site header: brand link, navigation list, mobile toggle.
///
/// The entry whose name equals `current` (ignoring case) gets the `current`
/// class. Any `current` flag stored in the configuration is ignored.
pub fn navigation(meta: &SiteMeta, current: &str, base_path: &str) -> Markup {
    let current = current.to_lowercase();
    html! {
        header.site-header {
            div.container {
                a.brand href=(resolve_link(base_path, HOME_PAGE)) { (meta.brand()) }
                nav.main-nav {
                    ul.nav-list {
                        @for item in &meta.navigation.items {
                            @let is_current = item.name.to_lowercase() == current;
                            li.nav-item {
                                a.nav-link.current[is_current]
                                    href=(resolve_link(base_path, &item.url)) { (item.name) }
                            }
                        }
                    }
                }
                button.nav-toggle type="button" aria-label="Toggle navigation" { "☰" }
            }
        }
    }
}

pub fn hero(title: &str, subtitle: &str) -> Markup {
    html! {
        div.hero {
            div.container {
                h1 { (title) }
                @if !subtitle.is_empty() {
                    p { (subtitle) }
                }
            }
        }
    }
}

/// Contact block; renders nothing when no entry is set.
pub fn contact_section(contact: &Contact) -> Markup {
    let entries = contact.entries();
    html! {
        @if !entries.is_empty() {
            aside.sidebar {
                h3 { "Contact" }
                dl.contact-info {
                    @for (label, value) in &entries {
                        dt { (label) }
                        dd { (contact_value(value)) }
                    }
                }
            }
        }
    }
}

fn contact_value(value: &str) -> Markup {
    let value = value.trim();
    let is_email = value.contains('@') && !value.contains(['/', ':', ' ']);
    html! {
        @if is_email {
            a href={ "mailto:" (value) } { (value) }
        } @else if value.starts_with("http://") || value.starts_with("https://") {
            a href=(value) target="_blank" rel="noopener" { (value) }
        } @else {
            (value)
        }
    }
}

pub fn site_footer(meta: &SiteMeta) -> Markup {
    let author = meta.site.author.trim();
    html! {
        footer.site-footer {
            div.container {
                p {
                    "© "
                    @if author.is_empty() { (meta.site.title) } @else { (author) }
                }
                @if let Some(updated) = &meta.site.last_updated {
                    p.last-updated { "Last updated: " (updated) }
                }
            }
        }
    }
}

/// "← Back to Mainpage" link for section pages.
pub fn back_link(base_path: &str) -> Markup {
    html! {
        a.back-link href=(resolve_link(base_path, HOME_PAGE)) { "← Back to Mainpage" }
    }
}

/// Markdown to HTML. Content is author-controlled, so raw HTML passes through.
pub fn render_markdown(markdown: &str) -> Markup {
    let parser = Parser::new(markdown);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);
    PreEscaped(body_html)
}

// ============================================================================
// Cards
// ============================================================================

/// One post in a list. Carries `data-tags` for the filter script.
pub fn post_card(post: &Post, base_path: &str) -> Markup {
    html! {
        li.post-item data-tags=(post.data_tags()) {
            a.post-title href=(resolve_link(base_path, &post_page_path(&post.slug))) { (post.title) }
            span.post-date { (post.date.format("%Y-%m-%d")) }
            @if post.has_attachment() {
                a.post-download href=(resolve_link(base_path, &post_pdf_path(&post.slug)))
                    target="_blank" { "PDF" }
            }
            @if let Some(abstract_text) = &post.abstract_text {
                p.post-abstract { (abstract_text) }
            }
            @if !post.tags.is_empty() {
                div.post-tags {
                    @for tag in &post.tags {
                        span.post-tag { (tag) }
                    }
                }
            }
        }
    }
}

pub fn publication_card(publication: &Publication, base_path: &str) -> Markup {
    let links = &publication.links;
    let pdf = publication_pdf_path(publication);
    html! {
        li.publication-item {
            div.publication-header {
                h3.publication-title { (publication.title) }
                @if !links.is_empty() || pdf.is_some() {
                    div.publication-links {
                        @if let Some(url) = &links.arxiv {
                            a.pub-link.arxiv-link href=(url) target="_blank" rel="noopener" { "arXiv" }
                        }
                        @if let Some(url) = &links.doi {
                            a.pub-link.doi-link href=(url) target="_blank" rel="noopener" { "DOI" }
                        }
                        @if let Some(url) = &links.code {
                            a.pub-link.code-link href=(url) target="_blank" rel="noopener" { "Code" }
                        }
                        @if let Some(path) = &pdf {
                            a.pub-link.pdf-link href=(resolve_link(base_path, path)) target="_blank" { "PDF" }
                        }
                    }
                }
            }
            div.publication-meta {
                @if !publication.authors.is_empty() {
                    div.publication-authors { (publication.authors.join(", ")) }
                }
                @let venue = publication.venue_line();
                @if !venue.is_empty() {
                    div.publication-venue { (venue) }
                }
                @if let Some(pages) = &publication.pages {
                    div.publication-pages { (pages) }
                }
            }
            @if let Some(abstract_text) = &publication.abstract_text {
                div.publication-abstract { (abstract_text) }
            }
        }
    }
}

pub fn talk_card(talk: &Talk, base_path: &str) -> Markup {
    html! {
        li.talk-item {
            div.talk-header {
                h3.talk-title { (talk.title) }
                @if let Some(kind) = &talk.kind {
                    span.talk-type { (kind) }
                }
            }
            div.talk-meta {
                @if let Some(venue) = &talk.venue {
                    span.talk-venue { (venue) }
                }
                @if let Some(location) = &talk.location {
                    span.talk-location { (location) }
                }
                @if !talk.date.is_empty() {
                    span.talk-date { (talk.date) }
                }
            }
            @if !talk.coauthors.is_empty() {
                div.talk-coauthors { "Joint work with " (talk.coauthors.join(", ")) }
            }
            @if let Some(abstract_text) = &talk.abstract_text {
                div.talk-abstract { (abstract_text) }
            }
            @if talk.slides.is_some() || talk.video.is_some() {
                div.talk-links {
                    @if let Some(url) = &talk.slides {
                        a.talk-link href=(resolve_link(base_path, url)) target="_blank" { "Slides" }
                    }
                    @if let Some(url) = &talk.video {
                        a.talk-link href=(resolve_link(base_path, url)) target="_blank" { "Video" }
                    }
                }
            }
        }
    }
}

pub fn note_card(note: &Note, base_path: &str) -> Markup {
    let pdf = note_pdf_path(note);
    html! {
        li.note-item {
            h3.note-title {
                @if let Some(path) = &pdf {
                    a href=(resolve_link(base_path, path)) target="_blank" { (note.title) }
                } @else {
                    (note.title)
                }
            }
            @if let Some(subject) = &note.subject {
                span.note-subject { (subject) }
            }
            @if let Some(description) = &note.description {
                p.note-description { (description) }
            }
        }
    }
}

pub fn reading_card(item: &ReadingItem) -> Markup {
    html! {
        li class={ "reading-item status-" (item.status.slug()) } {
            span.reading-title { (item.title) }
            @if let Some(author) = &item.author {
                span.reading-author { " by " (author) }
            }
            span.reading-status { (item.status.label()) }
            @if let Some(category) = &item.category {
                span.reading-category { (category) }
            }
            @if let Some(comment) = &item.comment {
                p.reading-comment { (comment) }
            }
        }
    }
}

// ============================================================================
// Post navigation and filtering
// ============================================================================

/// Distinct lower-cased tags across `posts`, sorted.
pub fn distinct_tags(posts: &[Post]) -> BTreeSet<String> {
    posts
        .iter()
        .flat_map(|p| p.tags.iter().map(|t| t.to_lowercase()))
        .filter(|t| t != ALL_TAGS)
        .collect()
}

/// "All" button followed by one button per distinct tag.
pub fn tag_filters(posts: &[Post]) -> Markup {
    html! {
        div.filter-section {
            h3 { "Filter by Tag" }
            div.tag-filters {
                button.tag-filter.active type="button" data-tag=(ALL_TAGS) { "All" }
                @for tag in distinct_tags(posts) {
                    button.tag-filter type="button" data-tag=(tag) { (naming::title_case(&tag)) }
                }
            }
        }
    }
}

/// Navigation block substituted into rendered post bodies: a link home and
/// the most recent posts, with `current_slug` highlighted.
pub fn post_nav_links(posts: &[Post], current_slug: &str, base_path: &str) -> Markup {
    html! {
        nav.post-nav {
            (back_link(base_path))
            ul.post-nav-list {
                @for post in posts.iter().take(POST_NAV_LIMIT) {
                    li class=[(post.slug == current_slug).then_some("current")] {
                        a href=(resolve_link(base_path, &post_page_path(&post.slug))) { (post.title) }
                    }
                }
            }
        }
    }
}
