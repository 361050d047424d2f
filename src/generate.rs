//! Page generation.
//!
//! Stage 2 of the build pipeline. Turns loaded records into complete HTML
//! documents. Every function here is pure: records in, `String` out. Writing
//! the result is the build module's job.
//!
//! ## Generated Pages
//!
//! - **Home** (`index.html`): hero, about section, recent posts and
//!   publications, contact details
//! - **Blog** (`blog/index.html`): every post with the tag filter
//! - **Publications** (`publications/index.html`): publications, then talks
//! - **Notes** (`notes/index.html`): lecture notes with PDF links
//! - **Reading** (`reading/index.html`): reading list grouped by status
//! - **Posts** (`posts/<slug>/index.html`): the externally rendered body with
//!   the navigation placeholder filled in
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::config::SiteMeta;
use crate::template::{
    self, BLOG_PAGE, HOME_PAGE, NOTES_PAGE, PUBLICATIONS_PAGE, READING_PAGE, TAG_FILTER_JS,
};
use crate::types::{Note, Post, Publication, ReadingItem, ReadingStatus, Talk};
use maud::{Markup, PreEscaped, html};

/// Navigation names of the generated pages, matched against configured
/// navigation entries case-insensitively.
const ABOUT_NAV: &str = "About";
const BLOG_NAV: &str = "Blog";
const PUBLICATIONS_NAV: &str = "Publications";
const NOTES_NAV: &str = "Notes";
const READING_NAV: &str = "Reading";

/// Wrap page content with navigation, back link and footer.
fn section_page(
    meta: &SiteMeta,
    page_path: &str,
    nav_name: &str,
    body_class: &str,
    content: Markup,
) -> String {
    let base = template::base_path_for(page_path);
    let title = format!("{nav_name} - {}", meta.site.title);
    let body = html! {
        (template::navigation(meta, nav_name, &base))
        main.container {
            (template::back_link(&base))
            h2.section-title { (nav_name) }
            (content)
        }
        (template::site_footer(meta))
    };
    template::page_shell(meta, &title, &base, Some(body_class), body).into_string()
}

/// The home page.
///
/// Shows the configured number of most recent posts and publications; a
/// section with nothing to show is left out.
pub fn home_page(meta: &SiteMeta, posts: &[Post], publications: &[Publication]) -> String {
    let base = template::base_path_for(HOME_PAGE);
    let about = &meta.about;
    let recent_posts = &posts[..posts.len().min(meta.build.recent_posts)];
    let recent_pubs = &publications[..publications.len().min(meta.build.recent_publications)];

    let body = html! {
        (template::navigation(meta, ABOUT_NAV, &base))
        (template::hero(&meta.site.title, &meta.site.description))
        main.container {
            div.main-layout {
                div.main-content {
                    section.content-section id="about" {
                        div.about-header {
                            h2 { (about.title) }
                            @if let Some(picture) = &about.profile_picture {
                                img.profile-picture
                                    src=(template::resolve_link(&base, picture))
                                    alt=(about.profile_alt.as_deref().unwrap_or(&about.title));
                            }
                        }
                        div.about-content { (template::render_markdown(&about.content)) }
                    }
                    @if !recent_posts.is_empty() {
                        section.content-section id="recent-posts" {
                            h2 { "Recent Posts" }
                            ul.post-list {
                                @for post in recent_posts {
                                    (template::post_card(post, &base))
                                }
                            }
                            a.more-link href=(template::resolve_link(&base, BLOG_PAGE)) { "All posts →" }
                        }
                    }
                    @if !recent_pubs.is_empty() {
                        section.content-section id="recent-publications" {
                            h2 { "Recent Publications" }
                            ul.publication-list {
                                @for publication in recent_pubs {
                                    (template::publication_card(publication, &base))
                                }
                            }
                            a.more-link href=(template::resolve_link(&base, PUBLICATIONS_PAGE)) { "All publications →" }
                        }
                    }
                }
                (template::contact_section(&meta.contact))
            }
        }
        (template::site_footer(meta))
    };
    template::page_shell(meta, &meta.site.title, &base, Some("home-page"), body).into_string()
}

/// Every post, newest first, with the tag filter and its script.
pub fn blog_index(meta: &SiteMeta, posts: &[Post]) -> String {
    let base = template::base_path_for(BLOG_PAGE);
    let content = html! {
        (template::tag_filters(posts))
        @if posts.is_empty() {
            p.empty-state { "No posts yet." }
        } @else {
            ul.post-list id="post-list" {
                @for post in posts {
                    (template::post_card(post, &base))
                }
            }
        }
        script { (PreEscaped(TAG_FILTER_JS)) }
    };
    section_page(meta, BLOG_PAGE, BLOG_NAV, "blog-page", content)
}

pub fn publications_index(meta: &SiteMeta, publications: &[Publication], talks: &[Talk]) -> String {
    let base = template::base_path_for(PUBLICATIONS_PAGE);
    let content = html! {
        section.content-section id="publications" {
            @if publications.is_empty() {
                p.empty-state { "No publications yet." }
            } @else {
                ul.publication-list {
                    @for publication in publications {
                        (template::publication_card(publication, &base))
                    }
                }
            }
        }
        @if !talks.is_empty() {
            section.content-section id="talks" {
                h2 { "Talks & Presentations" }
                ul.talk-list {
                    @for talk in talks {
                        (template::talk_card(talk, &base))
                    }
                }
            }
        }
    };
    section_page(meta, PUBLICATIONS_PAGE, PUBLICATIONS_NAV, "publications-page", content)
}

pub fn notes_index(meta: &SiteMeta, notes: &[Note]) -> String {
    let base = template::base_path_for(NOTES_PAGE);
    let content = html! {
        @if notes.is_empty() {
            p.empty-state { "No notes yet." }
        } @else {
            ul.note-list {
                @for note in notes {
                    (template::note_card(note, &base))
                }
            }
        }
    };
    section_page(meta, NOTES_PAGE, NOTES_NAV, "notes-page", content)
}

/// Reading list, one section per status in precedence order.
///
/// Items must already be sorted by status; consecutive runs form the groups.
pub fn reading_index(meta: &SiteMeta, items: &[ReadingItem]) -> String {
    let groups = group_by_status(items);
    let content = html! {
        @if groups.is_empty() {
            p.empty-state { "Nothing on the reading list yet." }
        }
        @for (status, group) in &groups {
            section.reading-group id=(status.slug()) {
                h3 { (status.label()) " (" (group.len()) ")" }
                ul.reading-list {
                    @for item in *group {
                        (template::reading_card(item))
                    }
                }
            }
        }
    };
    section_page(meta, READING_PAGE, READING_NAV, "reading-page", content)
}

fn group_by_status(items: &[ReadingItem]) -> Vec<(ReadingStatus, &[ReadingItem])> {
    items
        .chunk_by(|a, b| a.status == b.status)
        .map(|group| (group[0].status, group))
        .collect()
}

/// Fill the navigation placeholder in a rendered post body.
///
/// Bodies without the placeholder are returned unchanged.
pub fn post_page(posts: &[Post], slug: &str, rendered: &str) -> String {
    if !rendered.contains(template::NAV_PLACEHOLDER) {
        return rendered.to_string();
    }
    let base = template::base_path_for(&template::post_page_path(slug));
    let nav = template::post_nav_links(posts, slug, &base).into_string();
    rendered.replacen(template::NAV_PLACEHOLDER, &nav, 1)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::ContentStore;
    use crate::test_helpers::*;
    use chrono::NaiveDate;

    fn fixture_content() -> (SiteMeta, crate::load::Content) {
        let tmp = setup_fixtures();
        let meta = crate::config::load_site_meta(tmp.path()).unwrap();
        let content = ContentStore::new(tmp.path())
            .with_today(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
            .load_all()
            .unwrap();
        (meta, content)
    }

    // =========================================================================
    // Home
    // =========================================================================

    #[test]
    fn home_renders_default_title_without_site_meta() {
        let meta = SiteMeta::default();
        let html = home_page(&meta, &[], &[]);
        assert!(html.contains("<title>Academic Portfolio</title>"));
        assert!(html.contains("Personal academic homepage"));
        assert!(!html.contains("recent-posts"));
        assert!(!html.contains("recent-publications"));
    }

    #[test]
    fn home_limits_recent_sections() {
        let (meta, content) = fixture_content();
        let html = home_page(&meta, &content.posts, &content.publications);

        // recent_posts = 2, recent_publications = 1 in the fixture
        assert_eq!(count_of(&html, "class=\"post-item\""), 2);
        assert_eq!(count_of(&html, "class=\"publication-item\""), 1);
        assert!(position_of(&html, "Template") < position_of(&html, "Category Theory"));
        assert!(!html.contains("Proof Assistants"));
    }

    #[test]
    fn home_renders_about_markdown_and_picture() {
        let (meta, _) = fixture_content();
        let html = home_page(&meta, &[], &[]);
        assert!(html.contains("<strong>type theory</strong>"));
        assert!(html.contains(r#"src="asset/profile.jpg""#));
        assert!(html.contains(r#"class="nav-link current" href="index.html""#));
    }

    // =========================================================================
    // Blog
    // =========================================================================

    #[test]
    fn blog_filter_buttons_and_data_tags() {
        let (meta, content) = fixture_content();
        let html = blog_index(&meta, &content.posts);

        assert!(position_of(&html, r#"data-tag="all">All<"#) < position_of(&html, ">Category-Theory<"));
        assert!(position_of(&html, ">Category-Theory<") < position_of(&html, ">Logic<"));
        assert!(position_of(&html, ">Logic<") < position_of(&html, ">Math<"));
        assert_eq!(count_of(&html, r#"data-tag="math""#), 1);
        assert!(html.contains(r#"data-tags="category-theory,math""#));
        assert!(html.contains(r#"data-tags="logic,math""#));
        assert!(html.contains(r#"href="../posts/category-theory/index.html""#));
        assert!(html.contains(r#"href="../pdf/category-theory.pdf""#));
        assert!(html.contains("tag-filter"));
        assert!(html.contains(r#"class="nav-link current" href="../blog/index.html""#));
    }

    #[test]
    fn blog_posts_newest_first() {
        let (meta, content) = fixture_content();
        let html = blog_index(&meta, &content.posts);
        let theory = position_of(&html, "A Gentle Introduction to Category Theory");
        let proofs = position_of(&html, "posts/proof-assistants/index.html");
        assert!(theory < proofs);
    }

    #[test]
    fn blog_without_posts_keeps_lone_all_button() {
        let html = blog_index(&SiteMeta::default(), &[]);
        assert!(html.contains("No posts yet."));
        assert_eq!(count_of(&html, r#"<button class="tag-filter"#), 1);
        assert!(html.contains(r#"data-tag="all">All</button>"#));
    }

    #[test]
    fn blog_filter_hides_items_without_a_stylesheet() {
        let (meta, content) = fixture_content();
        let html = blog_index(&meta, &content.posts);
        assert!(html.contains("item.hidden = !visible;"));
        assert!(!html.contains("classList.toggle('hidden'"));
        assert!(!html.contains("<style"));
    }

    // =========================================================================
    // Publications, notes, reading
    // =========================================================================

    #[test]
    fn publications_page_lists_papers_then_talks() {
        let (meta, content) = fixture_content();
        let html = publications_index(&meta, &content.publications, &content.talks);
        assert_eq!(count_of(&html, "class=\"publication-item\""), 2);
        assert_eq!(count_of(&html, "class=\"talk-item\""), 2);
        assert!(position_of(&html, "publication-item") < position_of(&html, "talk-item"));
        assert!(html.contains(r#"href="../publications/itp25.pdf""#));
        assert!(!html.contains(", 0<"));
    }

    #[test]
    fn notes_page_links_attachments() {
        let (meta, content) = fixture_content();
        let html = notes_index(&meta, &content.notes);
        assert!(html.contains(r#"href="../notes/linear-algebra.pdf""#));
        assert_eq!(count_of(&html, "class=\"note-item\""), 2);
    }

    #[test]
    fn reading_page_groups_by_status() {
        let (meta, content) = fixture_content();
        let html = reading_index(&meta, &content.reading);
        let groups = group_by_status(&content.reading);
        assert_eq!(count_of(&html, "class=\"reading-group\""), groups.len());
        assert_eq!(count_of(&html, "class=\"reading-item "), 4);
        let statuses: Vec<ReadingStatus> = groups.iter().map(|(s, _)| *s).collect();
        let mut sorted = statuses.clone();
        sorted.sort();
        assert_eq!(statuses, sorted);
    }

    #[test]
    fn section_pages_rebase_links() {
        let meta = SiteMeta::default();
        for html in [
            notes_index(&meta, &[]),
            reading_index(&meta, &[]),
            publications_index(&meta, &[], &[]),
        ] {
            assert!(html.contains(r#"href="../css/main.css""#));
            assert!(html.contains(r#"class="back-link" href="../index.html""#));
        }
    }

    // =========================================================================
    // Post pages
    // =========================================================================

    #[test]
    fn post_page_fills_placeholder() {
        let (_, content) = fixture_content();
        let rendered = "<body><!-- Navigation will be added by script --><p>x</p></body>";
        let html = post_page(&content.posts, "category-theory", rendered);
        assert!(!html.contains(template::NAV_PLACEHOLDER));
        assert!(html.contains(r#"href="../../posts/proof-assistants/index.html""#));
        assert!(html.contains(r#"<li class="current"><a href="../../posts/category-theory/index.html">"#));
        assert!(html.ends_with("<p>x</p></body>"));
    }

    #[test]
    fn post_page_without_placeholder_is_unchanged() {
        let rendered = "<html><body>plain</body></html>";
        assert_eq!(post_page(&[], "x", rendered), rendered);
    }
}
