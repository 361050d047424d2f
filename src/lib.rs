//! # Folio
//!
//! A static site builder for an academic portfolio. The content store is the
//! data source: blog posts rendered by an external tool, publication and note
//! records as JSON sidecars, a talks list and a reading list. Folio turns it
//! into a small, fully static website.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Load      content/  →  records     (filesystem → typed collections)
//! 2. Generate  records   →  HTML        (pure page functions over maud fragments)
//! 3. Build     HTML      →  dist/       (pages written, attachments copied)
//! ```
//!
//! Loading and generation never write to disk; [`build::Builder`] is the only
//! writer. Generation is a pure function of the loaded records and the site
//! metadata, so page tests need no filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`load`] | Stage 1: discovers posts, publications, talks, notes and the reading list |
//! | [`generate`] | Stage 2: renders every page to an HTML string |
//! | [`build`] | Stage 3: orchestrates the stages and writes the output tree |
//! | [`template`] | Reusable maud fragments, link re-basing and output paths |
//! | [`config`] | `site.meta.json` loading, deep-merge over stock defaults, validation |
//! | [`types`] | Content records shared between stages |
//! | [`naming`] | `YYYY-MM-DD-slug` filename parsing and title derivation |
//! | [`metadata`] | JSON sidecar reading and field resolution |
//! | [`attachment`] | Ordered PDF lookup strategies per content kind |
//! | [`output`] | CLI output formatting for `check` and `build` |
//!
//! # Design Decisions
//!
//! ## Maud Templates
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Every fragment in
//! [`template`] is an ordinary function returning `Markup`; pages compose them.
//! Interpolated text is escaped.
//!
//! ## Explicit Site Metadata
//!
//! [`config::SiteMeta`] is loaded once per build and passed by reference to
//! every loader, template and generator call. A missing `site.meta.json`
//! yields the stock record.
//!
//! ## Posts Need a Rendered Body
//!
//! Post sources (`.tex`, `.typ`, `.md`) are rendered to HTML by an external
//! tool. A post is published only once `posts/<slug>/index.html` exists; its
//! `<!-- Navigation will be added by script -->` placeholder is replaced with
//! links to the other posts.
//!
//! ## Relative Links Everywhere
//!
//! Pages link to each other with relative URLs re-based through
//! [`template::resolve_link`], so the output works from any directory or
//! file server without a configured site URL.

pub mod attachment;
pub mod build;
pub mod config;
pub mod generate;
pub mod load;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
