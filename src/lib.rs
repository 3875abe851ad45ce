//! # rs-readable
//!
//! Reader-mode content extraction: locate the main article content of an
//! HTML page among navigation, ads and boilerplate, and reduce it to a
//! canonical, minimal HTML form suitable for storage, diffing, or
//! rendering.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_readable::extract_main_content;
//!
//! let html = r#"<html><body><nav>Home | About</nav>
//! <article><p>Main content here.</p></article></body></html>"#;
//!
//! let readable = extract_main_content(html)?;
//! assert!(readable.contains("<p>Main content here.</p>"));
//! assert!(!readable.contains("nav"));
//! # Ok::<(), rs_readable::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Content Location**: density scoring plus keyword patterns find the
//!   article subtree, with tiered fallbacks down to the document body
//! - **Simplification**: a fixed pass pipeline yields a closed tag
//!   vocabulary, normalized text, and optional digest/index annotations
//! - **Caching**: an LRU+TTL cache keyed by content fingerprint memoizes
//!   extraction results across repeated fetches
//! - **Resilience**: timeout, retry and parse-repair wrappers keep
//!   malformed input from taking the caller down

mod error;
mod locator;
mod options;
mod patterns;

/// Owned document tree with selection, serialization and mutation.
pub mod dom;

/// LRU+TTL cache with statistics and background expiry.
pub mod cache;

/// Batch traversal and order-preserving parallel mapping.
pub mod parallel;

/// Generic scored-selector extraction for metadata collaborators.
pub mod query;

/// Timeout, retry and fallback wrappers.
pub mod resilience;

/// Density features and content scoring.
pub mod scoring;

/// The simplification pass pipeline.
pub mod simplify;

/// Per-host rewrite rules applied before content location.
pub mod siterules;

/// Text normalization and tokenization.
pub mod text;

// Public API - re-exports
pub use error::{Error, Result};
pub use locator::locate;
pub use options::{Options, ScoringWeights};

use std::time::Duration;

use cache::LruTtlCache;
use dom::Document;
use siterules::SiteRules;

/// Simplify a whole document without locating main content.
///
/// # Example
///
/// ```rust
/// use rs_readable::simplify_html;
///
/// let out = simplify_html("<div><p>Hello <b>world</b></p></div>")?;
/// assert!(out.contains("<p>Hello world</p>"));
/// # Ok::<(), rs_readable::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn simplify_html(html: &str) -> Result<String> {
    simplify_html_with_options(html, &Options::default())
}

/// Simplify a whole document with custom options.
#[allow(clippy::missing_errors_doc)]
pub fn simplify_html_with_options(html: &str, options: &Options) -> Result<String> {
    let (mut doc, _) = parse_repaired(html)?;
    simplify::simplify_document(&mut doc, options);
    Ok(doc.serialize())
}

/// Locate the main content of a page and return it simplified.
#[allow(clippy::missing_errors_doc)]
pub fn extract_main_content(html: &str) -> Result<String> {
    extract_main_content_with_options(html, &Options::default())
}

/// Locate the main content with custom options and return it simplified.
#[allow(clippy::missing_errors_doc)]
pub fn extract_main_content_with_options(html: &str, options: &Options) -> Result<String> {
    let (mut doc, _) = parse_repaired(html)?;
    let content = locator::locate(&doc, options);
    focus_on(&mut doc, content);
    simplify::simplify_document(&mut doc, options);
    Ok(doc.serialize())
}

/// Parse leniently, repairing fragment input by wrapping it in a document
/// shell and retrying once. A repaired parse keeps the original error for
/// the caller to log.
fn parse_repaired(html: &str) -> Result<(Document, Option<Error>)> {
    resilience::with_fallback(
        || Document::parse(html),
        || {
            let wrapped = format!("<html><head></head><body>{html}</body></html>");
            Document::parse(&wrapped)
        },
    )
}

/// Make `content` the sole child of the body, discarding siblings. A
/// located body is left alone.
fn focus_on(doc: &mut Document, content: dom::NodeId) {
    if content == doc.body() {
        return;
    }
    doc.detach(content);
    let others = doc.children(doc.body()).to_vec();
    for node in others {
        doc.remove(node);
    }
    doc.append_child(doc.body(), content);
}

/// Default cache geometry for [`ReadabilityEngine`].
const ENGINE_CACHE_CAPACITY: usize = 128;
const ENGINE_CACHE_TTL: Duration = Duration::from_secs(3600);
const ENGINE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// A configured extractor owning a result cache and site rules.
///
/// Repeated extraction of the same page body is served from the cache;
/// keys are content fingerprints plus the hostname, so per-host rules
/// never bleed across sites.
pub struct ReadabilityEngine {
    options: Options,
    site_rules: SiteRules,
    cache: LruTtlCache,
}

impl ReadabilityEngine {
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            options,
            site_rules: SiteRules::new(),
            cache: LruTtlCache::with_sweeper(
                ENGINE_CACHE_CAPACITY,
                ENGINE_CACHE_TTL,
                ENGINE_SWEEP_INTERVAL,
            ),
        }
    }

    /// Register site rules before the first extraction.
    pub fn site_rules_mut(&mut self) -> &mut SiteRules {
        &mut self.site_rules
    }

    /// Extract the simplified main content of `html`, applying any site
    /// rules registered for `hostname` first.
    #[allow(clippy::missing_errors_doc)]
    pub fn extract(&self, html: &str, hostname: Option<&str>) -> Result<String> {
        let key = match hostname {
            Some(host) => format!("{}:{host}", cache::fingerprint(html)),
            None => cache::fingerprint(html),
        };
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let (mut doc, _) = parse_repaired(html)?;
        if let Some(host) = hostname {
            self.site_rules.apply(&mut doc, host);
        }
        let content = locator::locate(&doc, &self.options);
        focus_on(&mut doc, content);
        simplify::simplify_document(&mut doc, &self.options);
        let out = doc.serialize();
        self.cache.put(key, out.clone());
        Ok(out)
    }

    /// Extract a batch of pages, in input order, fanning out over worker
    /// threads for large batches.
    #[must_use]
    pub fn extract_batch(&self, pages: &[String]) -> Vec<Result<String>> {
        parallel::parallel_map(pages, |page| self.extract(page, None))
    }

    /// Cache counters and occupancy.
    #[must_use]
    pub fn cache_stats(&self) -> cache::CacheStats {
        self.cache.stats()
    }
}
