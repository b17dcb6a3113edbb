//! HTML parser for extracting candidate image links
//!
//! This module scans a listing page for `<img src="...">` values and keeps
//! the ones pointing at the trusted image host. Scanning goes through the
//! `scraper` HTML5 tokenizer, so tag/attribute case, attribute order and
//! quoting style do not matter, and broken markup simply yields no match.

use rand::seq::SliceRandom;
use rand::Rng;
use scraper::{Html, Selector};
use url::Url;

/// Image information extracted from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Number of `<img>` elements seen, eligible or not
    pub image_count: usize,

    /// Eligible image URLs in document order, duplicates kept
    pub candidates: Vec<String>,
}

/// Parses HTML content and collects eligible image links
///
/// # Link Rules
///
/// **Include:**
/// - `src` of every `<img>` whose raw value contains `pattern`
///
/// **Exclude:**
/// - empty `src` values and `data:` URIs
/// - values that cannot be resolved against `base_url`
/// - values resolving to a non-HTTP(S) scheme
///
/// Candidates are the trimmed attribute values as written in the page, after
/// entity decoding. Resolution against `base_url` only decides whether a
/// value is fetchable; the saver resolves it again to build the request.
///
/// # Example
///
/// ```
/// use flower_images::harvest::parse_page;
/// use url::Url;
///
/// let html = r#"<p><img src="https://shop.example/images/rose.jpg"><img src="/logo.png"></p>"#;
/// let base_url = Url::parse("https://shop.example/").unwrap();
/// let parsed = parse_page(html, &base_url, "shop.example/images/");
/// assert_eq!(parsed.image_count, 2);
/// assert_eq!(parsed.candidates, vec!["https://shop.example/images/rose.jpg".to_string()]);
/// ```
pub fn parse_page(html: &str, base_url: &Url, pattern: &str) -> ParsedPage {
    let document = Html::parse_document(html);
    let mut image_count = 0;
    let mut candidates = Vec::new();

    if let Ok(img_selector) = Selector::parse("img") {
        for element in document.select(&img_selector) {
            image_count += 1;

            if let Some(src) = element.value().attr("src") {
                if let Some(link) = resolve_src(src, base_url, pattern) {
                    candidates.push(link);
                }
            }
        }
    }

    ParsedPage {
        image_count,
        candidates,
    }
}

/// Extracts eligible image links and returns them in random order
///
/// The order is a uniform permutation drawn from `rng`; pass `rand::rng()`
/// in production and a seeded generator in tests.
pub fn extract_candidates<R: Rng + ?Sized>(
    html: &str,
    base_url: &Url,
    pattern: &str,
    rng: &mut R,
) -> Vec<String> {
    let mut candidates = parse_page(html, base_url, pattern).candidates;
    candidates.shuffle(rng);
    candidates
}

/// Filters a single `src` value, returning it trimmed when eligible
fn resolve_src(src: &str, base_url: &Url, pattern: &str) -> Option<String> {
    let src = src.trim();

    if src.is_empty() || src.starts_with("data:") {
        return None;
    }

    if !src.contains(pattern) {
        return None;
    }

    let absolute_url = base_url.join(src).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }

    Some(src.to_string())
}
