//! Small DOM helpers shared by the site extractors
//!
//! Text helpers follow the same rule throughout: every text node is trimmed,
//! empty nodes are dropped, and the rest are concatenated (or joined by
//! newlines for the `_lines` variants).

use crate::date::GregorianTimestamp;
use chrono::{DateTime, NaiveDate};
use scraper::{ElementRef, Node, Selector};
use url::Url;

/// First element under `scope` matching `css`
pub fn first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    let found = scope.select(&selector).next();
    found
}

/// Every element under `scope` matching `css`, in document order
pub fn all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// First match among several selectors, tried in order
pub fn first_of<'a>(scope: ElementRef<'a>, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|css| first(scope, css))
}

/// Trimmed text nodes of an element, concatenated
pub fn text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Trimmed text nodes of an element, one per line
pub fn text_lines(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text of an element, skipping everything inside descendants named `tag`
pub fn text_excluding(element: ElementRef<'_>, tag: &str) -> String {
    let mut parts = Vec::new();
    collect_text_excluding(element, tag, &mut parts);
    parts.concat()
}

fn collect_text_excluding(element: ElementRef<'_>, tag: &str, parts: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(t) => {
                let t = t.trim();
                if !t.is_empty() {
                    parts.push(t.to_string());
                }
            }
            Node::Element(e) if e.name() != tag => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text_excluding(child, tag, parts);
                }
            }
            _ => {}
        }
    }
}

/// Text of the first match, if it has any
pub fn first_text(scope: ElementRef<'_>, css: &str) -> Option<String> {
    first(scope, css).map(text).filter(|t| !t.is_empty())
}

/// Trimmed, non-empty attribute value
pub fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Non-empty texts of the `p` elements under `scope`
pub fn paragraphs(scope: ElementRef<'_>) -> Vec<String> {
    all(scope, "p")
        .into_iter()
        .map(text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Makes a root-relative resource path absolute against `origin`
///
/// Anything not starting with `/` is returned unchanged.
pub fn absolutize(src: &str, origin: &Url) -> String {
    if src.starts_with('/') && !src.starts_with("//") {
        if let Ok(joined) = origin.join(src) {
            return joined.to_string();
        }
    }
    src.to_string()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// At most `max` characters of `text`
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Lead built from the opening of a body, as `first 200 chars...`
pub fn lead(text: &str) -> String {
    format!("{}...", truncate_chars(text, 200))
}

/// Formats an ISO 8601 timestamp as `YYYY-MM-DD HH:MM:SS`
///
/// The wall-clock time printed by the site is kept, the offset is dropped.
/// A bare date (or a datetime whose time part does not parse) becomes
/// midnight of that date.
pub fn iso_timestamp(value: &str) -> Option<String> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(GregorianTimestamp::new(parsed.naive_local()).to_string());
    }

    let date_part = value.split('T').next()?;
    let date = NaiveDate::parse_from_str(date_part.trim(), "%Y-%m-%d").ok()?;
    Some(GregorianTimestamp::new(date.and_hms_opt(0, 0, 0)?).to_string())
}

/// Joins a path onto a base URL, tolerating slashes on either side
pub fn join_url(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
