//! Small helpers shared by the page extractors

use crate::HarvestError;
use scraper::{ElementRef, Selector};

/// Parses a CSS selector, keeping the offending text in the error
pub(crate) fn parse_selector(css: &str) -> Result<Selector, HarvestError> {
    Selector::parse(css).map_err(|e| HarvestError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Collects an element's text with runs of whitespace collapsed to one space
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first descendant matching `selector`, if it has any
pub(crate) fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}
