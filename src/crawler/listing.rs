//! Listing extractor for search-results pages
//!
//! Each provider card yields a [`CardOutcome`]. Missing fields become the
//! "N/A" sentinel; a card is only skipped when its website link cannot be
//! turned into an absolute http(s) URL, and a skip never affects its siblings.
//! Relative links resolve against the results page they appear on.

use crate::crawler::html::{element_text, first_text, parse_selector};
use crate::record::{CardOutcome, ListingCard, NOT_AVAILABLE};
use crate::HarvestError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const CARD_SELECTOR: &str = "article.search-results__providers-provider";
const NAME_SELECTOR: &str = ".provider-name";
const SPECIALTY_SELECTOR: &str = ".provider-specialty";
const LINK_SELECTOR: &str = "a.article-link";
const PHONE_SELECTOR: &str = "button[data-phone]";
const ADDRESS_SELECTOR: &str = ".practice-address";

/// Parses search-results pages into listing cards
pub struct ListingExtractor {
    card: Selector,
    name: Selector,
    specialty: Selector,
    link: Selector,
    phone: Selector,
    address: Selector,
}

impl ListingExtractor {
    pub fn new() -> Result<Self, HarvestError> {
        Ok(Self {
            card: parse_selector(CARD_SELECTOR)?,
            name: parse_selector(NAME_SELECTOR)?,
            specialty: parse_selector(SPECIALTY_SELECTOR)?,
            link: parse_selector(LINK_SELECTOR)?,
            phone: parse_selector(PHONE_SELECTOR)?,
            address: parse_selector(ADDRESS_SELECTOR)?,
        })
    }

    /// Extracts one outcome per provider card, in document order
    ///
    /// An empty vector means the page had no cards at all.
    pub fn extract(&self, html: &str, page_url: &Url) -> Vec<CardOutcome> {
        let document = Html::parse_document(html);

        document
            .select(&self.card)
            .enumerate()
            .map(|(index, card)| self.extract_card(index, card, page_url))
            .collect()
    }

    fn extract_card(&self, index: usize, card: ElementRef<'_>, page_url: &Url) -> CardOutcome {
        let name = first_text(card, &self.name).unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let company_name =
            first_text(card, &self.specialty).unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let href = card
            .select(&self.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty());

        let website_link = match href {
            None => NOT_AVAILABLE.to_string(),
            Some(href) => match resolve_link(page_url, href) {
                Ok(url) => url,
                Err(reason) => return CardOutcome::Skipped { index, reason },
            },
        };

        let phone_numbers = card
            .select(&self.phone)
            .filter_map(|el| el.value().attr("data-phone"))
            .map(|phone| phone.trim().to_string())
            .filter(|phone| !phone.is_empty())
            .collect();

        let location_addresses = card
            .select(&self.address)
            .map(element_text)
            .filter(|address| !address.is_empty())
            .collect();

        CardOutcome::Extracted(ListingCard {
            name,
            company_name,
            website_link,
            phone_numbers,
            location_addresses,
        })
    }
}

/// Resolves a card's href against the results page URL, keeping only http(s)
fn resolve_link(page_url: &Url, href: &str) -> Result<String, String> {
    let url = page_url
        .join(href)
        .map_err(|e| format!("unresolvable website link '{}': {}", href, e))?;

    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        scheme => Err(format!(
            "website link '{}' has unsupported scheme '{}'",
            href, scheme
        )),
    }
}

/// Splits outcomes into extracted cards, logging each skipped one
pub fn partition_outcomes(outcomes: Vec<CardOutcome>, page_url: &str) -> (Vec<ListingCard>, usize) {
    let mut cards = Vec::with_capacity(outcomes.len());
    let mut skipped = 0;

    for outcome in outcomes {
        match outcome {
            CardOutcome::Extracted(card) => cards.push(card),
            CardOutcome::Skipped { index, reason } => {
                tracing::warn!(url = %page_url, card = index, "Skipping provider card: {}", reason);
                skipped += 1;
            }
        }
    }

    (cards, skipped)
}
