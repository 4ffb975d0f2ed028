//! Detail extractor for provider pages

use crate::crawler::html::{element_text, first_text, parse_selector};
use crate::record::{not_available_list, ProviderDetails, NOT_AVAILABLE};
use crate::HarvestError;
use scraper::{Html, Selector};

const PHONE_SELECTOR: &str = "button[data-phone]";
const ADDRESS_SELECTOR: &str = ".practice-address";
const PRACTICE_NAME_SELECTOR: &str = ".practice-name";

/// Parses a provider's own page into phones, addresses and practice name
pub struct DetailExtractor {
    phone: Selector,
    address: Selector,
    practice_name: Selector,
}

impl DetailExtractor {
    pub fn new() -> Result<Self, HarvestError> {
        Ok(Self {
            phone: parse_selector(PHONE_SELECTOR)?,
            address: parse_selector(ADDRESS_SELECTOR)?,
            practice_name: parse_selector(PRACTICE_NAME_SELECTOR)?,
        })
    }

    /// Extracts details from a fetched page, or the all-sentinel default
    /// when the page could not be fetched
    pub fn extract(&self, html: Option<&str>) -> ProviderDetails {
        match html {
            Some(html) => self.extract_page(html),
            None => ProviderDetails::default(),
        }
    }

    fn extract_page(&self, html: &str) -> ProviderDetails {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let mut phone_numbers: Vec<String> = document
            .select(&self.phone)
            .filter_map(|button| button.value().attr("data-phone"))
            .map(|phone| phone.trim().to_string())
            .filter(|phone| !phone.is_empty())
            .collect();
        if phone_numbers.is_empty() {
            phone_numbers = not_available_list();
        }

        let mut addresses: Vec<String> = document
            .select(&self.address)
            .map(element_text)
            .filter(|address| !address.is_empty())
            .collect();
        if addresses.is_empty() {
            addresses = not_available_list();
        }

        let company_name =
            first_text(root, &self.practice_name).unwrap_or_else(|| NOT_AVAILABLE.to_string());

        ProviderDetails {
            phone_numbers,
            addresses,
            company_name,
        }
    }
}
