//! Provider records and the intermediate harvest document
//!
//! A [`ProviderRecord`] is built in two steps: a [`ListingCard`] read from a
//! search-results page, then [`ProviderDetails`] read from the provider's own
//! page. [`ListingCard::merge`] combines them into the final record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder for any field that could not be extracted
pub const NOT_AVAILABLE: &str = "N/A";

/// The sentinel list used for phones and addresses
pub fn not_available_list() -> Vec<String> {
    vec![NOT_AVAILABLE.to_string()]
}

/// Returns true if the list is empty or exactly the sentinel list
pub fn is_sentinel_list(values: &[String]) -> bool {
    values.is_empty() || (values.len() == 1 && values[0] == NOT_AVAILABLE)
}

/// A fully merged provider, as written to the intermediate file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRecord {
    #[serde(rename = "Provider Name")]
    pub name: String,

    #[serde(rename = "Company Name")]
    pub company_name: String,

    #[serde(rename = "Number of Locations")]
    pub num_locations: u32,

    #[serde(rename = "Location Addresses")]
    pub location_addresses: Vec<String>,

    #[serde(rename = "Phone Number")]
    pub phone_numbers: Vec<String>,

    #[serde(rename = "Website Link")]
    pub website_link: String,
}

/// Partial record read from one provider card on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCard {
    pub name: String,
    pub company_name: String,
    /// Absolute URL of the provider page, or the sentinel
    pub website_link: String,
    /// Phones printed directly on the card, if any
    pub phone_numbers: Vec<String>,
    /// Addresses printed directly on the card, if any
    pub location_addresses: Vec<String>,
}

impl ListingCard {
    /// Returns true if the card links to a detail page worth fetching
    pub fn has_detail_page(&self) -> bool {
        self.website_link != NOT_AVAILABLE
    }

    /// Merges detail-page fields into this card
    ///
    /// Detail phones and addresses win when they were extracted; otherwise
    /// whatever the card itself carried is kept; otherwise the sentinel.
    /// The detail page's practice name replaces the card's specialty when found.
    pub fn merge(self, details: ProviderDetails) -> ProviderRecord {
        let phone_numbers = pick_list(details.phone_numbers, self.phone_numbers);
        let location_addresses = pick_list(details.addresses, self.location_addresses);

        let num_locations = if is_sentinel_list(&location_addresses) {
            0
        } else {
            location_addresses.len() as u32
        };

        let company_name = if details.company_name != NOT_AVAILABLE {
            details.company_name
        } else {
            self.company_name
        };

        ProviderRecord {
            name: self.name,
            company_name,
            num_locations,
            location_addresses,
            phone_numbers,
            website_link: self.website_link,
        }
    }
}

fn pick_list(preferred: Vec<String>, fallback: Vec<String>) -> Vec<String> {
    if !is_sentinel_list(&preferred) {
        preferred
    } else if !is_sentinel_list(&fallback) {
        fallback
    } else {
        not_available_list()
    }
}

/// Contact fields read from a provider's detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDetails {
    pub phone_numbers: Vec<String>,
    pub addresses: Vec<String>,
    pub company_name: String,
}

impl Default for ProviderDetails {
    /// The all-sentinel result used when a detail page is unavailable
    fn default() -> Self {
        Self {
            phone_numbers: not_available_list(),
            addresses: not_available_list(),
            company_name: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Per-card extraction result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
    Extracted(ListingCard),
    Skipped { index: usize, reason: String },
}

/// Records grouped by the search keyword they were crawled under
pub type DepartmentGroup = BTreeMap<String, Vec<ProviderRecord>>;

/// The intermediate document written by a crawl and read by the loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Harvest {
    Flat(Vec<ProviderRecord>),
    ByDepartment(DepartmentGroup),
}

impl Harvest {
    /// Total number of records across all groups
    pub fn record_count(&self) -> usize {
        match self {
            Self::Flat(records) => records.len(),
            Self::ByDepartment(groups) => groups.values().map(Vec::len).sum(),
        }
    }

    /// Number of keywords crawled (1 for a flat harvest)
    pub fn group_count(&self) -> usize {
        match self {
            Self::Flat(_) => 1,
            Self::ByDepartment(groups) => groups.len(),
        }
    }
}
