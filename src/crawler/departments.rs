//! Department enumerator
//!
//! Reads the category links in the site navigation and turns each label into
//! the keyword the search endpoint expects. The directory lists categories in
//! the plural ("Dentists") but searches by the singular ("Dentist").

use crate::config::DepartmentsConfig;
use crate::crawler::html::{element_text, parse_selector};
use crate::HarvestError;
use scraper::{Html, Selector};
use std::collections::{BTreeMap, BTreeSet};

/// Navigation label -> search keyword
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("Physical Therapists", "Physical Therapist"),
    ("Chiropractors", "Chiropractor"),
    ("Dentists", "Dentist"),
    ("Dermatologists", "Dermatologist"),
    ("Psychologists", "Psychologist"),
    ("Psychiatrists", "Psychiatrist"),
    ("Therapists", "Therapist"),
    ("Counselors", "Counselor"),
    ("Pediatricians", "Pediatrician"),
    ("Optometrists", "Optometrist"),
    ("Podiatrists", "Podiatrist"),
    ("Acupuncturists", "Acupuncturist"),
    ("Nutritionists", "Nutritionist"),
    ("Massage Therapists", "Massage Therapist"),
    ("Primary Care Doctors", "Primary Care Doctor"),
    ("OB-GYNs", "OB-GYN"),
];

/// Discovers the department keywords to crawl
pub struct DepartmentEnumerator {
    link: Selector,
    exclude: Vec<String>,
    aliases: BTreeMap<String, String>,
}

impl DepartmentEnumerator {
    /// Builds an enumerator from configuration
    ///
    /// Configured aliases are layered over the built-in table and win on
    /// conflicts.
    pub fn from_config(config: &DepartmentsConfig) -> Result<Self, HarvestError> {
        let mut aliases: BTreeMap<String, String> = DEFAULT_ALIASES
            .iter()
            .map(|(label, keyword)| (label.to_string(), keyword.to_string()))
            .collect();
        aliases.extend(config.aliases.clone());

        Ok(Self {
            link: parse_selector(&config.nav_selector)?,
            exclude: config.exclude.iter().map(|e| e.trim().to_lowercase()).collect(),
            aliases,
        })
    }

    /// Maps a navigation label to its search keyword
    ///
    /// Labels without a mapping pass through unchanged.
    pub fn map_keyword(&self, label: &str) -> String {
        self.aliases
            .get(label)
            .cloned()
            .unwrap_or_else(|| label.to_string())
    }

    /// A label is excluded only when the whole label, ignoring case and
    /// surrounding symbols such as arrows, equals an exclude term
    fn is_excluded(&self, label: &str) -> bool {
        let lower = label.to_lowercase();
        let bare = lower.trim_matches(|c: char| !c.is_alphanumeric());
        self.exclude.iter().any(|term| bare == term)
    }

    /// Extracts the set of department keywords from a navigation page
    pub fn extract(&self, html: &str) -> BTreeSet<String> {
        let document = Html::parse_document(html);

        let labels: BTreeSet<String> = document
            .select(&self.link)
            .map(element_text)
            .filter(|label| !label.is_empty())
            .filter(|label| !self.is_excluded(label))
            .collect();

        labels.iter().map(|label| self.map_keyword(label)).collect()
    }

    /// Applies the keyword mapping to an explicit list, dropping duplicates
    pub fn normalize(&self, keywords: &[String]) -> BTreeSet<String> {
        keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(|k| self.map_keyword(k))
            .collect()
    }
}
