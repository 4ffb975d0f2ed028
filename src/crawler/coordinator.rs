//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives the crawl:
//! - Enumerating the keywords to search (discovered departments or one flat keyword)
//! - Paging through search results for each keyword, one page at a time
//! - Fetching detail pages for every listing on a page as one joined batch
//! - Merging listing and detail fields and writing the intermediate file
//!
//! All department crawls run concurrently on the current task and share one
//! [`Fetcher`], so the admission gate bounds in-flight requests globally.

use crate::config::{Config, CrawlMode};
use crate::crawler::departments::DepartmentEnumerator;
use crate::crawler::detail::DetailExtractor;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::listing::{partition_outcomes, ListingExtractor};
use crate::output::{write_harvest, CrawlReport};
use crate::record::{DepartmentGroup, Harvest, ListingCard, ProviderRecord};
use crate::HarvestError;
use chrono::Utc;
use futures::future::join_all;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

/// Why a keyword's pagination stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A results page contained no provider cards
    EmptyPage,
    /// A results page could not be fetched; indistinguishable from end of data
    FetchFailed,
    /// The configured `max-results` offset was reached
    LimitReached,
}

/// Pagination state for one keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCursor {
    Fetching { start: u32 },
    Done(StopReason),
}

/// Counters shared by every concurrent keyword crawl
#[derive(Debug, Default)]
struct CrawlCounters {
    pages_fetched: AtomicU64,
    detail_pages_fetched: AtomicU64,
    fetch_failures: AtomicU64,
    cards_skipped: AtomicU64,
}

/// Snapshot of the crawl counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlCounts {
    pub pages_fetched: u64,
    pub detail_pages_fetched: u64,
    pub fetch_failures: u64,
    pub cards_skipped: u64,
}

impl CrawlCounters {
    fn snapshot(&self) -> CrawlCounts {
        CrawlCounts {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            detail_pages_fetched: self.detail_pages_fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            cards_skipped: self.cards_skipped.load(Ordering::Relaxed),
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    config_hash: String,
    fetcher: Fetcher,
    base_url: Url,
    search_url: Url,
    listings: ListingExtractor,
    details: DetailExtractor,
    departments: DepartmentEnumerator,
    counters: CrawlCounters,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `config_hash` - Hash of the configuration file, stamped on the report
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - Bad base URL, selector, or HTTP client setup
    pub fn new(config: Config, config_hash: impl Into<String>) -> Result<Self, HarvestError> {
        let base_url = Url::parse(&config.site.base_url)?;
        let search_url = base_url.join(&config.site.search_path)?;
        let fetcher = Fetcher::new(&config)?;
        let listings = ListingExtractor::new()?;
        let details = DetailExtractor::new()?;
        let departments = DepartmentEnumerator::from_config(&config.departments)?;

        Ok(Self {
            config,
            config_hash: config_hash.into(),
            fetcher,
            base_url,
            search_url,
            listings,
            details,
            departments,
            counters: CrawlCounters::default(),
        })
    }

    /// Current counter values
    pub fn counts(&self) -> CrawlCounts {
        self.counters.snapshot()
    }

    /// Builds the search URL for one keyword at one offset
    pub fn search_page_url(&self, keyword: &str, start: u32) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("type", &self.config.site.search_type)
            .append_pair("keyword", keyword)
            .append_pair("lookup", &self.config.site.lookup)
            .append_pair("start", &start.to_string());
        url
    }

    /// Runs the crawl and writes the intermediate file
    pub async fn run(&self) -> Result<CrawlReport, HarvestError> {
        let started_at = Utc::now();
        tracing::info!(mode = ?self.config.crawler.mode, "Starting crawl");

        let harvest = self.harvest().await;

        let output_path = Path::new(&self.config.output.json_path);
        write_harvest(output_path, &harvest)?;
        tracing::info!(
            records = harvest.record_count(),
            path = %output_path.display(),
            "Saved harvest"
        );

        let counts = self.counts();
        Ok(CrawlReport {
            config_hash: self.config_hash.clone(),
            started_at,
            finished_at: Utc::now(),
            mode: self.config.crawler.mode,
            keywords: harvest.group_count(),
            records: harvest.record_count(),
            pages_fetched: counts.pages_fetched,
            detail_pages_fetched: counts.detail_pages_fetched,
            fetch_failures: counts.fetch_failures,
            cards_skipped: counts.cards_skipped,
            output_path: self.config.output.json_path.clone(),
        })
    }

    /// Crawls every keyword and returns the merged records
    pub async fn harvest(&self) -> Harvest {
        match self.config.crawler.mode {
            CrawlMode::Flat => Harvest::Flat(self.crawl_keyword(&self.config.site.keyword).await),
            CrawlMode::Departments => {
                let keywords = self.discover_departments().await;
                tracing::info!(departments = keywords.len(), "Crawling departments");

                let crawls = keywords.iter().map(|keyword| async move {
                    let records = self.crawl_keyword(keyword).await;
                    (keyword.clone(), records)
                });

                let groups: DepartmentGroup = join_all(crawls).await.into_iter().collect();
                Harvest::ByDepartment(groups)
            }
        }
    }

    /// Returns the department keywords to crawl
    ///
    /// An explicit keyword list in the configuration takes precedence over
    /// discovery. A failed navigation fetch yields an empty set.
    pub async fn discover_departments(&self) -> BTreeSet<String> {
        if !self.config.departments.keywords.is_empty() {
            return self.departments.normalize(&self.config.departments.keywords);
        }

        let nav_url = match self.base_url.join(&self.config.departments.nav_path) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Invalid navigation path {}: {}", self.config.departments.nav_path, e);
                return BTreeSet::new();
            }
        };

        let Some(html) = self.fetch_counted(nav_url.as_str()).await else {
            tracing::warn!(url = %nav_url, "Navigation page unavailable, no departments discovered");
            return BTreeSet::new();
        };

        let departments = self.departments.extract(&html);
        if departments.is_empty() {
            tracing::warn!(url = %nav_url, "No department links matched the navigation selector");
        } else {
            tracing::debug!(?departments, "Discovered departments");
        }
        departments
    }

    /// Pages through search results for one keyword until a page is empty,
    /// a fetch fails, or the offset limit is reached
    pub async fn crawl_keyword(&self, keyword: &str) -> Vec<ProviderRecord> {
        let mut records = Vec::new();
        let mut cursor = PageCursor::Fetching { start: 0 };

        loop {
            let start = match cursor {
                PageCursor::Fetching { start } => start,
                PageCursor::Done(reason) => {
                    tracing::info!(
                        keyword = %keyword,
                        records = records.len(),
                        reason = ?reason,
                        "Finished keyword"
                    );
                    break;
                }
            };

            cursor = self.crawl_page(keyword, start, &mut records).await;
        }

        records
    }

    /// Fetches one results page, resolves its listings, and returns the next cursor
    async fn crawl_page(
        &self,
        keyword: &str,
        start: u32,
        records: &mut Vec<ProviderRecord>,
    ) -> PageCursor {
        if let Some(limit) = self.config.crawler.max_results {
            if start >= limit {
                return PageCursor::Done(StopReason::LimitReached);
            }
        }

        let page_url = self.search_page_url(keyword, start);
        let Some(html) = self.fetch_counted(page_url.as_str()).await else {
            return PageCursor::Done(StopReason::FetchFailed);
        };

        let outcomes = self.listings.extract(&html, &page_url);
        if outcomes.is_empty() {
            return PageCursor::Done(StopReason::EmptyPage);
        }

        let (cards, skipped) = partition_outcomes(outcomes, page_url.as_str());
        self.counters
            .cards_skipped
            .fetch_add(skipped as u64, Ordering::Relaxed);

        tracing::info!(
            keyword = %keyword,
            start = start,
            listings = cards.len(),
            "Fetched results page"
        );

        let merged = self.resolve_cards(cards).await;
        records.extend(merged);

        match start.checked_add(self.config.crawler.page_size) {
            Some(next) => PageCursor::Fetching { start: next },
            None => PageCursor::Done(StopReason::LimitReached),
        }
    }

    /// Fetches detail pages for a batch of cards concurrently and merges them
    ///
    /// The batch completes when every detail fetch has finished or timed out.
    pub async fn resolve_cards(&self, cards: Vec<ListingCard>) -> Vec<ProviderRecord> {
        let fetches = cards.into_iter().map(|card| async move {
            let html = if card.has_detail_page() {
                let body = self.fetch_counted(&card.website_link).await;
                if body.is_some() {
                    self.counters
                        .detail_pages_fetched
                        .fetch_add(1, Ordering::Relaxed);
                }
                body
            } else {
                None
            };

            let details = self.details.extract(html.as_deref());
            card.merge(details)
        });

        join_all(fetches).await
    }

    async fn fetch_counted(&self, url: &str) -> Option<String> {
        let result = self.fetcher.fetch(url).await;
        let counter = if result.is_success() {
            &self.counters.pages_fetched
        } else {
            &self.counters.fetch_failures
        };
        counter.fetch_add(1, Ordering::Relaxed);
        result.into_body()
    }
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use provider_harvest::config::load_config_with_hash;
/// use provider_harvest::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("harvest.toml"))?;
/// let report = run_crawl(config, hash).await?;
/// println!("{} records", report.records);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, config_hash: String) -> Result<CrawlReport, HarvestError> {
    let coordinator = Coordinator::new(config, config_hash)?;
    coordinator.run().await
}
