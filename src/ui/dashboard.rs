// src/ui/dashboard.rs
use super::header::{Header, HeaderAction, HeaderEvent, SearchBar, SearchQuery};
use super::router::Route;
use crate::jobs::{JobPosting, JobSource};
use tracing::{info, warn};

pub const DEFAULT_RESULT_LIMIT: u32 = 10;

#[derive(Debug)]
pub struct DashboardPage {
    header: Header,
    results: Vec<JobPosting>,
    error: Option<String>,
    limit: u32,
    searches: u64,
}

impl Default for DashboardPage {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardPage {
    pub fn new() -> Self {
        Self {
            header: Header::with_search(Route::Dashboard, SearchBar::new()),
            results: Vec::new(),
            error: None,
            limit: DEFAULT_RESULT_LIMIT,
            searches: 0,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub fn results(&self) -> &[JobPosting] {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Searches that actually reached the job source
    pub fn searches(&self) -> u64 {
        self.searches
    }

    pub fn is_loading(&self) -> bool {
        self.header.search().is_some_and(SearchBar::is_loading)
    }

    /// Feed a header event; a submitted query runs against `source`.
    /// Navigation requests are returned to the caller.
    pub async fn handle(&mut self, event: HeaderEvent, source: &dyn JobSource) -> Option<Route> {
        match self.header.handle(event)? {
            HeaderAction::Search(query) => {
                self.run_search(&query, source).await;
                None
            }
            HeaderAction::Navigate(route) => Some(route),
        }
    }

    pub async fn run_search(&mut self, query: &SearchQuery, source: &dyn JobSource) {
        if let Some(bar) = self.header.search_mut() {
            bar.set_loading(true);
        }
        self.searches += 1;

        let params = query.to_params(self.limit);
        match source.search(&params).await {
            Ok(jobs) => {
                info!("Dashboard search returned {} jobs", jobs.len());
                self.results = jobs;
                self.error = None;
            }
            Err(e) => {
                warn!("Dashboard search failed: {}", e);
                self.results.clear();
                self.error = Some(e.to_string());
            }
        }

        if let Some(bar) = self.header.search_mut() {
            bar.set_loading(false);
        }
    }
}
