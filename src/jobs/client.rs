// src/jobs/client.rs
use super::extract::parse_job_cards;
use super::locations::LocationTable;
use super::types::{JobPosting, JobSearchParams, PAGE_SIZE};
use super::{JobSource, SearchError};
use crate::config::LinkedinSettings;
use anyhow::{Context, Result};
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{error, info, warn};

pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// One HTTP GET; status handling is left to the caller
#[rocket::async_trait]
pub trait PageTransport: Send + Sync {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<TransportResponse>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(settings: &LinkedinSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .default_headers(headers)
            .timeout(settings.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[rocket::async_trait]
impl PageTransport for ReqwestTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<TransportResponse> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;
        Ok(TransportResponse { status, body })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub rate_limit_cooldown: Duration,
}

impl RetryPolicy {
    pub fn from_settings(settings: &LinkedinSettings) -> Self {
        let min_delay = Duration::from_millis(settings.min_delay_ms);
        Self {
            retries: settings.retries.max(1),
            min_delay,
            max_delay: Duration::from_millis(settings.max_delay_ms).max(min_delay),
            rate_limit_cooldown: Duration::from_millis(settings.rate_limit_cooldown_ms),
        }
    }

    /// Random pause before each request, uniform in `[min_delay, max_delay]`
    pub fn jitter(&self) -> Duration {
        let min = self.min_delay.as_millis() as u64;
        let max = (self.max_delay.as_millis() as u64).max(min);
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Page(String),
    NotFound,
    Exhausted,
}

pub struct LinkedinJobClient<T = ReqwestTransport> {
    transport: T,
    search_url: String,
    policy: RetryPolicy,
    locations: LocationTable,
}

impl LinkedinJobClient<ReqwestTransport> {
    pub fn from_settings(settings: &LinkedinSettings) -> Result<Self> {
        Ok(Self::with_transport(
            ReqwestTransport::new(settings)?,
            settings,
        ))
    }
}

impl<T: PageTransport> LinkedinJobClient<T> {
    pub fn with_transport(transport: T, settings: &LinkedinSettings) -> Self {
        Self {
            transport,
            search_url: settings.search_url.clone(),
            policy: RetryPolicy::from_settings(settings),
            locations: LocationTable::new(&settings.locations),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build_query(&self, params: &JobSearchParams, start: u32) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(keywords) = params.keywords() {
            query.push(("keywords".to_string(), keywords.to_string()));
        }
        if let Some(location) = params.location() {
            query.push(("location".to_string(), location.to_string()));
            if let Some(ids) = self.locations.lookup(location) {
                query.push(("geoId".to_string(), ids.geo_id.to_string()));
                if !ids.populated_places.is_empty() {
                    let places = ids
                        .populated_places
                        .iter()
                        .map(u64::to_string)
                        .collect::<Vec<_>>()
                        .join(",");
                    query.push(("f_PP".to_string(), places));
                }
            }
        }
        if let Some(seconds) = params.time_filter {
            query.push(("f_TPR".to_string(), format!("r{}", seconds)));
        }
        query.push(("sortBy".to_string(), params.sort_by.as_str().to_string()));
        query.push(("start".to_string(), start.to_string()));
        query
    }

    /// GET with a random delay before every attempt, a cooldown on 429 and
    /// no retry on 404.
    pub async fn fetch_with_retries(&self, query: &[(String, String)]) -> FetchOutcome {
        let attempts = self.policy.retries.max(1);

        for attempt in 1..=attempts {
            let delay = self.policy.jitter();
            if !delay.is_zero() {
                info!("Sleeping for {:.2}s before requesting...", delay.as_secs_f64());
                tokio::time::sleep(delay).await;
            }

            info!(
                "Fetching URL: {} (Attempt {}/{})",
                self.search_url, attempt, attempts
            );

            match self.transport.get(&self.search_url, query).await {
                Ok(response) if response.status == 429 => {
                    warn!(
                        "Rate limit hit (429). Cooling down for {}s...",
                        self.policy.rate_limit_cooldown.as_secs()
                    );
                    tokio::time::sleep(self.policy.rate_limit_cooldown).await;
                }
                Ok(response) if response.status == 404 => {
                    error!("HTTP error: 404 for {}", self.search_url);
                    return FetchOutcome::NotFound;
                }
                Ok(response) if (200..300).contains(&response.status) => {
                    return FetchOutcome::Page(response.body);
                }
                Ok(response) => {
                    error!("HTTP error: {}", response.status);
                }
                Err(e) => {
                    error!("Connection error: {:#}", e);
                }
            }
        }

        error!(
            "Failed to fetch {} after {} attempts.",
            self.search_url, attempts
        );
        FetchOutcome::Exhausted
    }

    pub async fn get_jobs(&self, params: &JobSearchParams) -> Result<Vec<JobPosting>, SearchError> {
        params.validate()?;

        let limit = params.limit as usize;
        let mut jobs: Vec<JobPosting> = Vec::with_capacity(limit);
        let mut seen = HashSet::new();
        let mut start = params.start;

        info!(
            "Getting {} jobs for location: {:?} with keywords: {:?}",
            limit,
            params.location(),
            params.keywords()
        );

        while jobs.len() < limit {
            let query = self.build_query(params, start);
            match self.fetch_with_retries(&query).await {
                FetchOutcome::Page(body) => {
                    let before = jobs.len();
                    for job in parse_job_cards(&body) {
                        if seen.insert(job.job_id.clone()) {
                            jobs.push(job);
                        }
                    }
                    if jobs.len() == before {
                        info!("No new jobs at offset {}, stopping", start);
                        break;
                    }
                }
                FetchOutcome::NotFound => break,
                FetchOutcome::Exhausted if jobs.is_empty() => {
                    return Err(SearchError::Upstream(format!(
                        "no response from job listings after {} attempts",
                        self.policy.retries.max(1)
                    )));
                }
                FetchOutcome::Exhausted => {
                    warn!(
                        "Returning {} partial results after failed page at offset {}",
                        jobs.len(),
                        start
                    );
                    break;
                }
            }
            start = match start.checked_add(PAGE_SIZE) {
                Some(next) => next,
                None => {
                    info!("Offset {} is the last addressable page, stopping", start);
                    break;
                }
            };
        }

        jobs.truncate(limit);
        info!(
            "Found {} jobs for location: {:?} with keywords: {:?}",
            jobs.len(),
            params.location(),
            params.keywords()
        );
        Ok(jobs)
    }
}

#[rocket::async_trait]
impl<T: PageTransport> JobSource for LinkedinJobClient<T> {
    async fn search(&self, params: &JobSearchParams) -> Result<Vec<JobPosting>, SearchError> {
        self.get_jobs(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocationIds;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<TransportResponse>>>,
        queries: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl ScriptedTransport {
        fn reply(self, status: u16, body: impl Into<String>) -> Self {
            self.replies.lock().unwrap().push_back(Ok(TransportResponse {
                status,
                body: body.into(),
            }));
            self
        }

        fn fail(self) -> Self {
            self.replies
                .lock()
                .unwrap()
                .push_back(Err(anyhow::anyhow!("connection reset")));
            self
        }

        fn calls(&self) -> usize {
            self.queries.lock().unwrap().len()
        }

        fn start_of(&self, call: usize) -> String {
            self.queries.lock().unwrap()[call]
                .iter()
                .find(|(k, _)| k == "start")
                .map(|(_, v)| v.clone())
                .unwrap()
        }
    }

    #[rocket::async_trait]
    impl PageTransport for ScriptedTransport {
        async fn get(&self, _url: &str, query: &[(String, String)]) -> Result<TransportResponse> {
            self.queries.lock().unwrap().push(query.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(TransportResponse { status: 200, body: String::new() }))
        }
    }

    fn page(ids: std::ops::Range<u64>) -> String {
        ids.map(|id| {
            format!(
                r#"<li><div class="base-card" data-entity-urn="urn:li:jobPosting:{id}">
                <a class="base-card__full-link" href="https://www.linkedin.com/jobs/view/{id}?refId=x"></a>
                <h3 class="base-search-card__title">Job {id}</h3></div></li>"#
            )
        })
        .collect()
    }

    fn settings() -> LinkedinSettings {
        let mut settings = LinkedinSettings::default();
        settings.locations.insert(
            "Denmark".to_string(),
            LocationIds {
                geo_id: 104514075,
                populated_places: vec![11, 22],
            },
        );
        settings
    }

    fn no_delay(retries: u32) -> RetryPolicy {
        RetryPolicy {
            retries,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            rate_limit_cooldown: Duration::ZERO,
        }
    }

    fn client(transport: ScriptedTransport) -> LinkedinJobClient<ScriptedTransport> {
        LinkedinJobClient::with_transport(transport, &settings()).with_policy(no_delay(3))
    }

    #[test]
    fn test_build_query_with_known_location() {
        let client = client(ScriptedTransport::default());
        let mut params = JobSearchParams::new("Machine Learning Engineer", "denmark");
        params.time_filter = Some(86_400);
        params.sort_by = crate::jobs::SortBy::DD;

        let query = client.build_query(&params, 20);
        let get = |key: &str| {
            query
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("keywords"), Some("Machine Learning Engineer"));
        assert_eq!(get("location"), Some("denmark"));
        assert_eq!(get("geoId"), Some("104514075"));
        assert_eq!(get("f_PP"), Some("11,22"));
        assert_eq!(get("f_TPR"), Some("r86400"));
        assert_eq!(get("sortBy"), Some("DD"));
        assert_eq!(get("start"), Some("20"));
    }

    #[test]
    fn test_build_query_with_unknown_location() {
        let client = client(ScriptedTransport::default());
        let query = client.build_query(&JobSearchParams::new("Rust", "Atlantis"), 0);
        assert!(query.iter().any(|(k, v)| k == "location" && v == "Atlantis"));
        assert!(!query.iter().any(|(k, _)| k == "geoId" || k == "f_PP"));
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let policy = RetryPolicy {
            retries: 1,
            min_delay: Duration::from_millis(2_000),
            max_delay: Duration::from_millis(5_000),
            rate_limit_cooldown: Duration::ZERO,
        };
        for _ in 0..100 {
            let delay = policy.jitter();
            assert!(delay >= policy.min_delay && delay <= policy.max_delay);
        }
    }

    #[tokio::test]
    async fn test_paginates_until_limit() {
        let transport = ScriptedTransport::default()
            .reply(200, page(0..10))
            .reply(200, page(10..20))
            .reply(200, page(20..30));
        let client = client(transport);

        let jobs = client
            .get_jobs(&JobSearchParams::new("Rust", "Denmark").with_limit(15))
            .await
            .unwrap();

        assert_eq!(jobs.len(), 15);
        assert_eq!(jobs[14].job_id, "14");
        assert_eq!(jobs[0].url, "https://www.linkedin.com/jobs/view/0");
        assert_eq!(client.transport.calls(), 2);
        assert_eq!(client.transport.start_of(0), "0");
        assert_eq!(client.transport.start_of(1), "10");
    }

    #[tokio::test]
    async fn test_stops_on_empty_page() {
        let transport = ScriptedTransport::default()
            .reply(200, page(0..4))
            .reply(200, "<html></html>");
        let client = client(transport);

        let jobs = client
            .get_jobs(&JobSearchParams::new("Rust", "Denmark").with_limit(50))
            .await
            .unwrap();
        assert_eq!(jobs.len(), 4);
        assert_eq!(client.transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_stops_when_page_repeats() {
        let transport = ScriptedTransport::default()
            .reply(200, page(0..10))
            .reply(200, page(0..10));
        let client = client(transport);

        let jobs = client
            .get_jobs(&JobSearchParams::new("Rust", "Denmark").with_limit(30))
            .await
            .unwrap();
        assert_eq!(jobs.len(), 10);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let transport = ScriptedTransport::default().reply(404, "");
        let client = client(transport);

        assert_eq!(client.fetch_with_retries(&[]).await, FetchOutcome::NotFound);
        assert_eq!(client.transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_retries_server_and_connection_errors() {
        let transport = ScriptedTransport::default()
            .reply(500, "oops")
            .fail()
            .reply(200, "body");
        let client = client(transport);

        assert_eq!(
            client.fetch_with_retries(&[]).await,
            FetchOutcome::Page("body".to_string())
        );
        assert_eq!(client.transport.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_cools_down_and_counts_as_attempt() {
        let transport = ScriptedTransport::default().reply(429, "").reply(429, "");
        let client = LinkedinJobClient::with_transport(transport, &settings()).with_policy(
            RetryPolicy {
                retries: 2,
                rate_limit_cooldown: Duration::from_secs(10),
                ..no_delay(2)
            },
        );

        let started = tokio::time::Instant::now();
        assert_eq!(client.fetch_with_retries(&[]).await, FetchOutcome::Exhausted);
        assert_eq!(client.transport.calls(), 2);
        assert!(started.elapsed() >= Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_first_page_failure_is_an_upstream_error() {
        let transport = ScriptedTransport::default()
            .reply(503, "")
            .reply(503, "")
            .reply(503, "");
        let client = client(transport);

        let err = client
            .get_jobs(&JobSearchParams::new("Rust", "Denmark"))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_later_page_failure_returns_partial_results() {
        let transport = ScriptedTransport::default()
            .reply(200, page(0..10))
            .fail()
            .fail()
            .fail();
        let client = client(transport);

        let jobs = client
            .get_jobs(&JobSearchParams::new("Rust", "Denmark").with_limit(20))
            .await
            .unwrap();
        assert_eq!(jobs.len(), 10);
    }

    #[tokio::test]
    async fn test_offset_near_u32_max_stops_instead_of_wrapping() {
        let transport = ScriptedTransport::default()
            .reply(200, page(0..10))
            .reply(200, page(10..20));
        let client = client(transport);

        let mut params = JobSearchParams::new("Rust", "Denmark").with_limit(20);
        params.start = u32::MAX - 5;
        let jobs = client.get_jobs(&params).await.unwrap();

        assert_eq!(jobs.len(), 10);
        assert_eq!(client.transport.calls(), 1);
        assert_eq!(client.transport.start_of(0), (u32::MAX - 5).to_string());
    }

    #[tokio::test]
    async fn test_invalid_limit_makes_no_request() {
        let client = client(ScriptedTransport::default());
        let err = client
            .get_jobs(&JobSearchParams::new("Rust", "Denmark").with_limit(0))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidParams(_)));
        assert_eq!(client.transport.calls(), 0);
    }
}
