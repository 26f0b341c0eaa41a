// src/jobs/mod.rs
//! Job search against the LinkedIn guest listing endpoint.

pub mod client;
pub mod extract;
pub mod locations;
pub mod types;

pub use client::{FetchOutcome, LinkedinJobClient, PageTransport, ReqwestTransport, RetryPolicy};
pub use locations::LocationTable;
pub use types::{JobPosting, JobSearchParams, SortBy};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search parameters: {0}")]
    InvalidParams(String),

    #[error("job listing service unavailable: {0}")]
    Upstream(String),
}

/// Anything that can answer a job search
#[rocket::async_trait]
pub trait JobSource: Send + Sync {
    async fn search(&self, params: &JobSearchParams) -> Result<Vec<JobPosting>, SearchError>;
}
