// src/jobs/types.rs
use super::SearchError;
use serde::{Deserialize, Serialize};

pub const MAX_LIMIT: u32 = 50;
pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortBy {
    /// Relevance
    #[default]
    R,
    /// Most recent first
    DD,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::R => "R",
            SortBy::DD => "DD",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSearchParams {
    /// Job title or keywords, e.g. "Python Developer"
    pub keywords: Option<String>,
    /// Location to search, e.g. "Denmark"
    pub location: Option<String>,
    #[serde(default)]
    pub start: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Only postings newer than this many seconds
    #[serde(default)]
    pub time_filter: Option<u64>,
    #[serde(default)]
    pub sort_by: SortBy,
}

fn default_limit() -> u32 {
    10
}

impl Default for JobSearchParams {
    fn default() -> Self {
        Self {
            keywords: None,
            location: None,
            start: 0,
            limit: default_limit(),
            time_filter: None,
            sort_by: SortBy::default(),
        }
    }
}

impl JobSearchParams {
    pub fn new(keywords: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            keywords: Some(keywords.into()),
            location: Some(location.into()),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if !(1..=MAX_LIMIT).contains(&self.limit) {
            return Err(SearchError::InvalidParams(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, self.limit
            )));
        }
        if self.time_filter == Some(0) {
            return Err(SearchError::InvalidParams(
                "time_filter must be a positive number of seconds".to_string(),
            ));
        }
        Ok(())
    }

    /// Keywords with surrounding whitespace removed; blank counts as absent
    pub fn keywords(&self) -> Option<&str> {
        self.keywords.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub job_id: String,
    pub url: String,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub posted_at: Option<String>,
}
