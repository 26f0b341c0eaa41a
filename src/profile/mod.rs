// src/profile/mod.rs
//! Resume and agent-instruction settings, persisted per user.

pub mod memory;
pub mod service;

pub use memory::MemoryProfileStore;
pub use service::{ProfileService, SettingsBackend, UserSettings};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub resume: String,
    pub instructions: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Profile for a user that has never saved anything
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            resume: String::new(),
            instructions: String::new(),
            updated_at: None,
        }
    }

    /// Apply an update, keeping fields the update leaves out
    pub fn apply(&mut self, update: &ProfileUpdate, at: DateTime<Utc>) {
        if let Some(resume) = &update.resume {
            self.resume = resume.clone();
        }
        if let Some(instructions) = &update.instructions {
            self.instructions = instructions.clone();
        }
        self.updated_at = Some(at);
    }
}

/// Partial write; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub resume: Option<String>,
    pub instructions: Option<String>,
}

impl ProfileUpdate {
    pub fn full(resume: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            resume: Some(resume.into()),
            instructions: Some(instructions.into()),
        }
    }

    pub fn resume(resume: impl Into<String>) -> Self {
        Self {
            resume: Some(resume.into()),
            instructions: None,
        }
    }

    pub fn instructions(instructions: impl Into<String>) -> Self {
        Self {
            resume: None,
            instructions: Some(instructions.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("{field} is {size} bytes, the limit is {limit} bytes")]
    TooLarge {
        field: &'static str,
        size: usize,
        limit: usize,
    },

    #[error("storage error: {0}")]
    Storage(sqlx::Error),

    /// The store cannot be reached right now; the same request may succeed later
    #[error("settings service unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for ProfileError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                ProfileError::Unavailable(e.to_string())
            }
            other => ProfileError::Storage(other),
        }
    }
}

/// Backing store keyed by user identity
#[rocket::async_trait]
pub trait ProfileStore: Send + Sync {
    async fn fetch(&self, user_id: &str) -> Result<Option<Profile>, ProfileError>;

    async fn save(&self, user_id: &str, update: &ProfileUpdate) -> Result<Profile, ProfileError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_missing_fields() {
        let mut profile = Profile::empty("u1");
        let now = Utc::now();
        profile.apply(&ProfileUpdate::full("resume v1", "be picky"), now);
        profile.apply(&ProfileUpdate::resume("resume v2"), now);

        assert_eq!(profile.resume, "resume v2");
        assert_eq!(profile.instructions, "be picky");
        assert_eq!(profile.updated_at, Some(now));
    }

    #[test]
    fn test_too_large_message() {
        let err = ProfileError::TooLarge {
            field: "resume",
            size: 20,
            limit: 10,
        };
        assert_eq!(err.to_string(), "resume is 20 bytes, the limit is 10 bytes");
    }

    #[test]
    fn test_pool_errors_are_unavailable() {
        assert!(matches!(
            ProfileError::from(sqlx::Error::PoolTimedOut),
            ProfileError::Unavailable(_)
        ));
        assert!(matches!(
            ProfileError::from(sqlx::Error::RowNotFound),
            ProfileError::Storage(_)
        ));
    }
}
