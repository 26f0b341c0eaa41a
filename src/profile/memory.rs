// src/profile/memory.rs
use super::{Profile, ProfileError, ProfileStore, ProfileUpdate};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Volatile store, used by `serve --memory` and tests
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<String, Profile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[rocket::async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn fetch(&self, user_id: &str) -> Result<Option<Profile>, ProfileError> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn save(&self, user_id: &str, update: &ProfileUpdate) -> Result<Profile, ProfileError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .entry(user_id.to_string())
            .or_insert_with(|| Profile::empty(user_id));
        profile.apply(update, Utc::now());
        Ok(profile.clone())
    }
}
