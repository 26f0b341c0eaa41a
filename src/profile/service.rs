// src/profile/service.rs
use super::{Profile, ProfileError, ProfileStore, ProfileUpdate};
use std::sync::Arc;
use tracing::{info, warn};

/// Settings persistence as seen by the settings page: save and fetch for the
/// current user.
#[rocket::async_trait]
pub trait SettingsBackend: Send + Sync {
    async fn save_profile(&self, update: &ProfileUpdate) -> Result<Profile, ProfileError>;

    async fn fetch_profile(&self) -> Result<Profile, ProfileError>;
}

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
    max_field_bytes: usize,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ProfileStore>, max_field_bytes: usize) -> Self {
        Self {
            store,
            max_field_bytes,
        }
    }

    pub fn max_field_bytes(&self) -> usize {
        self.max_field_bytes
    }

    pub async fn fetch(&self, user_id: &str) -> Result<Profile, ProfileError> {
        let profile = self.store.fetch(user_id).await?;
        Ok(profile.unwrap_or_else(|| Profile::empty(user_id)))
    }

    pub async fn save(&self, user_id: &str, update: &ProfileUpdate) -> Result<Profile, ProfileError> {
        self.validate(update)?;
        let profile = self.store.save(user_id, update).await?;
        info!(
            "Saved profile for {} (resume: {} bytes, instructions: {} bytes)",
            user_id,
            profile.resume.len(),
            profile.instructions.len()
        );
        Ok(profile)
    }

    /// Bind the service to a single user
    pub fn for_user(&self, user_id: impl Into<String>) -> UserSettings {
        UserSettings {
            service: self.clone(),
            user_id: user_id.into(),
        }
    }

    fn validate(&self, update: &ProfileUpdate) -> Result<(), ProfileError> {
        let fields = [
            ("resume", update.resume.as_deref()),
            ("instructions", update.instructions.as_deref()),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                if value.len() > self.max_field_bytes {
                    warn!("Rejected {} of {} bytes", field, value.len());
                    return Err(ProfileError::TooLarge {
                        field,
                        size: value.len(),
                        limit: self.max_field_bytes,
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct UserSettings {
    service: ProfileService,
    user_id: String,
}

impl UserSettings {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[rocket::async_trait]
impl SettingsBackend for UserSettings {
    async fn save_profile(&self, update: &ProfileUpdate) -> Result<Profile, ProfileError> {
        self.service.save(&self.user_id, update).await
    }

    async fn fetch_profile(&self) -> Result<Profile, ProfileError> {
        self.service.fetch(&self.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::MemoryProfileStore;

    fn service(limit: usize) -> ProfileService {
        ProfileService::new(Arc::new(MemoryProfileStore::new()), limit)
    }

    #[tokio::test]
    async fn test_fetch_unknown_user_is_empty() {
        let profile = service(100).fetch("nobody").await.unwrap();
        assert_eq!(profile, Profile::empty("nobody"));
    }

    #[tokio::test]
    async fn test_empty_strings_are_accepted() {
        let saved = service(100)
            .save("u1", &ProfileUpdate::full("", ""))
            .await
            .unwrap();
        assert_eq!(saved.resume, "");
        assert!(saved.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_oversized_field_is_rejected_without_writing() {
        let service = service(8);
        let err = service
            .save("u1", &ProfileUpdate::full("short", "way too long text"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProfileError::TooLarge {
                field: "instructions",
                size: 17,
                limit: 8
            }
        ));
        assert!(service.fetch("u1").await.unwrap().updated_at.is_none());
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let settings = service(100).for_user("u1");
        settings
            .save_profile(&ProfileUpdate::full("first", "one"))
            .await
            .unwrap();
        settings
            .save_profile(&ProfileUpdate::full("second", "two"))
            .await
            .unwrap();

        let profile = settings.fetch_profile().await.unwrap();
        assert_eq!(profile.resume, "second");
        assert_eq!(profile.instructions, "two");
    }
}
