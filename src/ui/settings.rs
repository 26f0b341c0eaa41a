// src/ui/settings.rs
//! Profile & agent settings form.

use super::header::Header;
use super::router::Route;
use super::text::ControlledText;
use crate::profile::{Profile, ProfileError, ProfileUpdate, SettingsBackend};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Saving,
    Saved,
    Failed(String),
}

impl SaveState {
    pub fn is_saving(&self) -> bool {
        matches!(self, SaveState::Saving)
    }
}

#[derive(Debug)]
pub struct SettingsPage {
    header: Header,
    resume: ControlledText,
    instructions: ControlledText,
    state: watch::Sender<SaveState>,
    min_indicator: Duration,
}

impl SettingsPage {
    /// `min_indicator` is the shortest time the saving state stays visible.
    pub fn new(min_indicator: Duration) -> Self {
        let (state, _) = watch::channel(SaveState::Idle);
        Self {
            header: Header::new(Route::Settings),
            resume: ControlledText::default(),
            instructions: ControlledText::default(),
            state,
            min_indicator,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn resume(&self) -> &ControlledText {
        &self.resume
    }

    pub fn resume_mut(&mut self) -> &mut ControlledText {
        &mut self.resume
    }

    pub fn instructions(&self) -> &ControlledText {
        &self.instructions
    }

    pub fn instructions_mut(&mut self) -> &mut ControlledText {
        &mut self.instructions
    }

    pub fn save_state(&self) -> SaveState {
        self.state.borrow().clone()
    }

    /// Observe every save-state transition
    pub fn subscribe(&self) -> watch::Receiver<SaveState> {
        self.state.subscribe()
    }

    pub fn can_save(&self) -> bool {
        !self.state.borrow().is_saving()
    }

    pub fn button_label(&self) -> &'static str {
        match &*self.state.borrow() {
            SaveState::Saving => "Saving...",
            SaveState::Failed(_) => "Retry Save",
            SaveState::Idle | SaveState::Saved => "Save Settings",
        }
    }

    /// Persist both fields. The saving state lasts at least the minimum
    /// indicator duration and ends in `Saved` or `Failed`; retrying is
    /// simply calling this again.
    pub async fn save(&mut self, backend: &dyn SettingsBackend) -> Result<Profile, ProfileError> {
        self.state.send_replace(SaveState::Saving);

        let update = ProfileUpdate::full(self.resume.value(), self.instructions.value());
        let (result, _) = tokio::join!(
            backend.save_profile(&update),
            tokio::time::sleep(self.min_indicator)
        );

        match &result {
            Ok(_) => {
                info!("Settings saved");
                self.state.send_replace(SaveState::Saved);
            }
            Err(e) => {
                warn!("Saving settings failed: {}", e);
                self.state.send_replace(SaveState::Failed(e.to_string()));
            }
        }
        result
    }

    /// Replace both fields with the stored profile
    pub async fn load(&mut self, backend: &dyn SettingsBackend) -> Result<(), ProfileError> {
        let profile = backend.fetch_profile().await?;
        self.resume.set(profile.resume);
        self.instructions.set(profile.instructions);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{MemoryProfileStore, ProfileService};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    struct FlakyBackend {
        failures_left: AtomicUsize,
        inner: crate::profile::UserSettings,
    }

    #[rocket::async_trait]
    impl SettingsBackend for FlakyBackend {
        async fn save_profile(&self, update: &ProfileUpdate) -> Result<Profile, ProfileError> {
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(ProfileError::Unavailable("connection refused".to_string()));
            }
            self.inner.save_profile(update).await
        }

        async fn fetch_profile(&self) -> Result<Profile, ProfileError> {
            self.inner.fetch_profile().await
        }
    }

    fn backend(failures: usize) -> FlakyBackend {
        let service = ProfileService::new(Arc::new(MemoryProfileStore::new()), 1024);
        FlakyBackend {
            failures_left: AtomicUsize::new(failures),
            inner: service.for_user("u1"),
        }
    }

    /// Record (state, time since start) for every transition until a
    /// terminal state.
    fn record(page: &SettingsPage) -> tokio::task::JoinHandle<Vec<(SaveState, Duration)>> {
        let mut rx = page.subscribe();
        let started = Instant::now();
        tokio::spawn(async move {
            let mut seen = Vec::new();
            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                let terminal = matches!(state, SaveState::Saved | SaveState::Failed(_));
                seen.push((state, started.elapsed()));
                if terminal {
                    break;
                }
            }
            seen
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_saving_indicator_spans_fixed_delay() {
        let backend = backend(0);
        let mut page = SettingsPage::new(Duration::from_millis(1000));
        page.resume_mut().type_str("Rust engineer");
        let recorder = record(&page);
        tokio::task::yield_now().await;

        assert_eq!(page.button_label(), "Save Settings");
        page.save(&backend).await.unwrap();

        let seen = recorder.await.unwrap();
        let states: Vec<_> = seen.iter().map(|(s, _)| s.clone()).collect();
        assert_eq!(states, vec![SaveState::Saving, SaveState::Saved]);
        assert!(seen[0].1 < Duration::from_millis(1));
        assert!(seen[1].1 >= Duration::from_millis(1000));
        assert!(page.can_save());

        let stored = backend.fetch_profile().await.unwrap();
        assert_eq!(stored.resume, "Rust engineer");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_distinct_and_retry_succeeds() {
        let backend = backend(1);
        let mut page = SettingsPage::new(Duration::from_millis(1000));
        page.instructions_mut().type_str("Prioritize remote roles");

        let err = page.save(&backend).await.unwrap_err();
        assert!(matches!(err, ProfileError::Unavailable(_)));
        assert_eq!(
            page.save_state(),
            SaveState::Failed("settings service unavailable: connection refused".to_string())
        );
        assert_eq!(page.button_label(), "Retry Save");

        page.save(&backend).await.unwrap();
        assert_eq!(page.save_state(), SaveState::Saved);
        assert_eq!(page.button_label(), "Save Settings");
    }

    #[tokio::test]
    async fn test_load_fills_fields() {
        let backend = backend(0);
        backend
            .save_profile(&ProfileUpdate::full("stored cv", "no Java"))
            .await
            .unwrap();

        let mut page = SettingsPage::new(Duration::ZERO);
        page.load(&backend).await.unwrap();
        assert_eq!(page.resume().value(), "stored cv");
        assert_eq!(page.instructions().value(), "no Java");
        assert_eq!(page.save_state(), SaveState::Idle);
    }
}
