use std::sync::Arc;

use tokio::sync::RwLock;

use super::{FetchOutcome, Viewer};
use crate::client::ApiClient;
use crate::models::{Settings, SettingsPatch};
use crate::notify::{Notification, Notifier};

const PATH: &str = "settings";

#[derive(Default)]
struct State {
    settings: Option<Settings>,
    loading: bool,
    viewer: Option<Viewer>,
}

/// Holds the signed-in user's settings record.
pub struct SettingsContext {
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
    state: RwLock<State>,
}

impl SettingsContext {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            state: RwLock::new(State::default()),
        }
    }

    pub fn with_viewer(mut self, viewer: Viewer) -> Self {
        self.state.get_mut().viewer = Some(viewer);
        self
    }

    pub async fn settings(&self) -> Option<Settings> {
        self.state.read().await.settings.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn fetch(&self) -> FetchOutcome {
        {
            let mut state = self.state.write().await;
            if !state.viewer.as_ref().is_some_and(Viewer::can_fetch) {
                return FetchOutcome::Skipped;
            }
            state.loading = true;
        }

        let result = self.client.get::<Settings>(&[PATH]).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(settings) => {
                state.settings = Some(settings);
                FetchOutcome::Applied
            }
            Err(e) => {
                tracing::error!("failed to load settings: {}", e);
                self.notifier.notify(Notification::error("Failed to load settings"));
                FetchOutcome::Failed
            }
        }
    }

    /// PATCH the settings and reload them from the API on success.
    pub async fn update(&self, patch: &SettingsPatch) -> Option<Settings> {
        match self.client.patch::<_, Settings>(&[PATH], patch).await {
            Ok(saved) => {
                self.fetch().await;
                self.notifier.notify(Notification::success("Settings updated successfully!"));
                Some(saved)
            }
            Err(e) => {
                tracing::error!("failed to update settings: {}", e);
                self.notifier.notify(Notification::error("Failed to update settings"));
                None
            }
        }
    }
}
