//! The settings core of the tern desktop app: which providers are usable,
//! which credentials are present, which extensions are installed, and
//! which model is active.
//!
//! All state the rest of the UI reads funnels through [`Settings`]: the
//! [`ActiveKeys`] cache is the single source of truth for "who has a
//! usable key", [`ModelSelection`] owns the persisted active model, and
//! [`ExtensionLifecycle`] mirrors backend-confirmed extension state.

pub mod active_keys;
pub mod catalog;
mod credentials;
pub mod error;
pub mod extensions;
pub mod paths;
pub mod selection;

pub use active_keys::ActiveKeys;
pub use catalog::{ProviderInfo, ProviderSummary};
pub use error::SettingsError;
pub use extensions::{ExtensionEvent, ExtensionLifecycle};
pub use selection::{ModelSelection, RecentModel, SelectedModel, MAX_RECENT_MODELS};

use tern_client::TernClient;

/// Owned context for the settings subsystem, handed by reference to every
/// consumer. Components never reach for globals; the cache discipline in
/// [`ActiveKeys`] is enforced by this being the only owner.
pub struct Settings {
    client: TernClient,
    pub active_keys: ActiveKeys,
    pub selection: ModelSelection,
    pub extensions: ExtensionLifecycle,
}

impl Settings {
    /// Build the settings context with selection state under the default
    /// app data dir.
    pub fn new(client: TernClient) -> Result<Self, SettingsError> {
        let selection = ModelSelection::load(paths::selection_file()?)?;
        Ok(Self::with_selection(client, selection))
    }

    /// Build the settings context around an already-loaded selection
    /// store. Useful when the caller controls the storage location.
    pub fn with_selection(client: TernClient, selection: ModelSelection) -> Self {
        Self {
            active_keys: ActiveKeys::new(),
            extensions: ExtensionLifecycle::new(client.clone()),
            selection,
            client,
        }
    }

    pub fn client(&self) -> &TernClient {
        &self.client
    }

    /// Rebuild the active-keys view from backend truth.
    pub async fn refresh_active_keys(&self) -> Result<(), SettingsError> {
        self.active_keys.refresh(&self.client).await
    }

    /// Provider rows for the settings grid: backend-known providers merged
    /// with catalog metadata and the configured flag.
    pub async fn provider_summaries(&self) -> Result<Vec<ProviderSummary>, SettingsError> {
        let known = self.client.list_providers().await?;
        Ok(catalog::summaries(&known, &self.active_keys))
    }
}
