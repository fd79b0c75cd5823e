use crate::catalog;
use crate::error::SettingsError;
use crate::Settings;

impl Settings {
    /// Store (or replace) the API key backing `provider_id`.
    ///
    /// When the provider is already configured the old value is deleted
    /// strictly before the new one is stored, so two conflicting values
    /// can never coexist. A delete failure aborts the flow with no store
    /// call. A store failure after a successful delete leaves the provider
    /// unconfigured and surfaces as [`SettingsError::ReplaceFailed`].
    ///
    /// The active-keys view refreshes only once the mutation is
    /// backend-confirmed.
    pub async fn set_provider_key(
        &self,
        provider_id: &str,
        api_key: &str,
    ) -> Result<(), SettingsError> {
        let provider = catalog::resolve(provider_id)
            .ok_or_else(|| SettingsError::UnknownProvider(provider_id.to_string()))?;
        let Some(key) = provider.required_keys.first() else {
            tracing::debug!(provider = provider.name, "provider requires no credentials");
            return Ok(());
        };

        if self.active_keys.is_configured(provider.name) {
            self.client().delete_secret(*key).await?;
            self.client()
                .store_secret(*key, api_key.trim())
                .await
                .map_err(|source| SettingsError::ReplaceFailed {
                    provider: provider.name.to_string(),
                    source,
                })?;
        } else {
            self.client().store_secret(*key, api_key.trim()).await?;
        }

        self.active_keys.refresh(self.client()).await
    }

    /// Delete every stored credential for `provider_id`, leaving it
    /// unconfigured.
    pub async fn clear_provider_key(&self, provider_id: &str) -> Result<(), SettingsError> {
        let provider = catalog::resolve(provider_id)
            .ok_or_else(|| SettingsError::UnknownProvider(provider_id.to_string()))?;
        for key in provider.required_keys {
            self.client().delete_secret(*key).await?;
        }
        self.active_keys.refresh(self.client()).await
    }
}
