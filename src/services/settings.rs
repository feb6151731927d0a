//! Shop settings service

use validator::Validate;

use crate::{
    config::ShopConfig,
    error::AppResult,
    models::settings::{SaveShopSettings, ShopIdentity, ShopSettings},
    repository::Repository,
};

#[derive(Clone)]
pub struct SettingsService {
    repository: Repository,
    defaults: ShopConfig,
}

impl SettingsService {
    pub fn new(repository: Repository, defaults: ShopConfig) -> Self {
        Self { repository, defaults }
    }

    /// Current shop identity, configured defaults when none is stored
    pub async fn shop_identity(&self) -> AppResult<ShopIdentity> {
        let current = self.repository.settings.current().await?;
        Ok(ShopIdentity::from_settings(current, &self.defaults))
    }

    /// Like `shop_identity`, but a lookup failure only costs the customization
    pub async fn shop_identity_or_default(&self) -> ShopIdentity {
        match self.shop_identity().await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!("Shop settings unavailable, printing defaults: {}", e);
                ShopIdentity::from_settings(None, &self.defaults)
            }
        }
    }

    /// Update the current settings row, or create the first one
    pub async fn save(&self, data: &SaveShopSettings) -> AppResult<ShopSettings> {
        data.validate()?;
        let saved = self.repository.settings.save(data).await?;
        tracing::info!("Shop settings saved for '{}'", saved.shop_name);
        Ok(saved)
    }
}
