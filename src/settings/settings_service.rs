use std::sync::Arc;

use super::settings_model::{Settings, SettingsUpdate};
use crate::constants::STORE_KEY_SETTINGS;
use crate::errors::Result;
use crate::store::{get_value, put_value, StoreTrait};

/// Service for reading and updating user settings in the key-value store.
pub struct SettingsService {
    store: Arc<dyn StoreTrait>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn StoreTrait>) -> Self {
        SettingsService { store }
    }

    /// Returns stored settings, falling back to defaults on first read.
    pub fn get_settings(&self) -> Result<Settings> {
        Ok(get_value(self.store.as_ref(), STORE_KEY_SETTINGS)?.unwrap_or_default())
    }

    pub fn update_settings(&self, update: &SettingsUpdate) -> Result<Settings> {
        let mut settings = self.get_settings()?;
        if let Some(trade_closed) = update.trade_closed {
            settings.notifications.trade_closed = trade_closed;
        }
        if let Some(weekly_summary) = update.weekly_summary {
            settings.notifications.weekly_summary = weekly_summary;
        }
        if let Some(language) = &update.language {
            settings.language = language.clone();
        }
        put_value(self.store.as_ref(), STORE_KEY_SETTINGS, &settings)?;
        Ok(settings)
    }
}
