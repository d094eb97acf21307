use serde::{Deserialize, Serialize};

/// Which notification categories are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub trade_closed: bool,
    pub weekly_summary: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        // Per-trade alerts on out of the box; the weekly digest is opt-in.
        Self {
            trade_closed: true,
            weekly_summary: false,
        }
    }
}

/// User preferences consumed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub notifications: NotificationSettings,
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications: NotificationSettings::default(),
            language: "en".to_string(),
        }
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub trade_closed: Option<bool>,
    pub weekly_summary: Option<bool>,
    pub language: Option<String>,
}
