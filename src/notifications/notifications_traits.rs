use log::info;

use super::notifications_model::Notification;
use crate::errors::Result;

/// The "show a local notification" seam. Transport (OS notification center,
/// browser API) lives in the host application.
pub trait NotificationSinkTrait: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<()>;
}

/// Fallback sink that writes notifications to the log, for headless runs.
#[derive(Debug, Default)]
pub struct LogNotificationSink;

impl NotificationSinkTrait for LogNotificationSink {
    fn notify(&self, notification: Notification) -> Result<()> {
        info!(
            "[notification:{}] {}: {}",
            notification.tag, notification.title, notification.body
        );
        Ok(())
    }
}
