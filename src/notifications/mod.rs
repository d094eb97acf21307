pub(crate) mod notifications_model;
pub(crate) mod notifications_traits;

pub use notifications_model::{trade_closed_tag, weekly_summary_tag, Notification};
pub use notifications_traits::{LogNotificationSink, NotificationSinkTrait};
