pub mod constants;
pub mod errors;

pub mod accounts;
pub mod analytics;
pub mod i18n;
pub mod ledger;
pub mod notifications;
pub mod settings;
pub mod statements;
pub mod store;
pub mod sync;
pub mod trades;

pub use errors::{Error, Result};
pub use trades::*;
