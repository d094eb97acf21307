use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::accounts_errors::AccountError;
use crate::errors::Result;
use crate::trades::Trade;

/// Domain model for one journal account and its ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub initial_balance: f64,
    pub currency: String,
    /// Optional remote statement source polled by the sync scheduler.
    pub data_url: Option<String>,
    /// The ledger. Mutated only through reconciliation; kept sorted by open
    /// time on persistence.
    pub trades: Vec<Trade>,
    /// Stamped on every merge that changed at least one entry.
    pub last_updated: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// Input model for creating a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub initial_balance: f64,
    pub currency: String,
    pub data_url: Option<String>,
}

impl NewAccount {
    /// Validates the new account data
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AccountError::InvalidData("Account name cannot be empty".to_string()).into());
        }
        if self.currency.trim().is_empty() {
            return Err(AccountError::InvalidData("Currency cannot be empty".to_string()).into());
        }
        if !self.initial_balance.is_finite() || self.initial_balance < 0.0 {
            return Err(AccountError::InvalidData(
                "Initial balance must be a non-negative number".to_string(),
            )
            .into());
        }
        if let Some(url) = &self.data_url {
            if url.trim().is_empty() {
                return Err(
                    AccountError::InvalidData("Data URL cannot be blank".to_string()).into(),
                );
            }
        }
        Ok(())
    }
}

impl From<NewAccount> for Account {
    fn from(new_account: NewAccount) -> Self {
        Self {
            id: new_account.id.unwrap_or_default(),
            name: new_account.name,
            initial_balance: new_account.initial_balance,
            currency: new_account.currency,
            data_url: new_account.data_url,
            trades: Vec::new(),
            last_updated: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Outcome of importing a statement file into an account.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub added: usize,
    pub updated: usize,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account() -> NewAccount {
        NewAccount {
            id: None,
            name: "Live".to_string(),
            initial_balance: 1000.0,
            currency: "USD".to_string(),
            data_url: None,
        }
    }

    #[test]
    fn validate_rejects_blank_name_and_currency() {
        let mut acc = new_account();
        acc.name = "  ".to_string();
        assert!(acc.validate().is_err());

        let mut acc = new_account();
        acc.currency = String::new();
        assert!(acc.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_initial_balance() {
        let mut acc = new_account();
        acc.initial_balance = -1.0;
        assert!(acc.validate().is_err());
    }

    #[test]
    fn valid_input_passes() {
        assert!(new_account().validate().is_ok());
    }
}
