use std::sync::Arc;

use log::debug;

use super::accounts_model::{Account, ImportSummary, NewAccount};
use super::accounts_traits::AccountRepositoryTrait;
use crate::analytics::{self, ProcessedData};
use crate::errors::Result;
use crate::ledger;
use crate::statements;

/// Service for managing accounts and their ledgers.
pub struct AccountService {
    repository: Arc<dyn AccountRepositoryTrait>,
}

impl AccountService {
    pub fn new(repository: Arc<dyn AccountRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// Creates a new account with an empty ledger.
    pub fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;
        let mut account: Account = new_account.into();
        if account.id.is_empty() {
            account.id = uuid::Uuid::new_v4().to_string();
        }
        debug!("Creating account '{}'", account.name);
        self.repository.save(account)
    }

    /// Imports an exported statement file into an account's ledger. This is
    /// the file-upload path: the batch is reconciled against the existing
    /// ledger, never blindly appended.
    pub fn import_statement(&self, account_id: &str, raw: &str) -> Result<ImportSummary> {
        let mut account = self.repository.get_by_id(account_id)?;
        let batch = statements::parse_statement(raw)?;
        let outcome = ledger::merge(&account.trades, batch);

        let summary = ImportSummary {
            added: outcome.added.len(),
            updated: outcome.changed.len(),
            total: outcome.merged.len(),
        };

        let ledger_changed = !outcome.noop
            && (!outcome.added.is_empty()
                || !outcome.changed.is_empty()
                || outcome.merged.len() != account.trades.len());
        if ledger_changed {
            account.trades = outcome.merged;
            account.last_updated = Some(chrono::Utc::now().naive_utc());
            self.repository.save(account)?;
        } else {
            debug!("Import for account '{}' produced no changes", account_id);
        }
        Ok(summary)
    }

    pub fn get_account(&self, account_id: &str) -> Result<Account> {
        self.repository.get_by_id(account_id)
    }

    pub fn get_all_accounts(&self) -> Result<Vec<Account>> {
        self.repository.load_all()
    }

    pub fn delete_account(&self, account_id: &str) -> Result<()> {
        self.repository.delete(account_id)
    }

    /// Computes dashboard data for one account. `None` when the ledger has
    /// no valid trades yet.
    pub fn process(&self, account_id: &str) -> Result<Option<ProcessedData>> {
        let account = self.repository.get_by_id(account_id)?;
        Ok(analytics::compute_now(&account))
    }
}
