use std::sync::Arc;

use super::accounts_errors::AccountError;
use super::accounts_model::Account;
use super::accounts_traits::AccountRepositoryTrait;
use crate::constants::STORE_KEY_ACCOUNTS;
use crate::errors::Result;
use crate::store::{get_value, put_value, StoreTrait};

pub struct AccountRepository {
    store: Arc<dyn StoreTrait>,
}

impl AccountRepository {
    pub fn new(store: Arc<dyn StoreTrait>) -> Self {
        AccountRepository { store }
    }
}

impl AccountRepositoryTrait for AccountRepository {
    fn load_all(&self) -> Result<Vec<Account>> {
        Ok(get_value(self.store.as_ref(), STORE_KEY_ACCOUNTS)?.unwrap_or_default())
    }

    fn save_all(&self, accounts: &[Account]) -> Result<()> {
        put_value(self.store.as_ref(), STORE_KEY_ACCOUNTS, &accounts)
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        self.load_all()?
            .into_iter()
            .find(|a| a.id == account_id)
            .ok_or_else(|| AccountError::NotFound(account_id.to_string()).into())
    }

    fn save(&self, account: Account) -> Result<Account> {
        let mut accounts = self.load_all()?;
        match accounts.iter_mut().find(|a| a.id == account.id) {
            Some(existing) => *existing = account.clone(),
            None => accounts.push(account.clone()),
        }
        self.save_all(&accounts)?;
        Ok(account)
    }

    fn delete(&self, account_id: &str) -> Result<()> {
        let mut accounts = self.load_all()?;
        let before = accounts.len();
        accounts.retain(|a| a.id != account_id);
        if accounts.len() == before {
            return Err(AccountError::NotFound(account_id.to_string()).into());
        }
        self.save_all(&accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    fn account(id: &str) -> Account {
        Account {
            id: id.to_string(),
            name: format!("Account {}", id),
            initial_balance: 1000.0,
            currency: "USD".to_string(),
            data_url: None,
            trades: Vec::new(),
            last_updated: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    fn repository() -> AccountRepository {
        AccountRepository::new(Arc::new(SqliteStore::open_in_memory().unwrap()))
    }

    #[test]
    fn load_all_on_a_fresh_store_is_empty() {
        assert!(repository().load_all().unwrap().is_empty());
    }

    #[test]
    fn save_upserts_and_get_by_id_finds() {
        let repo = repository();
        repo.save(account("a")).unwrap();
        repo.save(account("b")).unwrap();

        let mut updated = account("a");
        updated.name = "Renamed".to_string();
        repo.save(updated).unwrap();

        let all = repo.load_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(repo.get_by_id("a").unwrap().name, "Renamed");
    }

    #[test]
    fn delete_removes_and_errors_on_unknown_id() {
        let repo = repository();
        repo.save(account("a")).unwrap();
        repo.delete("a").unwrap();
        assert!(repo.load_all().unwrap().is_empty());
        assert!(repo.delete("a").is_err());
        assert!(repo.get_by_id("a").is_err());
    }
}
