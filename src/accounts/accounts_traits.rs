use super::accounts_model::Account;
use crate::errors::Result;

/// Contract for Account repository operations over the key-value store.
/// The account list is read as one document and written back as one
/// document; `save_all` is the single end-of-run write the scheduler uses.
pub trait AccountRepositoryTrait: Send + Sync {
    fn load_all(&self) -> Result<Vec<Account>>;
    fn save_all(&self, accounts: &[Account]) -> Result<()>;
    fn get_by_id(&self, account_id: &str) -> Result<Account>;
    fn save(&self, account: Account) -> Result<Account>;
    fn delete(&self, account_id: &str) -> Result<()>;
}
