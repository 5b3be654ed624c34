//! Reddit account roster.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashboard_api::MonitorApi;
use dashboard_core::models::{Account, AccountWithStatus};

use crate::error::SessionError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountsState {
    pub accounts: Vec<AccountWithStatus>,
    pub loading: bool,
}

/// Cached view of `/accounts`, refreshed after every mutation.
pub struct AccountsRoster<A: MonitorApi> {
    api: Arc<A>,
    state: Mutex<AccountsState>,
}

impl<A: MonitorApi> AccountsRoster<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: Mutex::new(AccountsState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AccountsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> AccountsState {
        self.lock().clone()
    }

    pub fn accounts(&self) -> Vec<AccountWithStatus> {
        self.lock().accounts.clone()
    }

    /// Reload the roster from the backend.
    pub async fn refresh(&self) -> Result<Vec<AccountWithStatus>, SessionError> {
        self.lock().loading = true;
        let result = self.api.get_accounts().await;

        let mut state = self.lock();
        state.loading = false;
        let accounts = result?.merge();
        tracing::debug!(count = accounts.len(), "accounts refreshed");
        state.accounts = accounts.clone();
        Ok(accounts)
    }

    /// Register `account` and reload. If only the reload fails the account
    /// is cached with an unknown (false) auth status.
    pub async fn add(&self, account: Account) -> Result<Vec<AccountWithStatus>, SessionError> {
        if account.username.trim().is_empty() {
            return Err(SessionError::InvalidAccount(
                "username must not be empty".to_string(),
            ));
        }
        self.api.add_account(&account).await?;
        tracing::info!(username = %account.username, "account added");
        match self.refresh().await {
            Ok(accounts) => Ok(accounts),
            Err(err) => {
                tracing::warn!(error = %err, "reload after add failed");
                let mut state = self.lock();
                state.accounts.push(AccountWithStatus {
                    account,
                    status: false,
                });
                Ok(state.accounts.clone())
            }
        }
    }

    /// Delete the account named `username` and reload.
    ///
    /// A failed reload after a successful delete is logged and the cached
    /// roster is returned without the removed entry.
    pub async fn remove(&self, username: &str) -> Result<Vec<AccountWithStatus>, SessionError> {
        self.api.remove_account(username).await?;
        tracing::info!(username, "account removed");
        match self.refresh().await {
            Ok(accounts) => Ok(accounts),
            Err(err) => {
                tracing::warn!(error = %err, "reload after remove failed");
                let mut state = self.lock();
                state.accounts.retain(|a| a.account.username != username);
                Ok(state.accounts.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{account, FakeApi};
    use dashboard_core::models::AccountsResponse;

    fn roster(api: &Arc<FakeApi>) -> AccountsRoster<FakeApi> {
        AccountsRoster::new(Arc::clone(api))
    }

    #[tokio::test]
    async fn test_refresh_merges_status() {
        let api = Arc::new(FakeApi::new());
        *api.accounts.lock().unwrap() = AccountsResponse {
            accounts: vec![account("alice"), account("bob")],
            status: vec![true, false],
        };
        let roster = roster(&api);

        let accounts = roster.refresh().await.unwrap();
        assert_eq!(accounts[0].account.username, "alice");
        assert!(accounts[0].status);
        assert_eq!(accounts[1].account.username, "bob");
        assert!(!accounts[1].status);
        assert!(!roster.snapshot().loading);
    }

    #[tokio::test]
    async fn test_add_then_refresh() {
        let api = Arc::new(FakeApi::new());
        let roster = roster(&api);

        let accounts = roster.add(account("carol")).await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(roster.accounts()[0].account.username, "carol");
        assert_eq!(api.account_calls(), 2);
    }

    #[tokio::test]
    async fn test_add_rejects_empty_username() {
        let api = Arc::new(FakeApi::new());
        let roster = roster(&api);

        let err = roster.add(account("  ")).await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidAccount(_)));
        assert_eq!(api.account_calls(), 0);
    }

    #[tokio::test]
    async fn test_remove_then_refresh() {
        let api = Arc::new(FakeApi::new());
        *api.accounts.lock().unwrap() = AccountsResponse {
            accounts: vec![account("alice"), account("bob")],
            status: vec![true, true],
        };
        let roster = roster(&api);
        roster.refresh().await.unwrap();

        let accounts = roster.remove("alice").await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].account.username, "bob");
    }

    #[tokio::test]
    async fn test_add_succeeds_when_reload_fails() {
        let api = Arc::new(FakeApi::new());
        let roster = roster(&api);

        api.fail_reads(true);
        let accounts = roster.add(account("carol")).await.unwrap();

        assert_eq!(api.accounts.lock().unwrap().accounts.len(), 1);
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].account.username, "carol");
        assert!(!accounts[0].status);
        assert!(!roster.snapshot().loading);
    }

    #[tokio::test]
    async fn test_remove_succeeds_when_reload_fails() {
        let api = Arc::new(FakeApi::new());
        *api.accounts.lock().unwrap() = AccountsResponse {
            accounts: vec![account("alice"), account("bob")],
            status: vec![true, true],
        };
        let roster = roster(&api);
        roster.refresh().await.unwrap();

        api.fail_reads(true);
        let accounts = roster.remove("alice").await.unwrap();

        assert_eq!(api.accounts.lock().unwrap().accounts.len(), 1);
        assert_eq!(accounts.len(), 1);
        assert_eq!(roster.accounts()[0].account.username, "bob");
    }

    #[tokio::test]
    async fn test_remove_failure_is_reported() {
        let api = Arc::new(FakeApi::new());
        let roster = roster(&api);

        api.fail_commands(true);
        assert!(roster.remove("alice").await.is_err());
        assert_eq!(api.account_calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_error_keeps_cache() {
        let api = Arc::new(FakeApi::new());
        *api.accounts.lock().unwrap() = AccountsResponse {
            accounts: vec![account("alice")],
            status: vec![true],
        };
        let roster = roster(&api);
        roster.refresh().await.unwrap();

        api.fail_commands(true);
        assert!(roster.refresh().await.is_err());
        assert_eq!(roster.accounts().len(), 1);
        assert!(!roster.snapshot().loading);
    }
}
