//! In-memory [`MonitorApi`] used by the runtime's unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use dashboard_api::{ApiError, ApiResult, MonitorApi};
use dashboard_core::models::{
    Account, AccountsResponse, CommandAck, MonitorStatus, MonitoringConfig, MonitoringStats,
};

pub(crate) fn active_stats() -> MonitoringStats {
    MonitoringStats {
        status: MonitorStatus::Active,
        subreddit: "AskReddit".to_string(),
        test_mode: true,
        posts_checked: 42,
        comments_checked: 310,
        ai_replies: 3,
        errors: 1,
        rate_limited: 0,
    }
}

pub(crate) fn account(username: &str) -> Account {
    Account {
        client_id: format!("{username}-client"),
        client_secret: "secret".to_string(),
        username: username.to_string(),
        password: "hunter2".to_string(),
        api_key: String::new(),
    }
}

fn unavailable() -> ApiError {
    ApiError::Unavailable("connection refused".to_string())
}

/// Scriptable backend. `status = None` makes status fetches fail.
pub(crate) struct FakeApi {
    status: Mutex<Option<MonitoringStats>>,
    start_ack: Mutex<String>,
    stop_ack: Mutex<String>,
    fail_commands: AtomicBool,
    fail_reads: AtomicBool,
    pub logs: Mutex<Vec<String>>,
    pub analysis_csv: Mutex<Vec<u8>>,
    pub accounts: Mutex<AccountsResponse>,
    last_config: Mutex<Option<MonitoringConfig>>,
    last_limit: Mutex<Option<usize>>,
    status_calls: AtomicUsize,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
    log_calls: AtomicUsize,
    clear_calls: AtomicUsize,
    account_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            status: Mutex::new(Some(active_stats())),
            start_ack: Mutex::new("started".to_string()),
            stop_ack: Mutex::new("stopped".to_string()),
            fail_commands: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            logs: Mutex::new(Vec::new()),
            analysis_csv: Mutex::new(Vec::new()),
            accounts: Mutex::new(AccountsResponse::default()),
            last_config: Mutex::new(None),
            last_limit: Mutex::new(None),
            status_calls: AtomicUsize::new(0),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            log_calls: AtomicUsize::new(0),
            clear_calls: AtomicUsize::new(0),
            account_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_status(&self, status: Option<MonitoringStats>) {
        *self.status.lock().unwrap() = status;
    }

    pub fn set_start_ack(&self, ack: &str) {
        *self.start_ack.lock().unwrap() = ack.to_string();
    }

    pub fn set_stop_ack(&self, ack: &str) {
        *self.stop_ack.lock().unwrap() = ack.to_string();
    }

    /// Make every mutating call fail as if the backend were down.
    pub fn fail_commands(&self, fail: bool) {
        self.fail_commands.store(fail, Ordering::SeqCst);
    }

    /// Make log and account reads fail while writes keep succeeding.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_logs(&self, logs: &[&str]) {
        *self.logs.lock().unwrap() = logs.iter().map(|l| l.to_string()).collect();
    }

    pub fn last_config(&self) -> Option<MonitoringConfig> {
        self.last_config.lock().unwrap().clone()
    }

    pub fn last_limit(&self) -> Option<usize> {
        *self.last_limit.lock().unwrap()
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    pub fn log_calls(&self) -> usize {
        self.log_calls.load(Ordering::SeqCst)
    }

    pub fn clear_calls(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }

    pub fn account_calls(&self) -> usize {
        self.account_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.status_calls()
            + self.start_calls()
            + self.stop_calls()
            + self.log_calls()
            + self.clear_calls()
            + self.account_calls()
    }

    fn check_commands(&self) -> ApiResult<()> {
        if self.fail_commands.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }

    fn check_reads(&self) -> ApiResult<()> {
        self.check_commands()?;
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }
}

impl MonitorApi for FakeApi {
    async fn start_monitoring(&self, config: &MonitoringConfig) -> ApiResult<CommandAck> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.check_commands()?;
        *self.last_config.lock().unwrap() = Some(config.clone());
        Ok(CommandAck {
            status: self.start_ack.lock().unwrap().clone(),
        })
    }

    async fn stop_monitoring(&self) -> ApiResult<CommandAck> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.check_commands()?;
        Ok(CommandAck {
            status: self.stop_ack.lock().unwrap().clone(),
        })
    }

    async fn get_status(&self) -> ApiResult<MonitoringStats> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.status.lock().unwrap().clone().ok_or_else(unavailable)
    }

    async fn get_logs(&self, limit: usize) -> ApiResult<Vec<String>> {
        self.log_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;
        *self.last_limit.lock().unwrap() = Some(limit);
        Ok(self.logs.lock().unwrap().iter().take(limit).cloned().collect())
    }

    async fn clear_logs(&self) -> ApiResult<()> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        self.check_commands()?;
        self.logs.lock().unwrap().clear();
        Ok(())
    }

    async fn download_analysis_log(&self) -> ApiResult<Vec<u8>> {
        self.log_calls.fetch_add(1, Ordering::SeqCst);
        self.check_commands()?;
        Ok(self.analysis_csv.lock().unwrap().clone())
    }

    async fn get_accounts(&self) -> ApiResult<AccountsResponse> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn add_account(&self, account: &Account) -> ApiResult<()> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        self.check_commands()?;
        let mut accounts = self.accounts.lock().unwrap();
        accounts.accounts.push(account.clone());
        accounts.status.push(true);
        Ok(())
    }

    async fn remove_account(&self, username: &str) -> ApiResult<()> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        self.check_commands()?;
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(idx) = accounts.accounts.iter().position(|a| a.username == username) {
            accounts.accounts.remove(idx);
            if idx < accounts.status.len() {
                accounts.status.remove(idx);
            }
        }
        Ok(())
    }
}
