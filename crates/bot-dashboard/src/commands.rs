//! One-shot subcommands: run a single backend call, print, exit.

use anyhow::Result;

use dashboard_api::MonitorApi;
use dashboard_core::formatting::{format_count, format_interval, format_mode};
use dashboard_core::models::{mask_secret, Account, AccountWithStatus, MonitoringConfig, MonitoringStats};
use dashboard_core::settings::{AccountsCommand, Command};
use dashboard_ui::accounts_view::auth_label;
use dashboard_ui::app::Backend;

pub async fn run<A: MonitorApi>(command: Command, backend: &Backend<A>) -> Result<()> {
    match command {
        Command::Status => {
            let stats = backend.session.fetch_stats().await?;
            print!("{}", format_status(&stats));
        }
        Command::Start => {
            let ack = backend.session.start_monitoring().await?;
            println!("Monitoring started ({})", ack.status);
            print!("{}", format_config(&backend.session.config()));
        }
        Command::Stop => {
            let ack = backend.session.stop_monitoring().await?;
            println!("Monitoring stopped ({})", ack.status);
        }
        Command::Logs { limit } => {
            backend.logs.fetch_live(limit).await?;
            let lines = backend.logs.lines();
            if lines.is_empty() {
                println!("No logs available");
            }
            for line in lines {
                println!("{line}");
            }
        }
        Command::ClearLogs => {
            backend.logs.clear().await?;
            println!("Logs cleared successfully");
        }
        Command::DownloadAnalysis { output } => {
            let dir = output.unwrap_or_else(|| backend.download_dir.clone());
            let path = backend.logs.download_analysis(&dir).await?;
            println!("Analysis log downloaded to {}", path.display());
        }
        Command::Accounts { action } => match action {
            AccountsCommand::List => {
                let accounts = backend.accounts.refresh().await?;
                print!("{}", format_accounts(&accounts));
            }
            AccountsCommand::Add {
                client_id,
                client_secret,
                username,
                password,
                api_key,
            } => {
                let accounts = backend
                    .accounts
                    .add(Account {
                        client_id,
                        client_secret,
                        username,
                        password,
                        api_key: api_key.unwrap_or_default(),
                    })
                    .await?;
                println!("Account added successfully");
                print!("{}", format_accounts(&accounts));
            }
            AccountsCommand::Remove { username } => {
                let accounts = backend.accounts.remove(&username).await?;
                println!("Account removed successfully");
                print!("{}", format_accounts(&accounts));
            }
        },
    }
    Ok(())
}

fn field(label: &str, value: impl std::fmt::Display) -> String {
    format!("{:<18}{}\n", format!("{label}:"), value)
}

pub fn format_status(stats: &MonitoringStats) -> String {
    let mut out = field("Status", stats.status.display_label());
    if !stats.subreddit.is_empty() {
        out.push_str(&field("Subreddit", format!("r/{}", stats.subreddit)));
    }
    out.push_str(&field("Mode", format_mode(stats.test_mode)));
    out.push_str(&field("Posts checked", format_count(stats.posts_checked)));
    out.push_str(&field("Comments checked", format_count(stats.comments_checked)));
    out.push_str(&field("AI replies", format_count(stats.ai_replies)));
    out.push_str(&field("Errors", format_count(stats.errors)));
    out.push_str(&field("Rate limited", format_count(stats.rate_limited)));
    out
}

pub fn format_config(config: &MonitoringConfig) -> String {
    let mut out = field("Subreddit", format!("r/{}", config.subreddit));
    out.push_str(&field("Filter prompt", &config.topic_filter));
    out.push_str(&field("Check interval", format_interval(config.check_interval)));
    out.push_str(&field("Mode", format_mode(config.test_mode)));
    out
}

pub fn format_accounts(accounts: &[AccountWithStatus]) -> String {
    if accounts.is_empty() {
        return "No accounts configured\n".to_string();
    }
    let mut out = format!(
        "{:<20} {:<24} {:<14} {:<14} {}\n",
        "USERNAME", "CLIENT ID", "CLIENT SECRET", "API KEY", "STATUS"
    );
    for entry in accounts {
        let account = &entry.account;
        out.push_str(&format!(
            "{:<20} {:<24} {:<14} {:<14} {}\n",
            account.username,
            account.client_id,
            mask_secret(&account.client_secret),
            mask_secret(&account.api_key),
            auth_label(entry.status)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::models::MonitorStatus;

    #[test]
    fn test_format_status() {
        let stats = MonitoringStats {
            status: MonitorStatus::Active,
            subreddit: "AskReddit".to_string(),
            test_mode: false,
            posts_checked: 12_345,
            comments_checked: 0,
            ai_replies: 7,
            errors: 0,
            rate_limited: 0,
        };
        let out = format_status(&stats);
        assert!(out.starts_with("Status:           Active\n"), "{out}");
        assert!(out.contains("r/AskReddit"));
        assert!(out.contains("Live Mode"));
        assert!(out.contains("12,345"));
    }

    #[test]
    fn test_format_status_idle_omits_subreddit() {
        let stats = MonitoringStats::idle(&MonitoringConfig {
            subreddit: String::new(),
            ..Default::default()
        });
        let out = format_status(&stats);
        assert!(out.contains("Idle"));
        assert!(!out.contains("Subreddit"));
    }

    #[test]
    fn test_format_config() {
        let out = format_config(&MonitoringConfig::default());
        assert!(out.contains("r/AskReddit"));
        assert!(out.contains("Test Mode"));
    }

    #[test]
    fn test_format_accounts_masks_secrets() {
        let accounts = vec![AccountWithStatus {
            account: Account {
                client_id: "abc123".to_string(),
                client_secret: "supersecretvalue".to_string(),
                username: "helper_bot".to_string(),
                password: "hunter2".to_string(),
                api_key: String::new(),
            },
            status: false,
        }];
        let out = format_accounts(&accounts);
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("supersec..."));
        assert!(out.contains("Not set"));
        assert!(out.contains("✗ Failed"));
        assert!(!out.contains("hunter2"));
    }

    #[test]
    fn test_format_accounts_empty() {
        assert_eq!(format_accounts(&[]), "No accounts configured\n");
    }
}
