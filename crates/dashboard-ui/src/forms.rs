//! Line editors used by the TUI: the inline config field editor on the
//! dashboard tab and the add-account form on the accounts tab.

use dashboard_core::models::{
    mask_secret, parse_check_interval, Account, MonitoringConfig, MonitoringConfigPatch,
};

// ── Config draft ──────────────────────────────────────────────────────────────

/// Text field of the monitoring draft editable from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Subreddit,
    TopicFilter,
    Interval,
}

impl ConfigField {
    pub fn label(self) -> &'static str {
        match self {
            ConfigField::Subreddit => "Subreddit",
            ConfigField::TopicFilter => "Filter Prompt",
            ConfigField::Interval => "Check Interval",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ConfigField::Subreddit => ConfigField::TopicFilter,
            ConfigField::TopicFilter => ConfigField::Interval,
            ConfigField::Interval => ConfigField::Subreddit,
        }
    }

    fn current(self, config: &MonitoringConfig) -> String {
        match self {
            ConfigField::Subreddit => config.subreddit.clone(),
            ConfigField::TopicFilter => config.topic_filter.clone(),
            ConfigField::Interval => config.check_interval.to_string(),
        }
    }
}

/// In-progress edit of one draft field, seeded with its current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEdit {
    pub field: ConfigField,
    pub buffer: String,
}

impl ConfigEdit {
    pub fn new(field: ConfigField, config: &MonitoringConfig) -> Self {
        Self {
            field,
            buffer: field.current(config),
        }
    }

    pub fn push(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn pop(&mut self) {
        self.buffer.pop();
    }

    /// Patch that writes the buffer into the draft.
    ///
    /// Interval text goes through [`parse_check_interval`], so garbage falls
    /// back to the default and large values are clamped.
    pub fn patch(&self) -> MonitoringConfigPatch {
        match self.field {
            ConfigField::Subreddit => MonitoringConfigPatch {
                subreddit: Some(self.buffer.clone()),
                ..Default::default()
            },
            ConfigField::TopicFilter => MonitoringConfigPatch {
                topic_filter: Some(self.buffer.clone()),
                ..Default::default()
            },
            ConfigField::Interval => MonitoringConfigPatch {
                check_interval: Some(parse_check_interval(&self.buffer)),
                ..Default::default()
            },
        }
    }
}

// ── Account form ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    ClientId,
    ClientSecret,
    Username,
    Password,
    ApiKey,
}

impl AccountField {
    pub const ALL: [AccountField; 5] = [
        AccountField::ClientId,
        AccountField::ClientSecret,
        AccountField::Username,
        AccountField::Password,
        AccountField::ApiKey,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AccountField::ClientId => "Client ID",
            AccountField::ClientSecret => "Client Secret",
            AccountField::Username => "Username",
            AccountField::Password => "Password",
            AccountField::ApiKey => "API Key",
        }
    }

    /// Fields whose value is masked while typing.
    pub fn is_secret(self) -> bool {
        matches!(
            self,
            AccountField::ClientSecret | AccountField::Password | AccountField::ApiKey
        )
    }
}

/// Add-account form filled one field at a time; Enter advances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountForm {
    step: usize,
    account: Account,
}

impl AccountForm {
    pub fn field(&self) -> AccountField {
        AccountField::ALL[self.step.min(AccountField::ALL.len() - 1)]
    }

    pub fn value(&self, field: AccountField) -> &str {
        match field {
            AccountField::ClientId => &self.account.client_id,
            AccountField::ClientSecret => &self.account.client_secret,
            AccountField::Username => &self.account.username,
            AccountField::Password => &self.account.password,
            AccountField::ApiKey => &self.account.api_key,
        }
    }

    /// Value as shown on screen; secrets are masked.
    pub fn display_value(&self, field: AccountField) -> String {
        let value = self.value(field);
        if field.is_secret() && !value.is_empty() {
            mask_secret(value)
        } else {
            value.to_string()
        }
    }

    fn value_mut(&mut self) -> &mut String {
        match self.field() {
            AccountField::ClientId => &mut self.account.client_id,
            AccountField::ClientSecret => &mut self.account.client_secret,
            AccountField::Username => &mut self.account.username,
            AccountField::Password => &mut self.account.password,
            AccountField::ApiKey => &mut self.account.api_key,
        }
    }

    pub fn push(&mut self, c: char) {
        self.value_mut().push(c);
    }

    pub fn pop(&mut self) {
        self.value_mut().pop();
    }

    /// Return to the previous field.
    pub fn back(&mut self) {
        self.step = self.step.saturating_sub(1);
    }

    /// Move to the next field, or hand back the finished account after the
    /// last one.
    pub fn advance(&mut self) -> Option<Account> {
        if self.step + 1 < AccountField::ALL.len() {
            self.step += 1;
            None
        } else {
            Some(self.account.clone())
        }
    }
}
