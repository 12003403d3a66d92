#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod toml_config;

pub use env::ConfigOverrides;
pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
pub use cli::CliArgs;

use crate::domain::stores::StoreDirectory;
use crate::utils::error::{MonitorError, Result};
use crate::utils::validation::{self, Validate};

pub const DEFAULT_BASE_URL: &str = "https://api.uber.com/v1";
pub const DEFAULT_PAGE_LIMIT: usize = 100;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Delivery API access.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: String,
    /// Scoping identifiers (customer ids) queried one after another.
    pub scope_ids: Vec<String>,
    pub page_limit: usize,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub from: Option<String>,
    pub password: Option<String>,
    pub recipients: Vec<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl MailConfig {
    /// Sender, password and recipients are all present.
    pub fn is_configured(&self) -> bool {
        self.from.is_some() && self.password.is_some() && !self.recipients.is_empty()
    }
}

/// Immutable run configuration, built once at startup and handed to each component.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub api: ApiConfig,
    pub mail: MailConfig,
    pub stores: StoreDirectory,
    pub report_dir: Option<String>,
}

impl MonitorConfig {
    /// 合併設定來源：命令列 / 環境變數優先於 TOML 檔案，最後才是預設值
    pub fn resolve(file: Option<TomlConfig>, overrides: ConfigOverrides) -> Result<Self> {
        let file = file.unwrap_or_default();
        let stores: StoreDirectory = file.stores.into_iter().collect();

        let token = first_present(overrides.token, file.api.token).ok_or_else(|| {
            MonitorError::MissingConfigError {
                field: "UBER_TOKEN".to_string(),
            }
        })?;

        // 沒有指定 customer id 時，每間店各自作為一個 scope
        let mut scope_ids = non_empty_list(overrides.customer_ids);
        if scope_ids.is_empty() {
            scope_ids = non_empty_list(file.api.customer_ids.unwrap_or_default());
        }
        if scope_ids.is_empty() {
            scope_ids = stores.store_ids();
        }
        if scope_ids.is_empty() {
            return Err(MonitorError::MissingConfigError {
                field: "CUSTOMER_ID".to_string(),
            });
        }

        let api = ApiConfig {
            base_url: first_present(overrides.base_url, file.api.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            token,
            scope_ids,
            page_limit: file.api.page_limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            timeout_seconds: file.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        };

        let mut recipients = non_empty_list(overrides.email_to);
        if recipients.is_empty() {
            recipients = non_empty_list(file.mail.recipients.unwrap_or_default());
        }

        let mail = MailConfig {
            from: first_present(overrides.email_from, file.mail.from),
            password: first_present(overrides.email_password, file.mail.password),
            recipients,
            smtp_host: non_empty(file.mail.smtp_host)
                .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: file.mail.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
        };

        let report_dir = first_present(
            overrides.report_dir,
            file.report.map(|report| report.output_path),
        );

        let config = Self {
            api,
            mail,
            stores,
            report_dir,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Validate for MonitorConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;
        validation::validate_non_empty_string("UBER_TOKEN", &self.api.token)?;
        for scope_id in &self.api.scope_ids {
            validation::validate_scope_id("CUSTOMER_ID", scope_id)?;
        }
        validation::validate_range("api.page_limit", self.api.page_limit, 1, 100)?;
        validation::validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 600)?;

        if let Some(from) = &self.mail.from {
            validation::validate_email_address("EMAIL_FROM", from)?;
        }
        for recipient in &self.mail.recipients {
            validation::validate_email_address("EMAIL_TO", recipient)?;
        }
        validation::validate_non_empty_string("mail.smtp_host", &self.mail.smtp_host)?;
        if self.mail.smtp_port == 0 {
            return Err(MonitorError::InvalidConfigValueError {
                field: "mail.smtp_port".to_string(),
                value: "0".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if let Some(report_dir) = &self.report_dir {
            validation::validate_non_empty_string("report.output_path", report_dir)?;
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn first_present(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    non_empty(primary).or_else(|| non_empty(fallback))
}

fn non_empty_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
