use crate::config::{ConfigOverrides, MonitorConfig, TomlConfig};
use crate::utils::error::Result;
use chrono::NaiveDate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "delivery-monitor")]
#[command(about = "Daily Uber Direct usage and early-cancellation monitor for retail stores")]
pub struct CliArgs {
    /// Path to an optional TOML configuration file
    #[arg(short, long, env = "MONITOR_CONFIG")]
    pub config: Option<String>,

    /// Bearer token with the deliveries read scope
    #[arg(long, env = "UBER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Customer ids to query, comma separated
    #[arg(long = "customer-id", env = "CUSTOMER_ID", value_delimiter = ',')]
    pub customer_ids: Vec<String>,

    #[arg(long, env = "UBER_BASE_URL")]
    pub base_url: Option<String>,

    #[arg(long, env = "EMAIL_FROM")]
    pub email_from: Option<String>,

    #[arg(long, env = "EMAIL_PASSWORD", hide_env_values = true)]
    pub email_password: Option<String>,

    /// Alert recipients, comma separated
    #[arg(long, env = "EMAIL_TO", value_delimiter = ',')]
    pub email_to: Vec<String>,

    /// Day to check (YYYY-MM-DD), defaults to yesterday in UTC
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Write a per-store CSV summary into this directory
    #[arg(long, env = "REPORT_DIR")]
    pub report_dir: Option<String>,

    /// Fetch and aggregate, but print alerts instead of emailing them
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            token: self.token.clone(),
            customer_ids: self.customer_ids.clone(),
            base_url: self.base_url.clone(),
            email_from: self.email_from.clone(),
            email_password: self.email_password.clone(),
            email_to: self.email_to.clone(),
            report_dir: self.report_dir.clone(),
        }
    }

    pub fn load_config(&self) -> Result<MonitorConfig> {
        let file = match &self.config {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None => None,
        };
        MonitorConfig::resolve(file, self.overrides())
    }
}
