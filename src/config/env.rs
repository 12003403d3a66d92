/// Values supplied from the command line or the process environment.
/// Anything set here wins over the TOML file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<String>,
    pub token: Option<String>,
    pub customer_ids: Vec<String>,
    pub base_url: Option<String>,
    pub email_from: Option<String>,
    pub email_password: Option<String>,
    pub email_to: Vec<String>,
    pub report_dir: Option<String>,
}

impl ConfigOverrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let list = |key: &str| -> Vec<String> {
            lookup(key)
                .map(|raw| raw.split(',').map(|item| item.trim().to_string()).collect())
                .unwrap_or_default()
        };

        Self {
            config_path: lookup("MONITOR_CONFIG"),
            token: lookup("UBER_TOKEN"),
            customer_ids: list("CUSTOMER_ID"),
            base_url: lookup("UBER_BASE_URL"),
            email_from: lookup("EMAIL_FROM"),
            email_password: lookup("EMAIL_PASSWORD"),
            email_to: list("EMAIL_TO"),
            report_dir: lookup("REPORT_DIR"),
        }
    }
}
