use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    HttpStatusError { status: u16, body: String },

    #[error("Unexpected payload shape for {context}: {source}")]
    PayloadShapeError {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid email address: {0}")]
    AddressError(#[from] lettre::address::AddressError),

    #[error("Mail delivery failed: {message}")]
    MailError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    Notification,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MonitorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MonitorError::ApiError(_) | MonitorError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            MonitorError::PayloadShapeError { .. } => ErrorCategory::Data,
            MonitorError::CsvError(_) | MonitorError::IoError(_) => ErrorCategory::Storage,
            MonitorError::AddressError(_) | MonitorError::MailError { .. } => {
                ErrorCategory::Notification
            }
            MonitorError::ConfigError { .. }
            | MonitorError::MissingConfigError { .. }
            | MonitorError::InvalidConfigValueError { .. }
            | MonitorError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    /// 配置錯誤為致命錯誤，其餘錯誤只影響單一 scope / 記錄 / 通知
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Critical,
            ErrorCategory::Network | ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Notification | ErrorCategory::Storage => ErrorSeverity::Low,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MonitorError::MissingConfigError { field } => {
                format!("Set {} via environment, command line or the config file", field)
            }
            MonitorError::InvalidConfigValueError { field, .. }
            | MonitorError::ConfigValidationError { field, .. } => {
                format!("Check the value configured for {}", field)
            }
            MonitorError::ConfigError { .. } => {
                "Check the configuration file syntax and paths".to_string()
            }
            MonitorError::HttpStatusError { status, .. } if *status == 401 || *status == 403 => {
                "Check that UBER_TOKEN is valid and carries the deliveries scope".to_string()
            }
            MonitorError::HttpStatusError { status, .. } if *status == 404 => {
                "Check the customer id used as scope".to_string()
            }
            MonitorError::ApiError(_) | MonitorError::HttpStatusError { .. } => {
                "Check network connectivity and the API base URL".to_string()
            }
            MonitorError::PayloadShapeError { .. } => {
                "The delivery API response format may have changed".to_string()
            }
            MonitorError::AddressError(_) => "Check EMAIL_FROM and EMAIL_TO addresses".to_string(),
            MonitorError::MailError { .. } => {
                "Check EMAIL_PASSWORD (an app password for Gmail) and SMTP reachability"
                    .to_string()
            }
            MonitorError::CsvError(_) | MonitorError::IoError(_) => {
                "Check that the report directory exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Could not reach the delivery API: {}", self),
            ErrorCategory::Data => format!("Delivery API returned unexpected data: {}", self),
            ErrorCategory::Notification => format!("Could not send alert email: {}", self),
            ErrorCategory::Storage => format!("Could not write the daily report: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
