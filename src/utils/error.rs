use thiserror::Error;

/// 取得試算表資料時的失敗原因
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Authentication rejected by sheet endpoint (HTTP {status})")]
    Authentication { status: u16 },

    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Sheet endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("Malformed sheet payload: {message}")]
    Malformed { message: String },
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Required column '{field}' not found in sheet (columns: {})", .available.join(", "))]
    Schema {
        field: String,
        available: Vec<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl From<reqwest::Error> for DashboardError {
    fn from(e: reqwest::Error) -> Self {
        DashboardError::Fetch(FetchError::Network(e))
    }
}

impl From<csv::Error> for DashboardError {
    fn from(e: csv::Error) -> Self {
        DashboardError::Fetch(FetchError::Malformed {
            message: format!("CSV decode error: {}", e),
        })
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::Fetch(FetchError::Malformed {
            message: format!("JSON decode error: {}", e),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Source,
    Schema,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashboardError::Fetch(_) => ErrorCategory::Source,
            DashboardError::Schema { .. } => ErrorCategory::Schema,
            DashboardError::Io(_) => ErrorCategory::System,
            DashboardError::Config { .. }
            | DashboardError::ConfigValidation { .. }
            | DashboardError::InvalidConfigValue { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 下一次刷新會自動重試
            ErrorCategory::Source | ErrorCategory::Schema => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 只影響當次刷新、不應終止程式的錯誤
    pub fn is_tick_scoped(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Source | ErrorCategory::Schema
        )
    }

    /// 程式應結束時的離開碼；`None` 表示繼續下一次刷新。
    /// 單次刷新模式下，刷新失敗一律回傳 1
    pub fn exit_code(&self, single_refresh: bool) -> Option<i32> {
        if self.is_tick_scoped() {
            return single_refresh.then_some(1);
        }
        Some(match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DashboardError::Fetch(FetchError::Authentication { .. }) => {
                "Could not authenticate against the feedback sheet".to_string()
            }
            DashboardError::Fetch(FetchError::Network(_)) => {
                "Could not reach the feedback sheet".to_string()
            }
            DashboardError::Fetch(FetchError::Status { status }) => {
                format!("The feedback sheet answered with HTTP {}", status)
            }
            DashboardError::Fetch(FetchError::Malformed { .. }) => {
                "The feedback sheet returned data that could not be read".to_string()
            }
            DashboardError::Schema { field, .. } => {
                format!("No '{}' column found in the sheet!", field)
            }
            DashboardError::Io(e) => format!("File system error: {}", e),
            DashboardError::Config { message } => format!("Configuration problem: {}", message),
            DashboardError::ConfigValidation { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            DashboardError::InvalidConfigValue { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DashboardError::Fetch(FetchError::Authentication { .. }) => {
                "Check the credential header in the config and the sheet's sharing settings"
                    .to_string()
            }
            DashboardError::Fetch(_) => {
                "The dashboard retries on the next refresh; check the endpoint if it persists"
                    .to_string()
            }
            DashboardError::Schema { available, .. } => format!(
                "Rename one of the sheet columns ({}) or set analysis.text_field",
                available.join(", ")
            ),
            DashboardError::Io(_) => "Check the path and file permissions".to_string(),
            _ => "Fix the configuration file and restart".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
