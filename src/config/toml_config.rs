use crate::adapters::sheet::{SheetFormat, SheetSource};
use crate::core::aggregate::{
    AnalysisOptions, DEFAULT_MAX_WORDS, DEFAULT_TEXT_FIELD, DEFAULT_TIMESTAMP_FIELD,
};
use crate::core::dashboard::{DashboardSettings, DEFAULT_REFRESH_INTERVAL, DEFAULT_TITLE};
use crate::core::text::default_stopwords;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TABLE_ROWS: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub dashboard: DashboardSection,
    pub source: SourceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardSection {
    pub title: Option<String>,
    pub refresh_interval_ms: Option<u64>,
    pub table_rows: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub endpoint: String,
    #[serde(default)]
    pub format: SheetFormat,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheConfig {
    pub ttl_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisConfig {
    pub text_field: Option<String>,
    /// 空字串表示不畫趨勢圖
    pub timestamp_field: Option<String>,
    pub use_default_stopwords: Option<bool>,
    pub extra_stopwords: Option<Vec<String>>,
    pub max_words: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

impl DashboardConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashboardError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashboardError::ConfigValidation {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SHEET_TOKEN})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashboardError::Config {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!("Environment variable {} is not set", var_name);
                format!("${{{}}}", var_name)
            })
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.endpoint", &self.source.endpoint)?;

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 600)?;
        }

        if let Some(interval) = self.dashboard.refresh_interval_ms {
            validation::validate_range("dashboard.refresh_interval_ms", interval, 100, 86_400_000)?;
        }

        if let Some(rows) = self.dashboard.table_rows {
            validation::validate_positive_number("dashboard.table_rows", rows, 1)?;
        }

        if let Some(max_words) = self.analysis.max_words {
            validation::validate_positive_number("analysis.max_words", max_words, 1)?;
        }

        validation::validate_non_empty_string("analysis.text_field", &self.text_field())?;

        if let Some(format) = &self.logging.format {
            let valid_formats = ["compact", "json"];
            if !valid_formats.contains(&format.as_str()) {
                return Err(DashboardError::InvalidConfigValue {
                    field: "logging.format".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        valid_formats.join(", ")
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn title(&self) -> String {
        self.dashboard
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    pub fn refresh_interval(&self) -> Duration {
        self.dashboard
            .refresh_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REFRESH_INTERVAL)
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache
            .ttl_seconds
            .map(Duration::from_secs)
            .unwrap_or(crate::core::cache::DEFAULT_TTL)
    }

    pub fn table_rows(&self) -> usize {
        self.dashboard.table_rows.unwrap_or(DEFAULT_TABLE_ROWS)
    }

    pub fn text_field(&self) -> String {
        // 與試算表表頭一樣去除前後空白
        self.analysis
            .text_field
            .as_deref()
            .map(|field| field.trim().to_string())
            .unwrap_or_else(|| DEFAULT_TEXT_FIELD.to_string())
    }

    pub fn timestamp_field(&self) -> Option<String> {
        match &self.analysis.timestamp_field {
            Some(field) if field.trim().is_empty() => None,
            Some(field) => Some(field.trim().to_string()),
            None => Some(DEFAULT_TIMESTAMP_FIELD.to_string()),
        }
    }

    pub fn stopwords(&self) -> HashSet<String> {
        let mut stopwords = if self.analysis.use_default_stopwords.unwrap_or(true) {
            default_stopwords()
        } else {
            HashSet::new()
        };
        if let Some(extra) = &self.analysis.extra_stopwords {
            stopwords.extend(extra.iter().map(|w| w.trim().to_lowercase()));
        }
        stopwords
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            text_field: self.text_field(),
            timestamp_field: self.timestamp_field(),
            stopwords: self.stopwords(),
            max_words: self.analysis.max_words.unwrap_or(DEFAULT_MAX_WORDS),
        }
    }

    pub fn settings(&self) -> DashboardSettings {
        DashboardSettings {
            title: self.title(),
            cache_ttl: self.cache_ttl(),
            analysis: self.analysis_options(),
        }
    }

    pub fn sheet_source(&self) -> SheetSource {
        SheetSource::new(self.source.endpoint.clone(), self.source.format)
            .with_headers(self.source.headers.clone().unwrap_or_default())
            .with_timeout(self.source.timeout_seconds.map(Duration::from_secs))
    }

    pub fn log_json(&self) -> bool {
        self.logging.format.as_deref() == Some("json")
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
