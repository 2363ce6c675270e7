use crate::domain::model::{Dataset, FeedbackRow};
use crate::domain::ports::FeedbackSource;
use crate::utils::error::{FetchError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// 試算表匯出的資料格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetFormat {
    /// 物件陣列（每列一個物件），或 `{"values": [[表頭...], [列...]]}`
    #[default]
    Json,
    /// 發佈為 CSV 的工作表，第一列為表頭
    Csv,
}

/// 以 HTTP 讀取整張工作表
#[derive(Debug, Clone)]
pub struct SheetSource {
    client: Client,
    endpoint: String,
    format: SheetFormat,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl SheetSource {
    pub fn new(endpoint: impl Into<String>, format: SheetFormat) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            format,
            headers: HashMap::new(),
            timeout: None,
        }
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl FeedbackSource for SheetSource {
    async fn load(&self) -> Result<Dataset> {
        tracing::debug!("Fetching sheet ({:?}) from: {}", self.format, self.endpoint);

        let mut request = self.client.get(&self.endpoint);

        // 認證資訊由設定檔的標頭帶入
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(FetchError::Network)?;
        let status = response.status();
        tracing::debug!("Sheet response status: {}", status);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Authentication {
                status: status.as_u16(),
            }
            .into());
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.text().await.map_err(FetchError::Network)?;
        let dataset = match self.format {
            SheetFormat::Json => parse_json(&body)?,
            SheetFormat::Csv => parse_csv(&body)?,
        };

        tracing::debug!(
            "Decoded {} rows with columns {:?}",
            dataset.len(),
            dataset.columns
        );
        Ok(dataset)
    }
}

/// 表頭名稱去除前後空白
pub fn normalize_header(name: &str) -> String {
    name.trim().to_string()
}

fn push_column(columns: &mut Vec<String>, name: &str) {
    if !columns.iter().any(|c| c == name) {
        columns.push(name.to_string());
    }
}

pub fn parse_json(body: &str) -> Result<Dataset> {
    let payload: serde_json::Value = serde_json::from_str(body)?;

    match payload {
        serde_json::Value::Array(items) => {
            let mut columns = Vec::new();
            let mut rows = Vec::with_capacity(items.len());

            for (index, item) in items.into_iter().enumerate() {
                let serde_json::Value::Object(obj) = item else {
                    return Err(FetchError::Malformed {
                        message: format!("row {} is not an object", index + 1),
                    }
                    .into());
                };

                let mut data = HashMap::new();
                for (key, value) in obj {
                    let name = normalize_header(&key);
                    push_column(&mut columns, &name);
                    data.insert(name, value);
                }
                rows.push(FeedbackRow { data });
            }

            Ok(Dataset::new(columns, rows))
        }
        serde_json::Value::Object(mut obj) => match obj.remove("values") {
            Some(serde_json::Value::Array(values)) => parse_value_grid(values),
            _ => Err(FetchError::Malformed {
                message: "expected an array of rows or a 'values' grid".to_string(),
            }
            .into()),
        },
        _ => Err(FetchError::Malformed {
            message: "expected an array of rows or a 'values' grid".to_string(),
        }
        .into()),
    }
}

/// `values` 形式：第一列為表頭，其餘為資料列（較短的列視為缺欄）
fn parse_value_grid(values: Vec<serde_json::Value>) -> Result<Dataset> {
    let mut grid = values.into_iter();

    let columns: Vec<String> = match grid.next() {
        Some(serde_json::Value::Array(header)) => header
            .iter()
            .map(|cell| match cell {
                serde_json::Value::String(s) => normalize_header(s),
                other => normalize_header(&other.to_string()),
            })
            .collect(),
        Some(_) => {
            return Err(FetchError::Malformed {
                message: "header row is not an array".to_string(),
            }
            .into())
        }
        None => return Ok(Dataset::default()),
    };

    let mut rows = Vec::new();
    for (index, line) in grid.enumerate() {
        let serde_json::Value::Array(cells) = line else {
            return Err(FetchError::Malformed {
                message: format!("row {} is not an array", index + 2),
            }
            .into());
        };

        let data = columns
            .iter()
            .cloned()
            .zip(cells)
            .collect::<HashMap<_, _>>();
        rows.push(FeedbackRow { data });
    }

    Ok(Dataset::new(columns, rows))
}

pub fn parse_csv(body: &str) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let data = columns
            .iter()
            .cloned()
            .zip(record.iter().map(|cell| serde_json::Value::String(cell.to_string())))
            .collect::<HashMap<_, _>>();
        rows.push(FeedbackRow { data });
    }

    Ok(Dataset::new(columns, rows))
}
