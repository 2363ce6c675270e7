use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// 試算表中的一列，欄位名稱 → 原始值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackRow {
    pub data: HashMap<String, serde_json::Value>,
}

impl FeedbackRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(field.to_string(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }
}

/// 一次讀取的完整資料集，欄位順序以試算表表頭為準
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<FeedbackRow>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<FeedbackRow>) -> Self {
        Self { columns, rows }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Positive,
    Neutral,
    Negative,
}

impl Label {
    /// 圖例與折線圖的固定順序
    pub const ALL: [Label; 3] = [Label::Positive, Label::Neutral, Label::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "Positive",
            Label::Neutral => "Neutral",
            Label::Negative => "Negative",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Label::Positive => "😃",
            Label::Neutral => "😐",
            Label::Negative => "😠",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Label::Positive => "red",
            Label::Neutral => "gray",
            Label::Negative => "blue",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// 趨勢圖的日期分組；無法解析的時間戳記歸入 `Unknown`，排在所有日期之後
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateBucket {
    Date(NaiveDate),
    Unknown,
}

impl fmt::Display for DateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateBucket::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DateBucket::Unknown => f.write_str("unknown date"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow {
    pub row: FeedbackRow,
    pub text: String,
    pub label: Label,
    pub polarity: f64,
    /// 沒有時間戳記欄位時為 `None`
    pub date: Option<DateBucket>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateView {
    pub counts: BTreeMap<Label, usize>,
    pub corpus_text: String,
    pub word_frequencies: Vec<(String, usize)>,
    pub daily_trend: BTreeMap<(DateBucket, Label), usize>,
}

impl AggregateView {
    pub fn count(&self, label: Label) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// 折線圖的一條序列，每個日期都有值（缺的補 0）
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub label: Label,
    pub points: Vec<(DateBucket, usize)>,
}

/// 一次刷新交給呈現層的全部內容
#[derive(Debug, Clone, PartialEq)]
pub struct RenderModel {
    pub title: String,
    pub columns: Vec<String>,
    pub text_field: String,
    pub timestamp_field: Option<String>,
    /// 依時間戳記由新到舊排序
    pub latest: Vec<ClassifiedRow>,
    pub view: AggregateView,
    pub percentages: Vec<(Label, f64)>,
    pub trend: Vec<TrendSeries>,
}
