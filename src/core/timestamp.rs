use crate::domain::model::DateBucket;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    // Google 表單的時間戳記格式
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// 早於 2001-09-09 的秒數不當成 unix 時間，避免年份或序號落到 1970
const MIN_UNIX_SECONDS: i64 = 1_000_000_000;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// 寬鬆解析時間戳記欄位，無法辨識的值歸入 `DateBucket::Unknown`
pub fn parse_bucket(value: Option<&serde_json::Value>) -> DateBucket {
    parse_datetime(value)
        .map(|dt| DateBucket::Date(dt.date()))
        .unwrap_or(DateBucket::Unknown)
}

/// 只有日期的值視為當天 00:00
pub fn parse_datetime(value: Option<&serde_json::Value>) -> Option<NaiveDateTime> {
    match value? {
        serde_json::Value::String(s) => parse_str(s),
        serde_json::Value::Number(n) => n.as_i64().and_then(from_unix),
        _ => None,
    }
}

pub fn parse_str(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    if s.chars().all(|c| c.is_ascii_digit()) {
        // 20240101 這類緊湊日期
        if s.len() == 8 {
            return NaiveDate::parse_from_str(s, "%Y%m%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0));
        }
        return s.parse::<i64>().ok().and_then(from_unix);
    }

    None
}

fn from_unix(seconds: i64) -> Option<NaiveDateTime> {
    if seconds < MIN_UNIX_SECONDS {
        return None;
    }
    DateTime::from_timestamp(seconds, 0).map(|dt| dt.naive_utc())
}
