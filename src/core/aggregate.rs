use crate::core::classifier::SentimentClassifier;
use crate::core::lexicon::LexiconScorer;
use crate::core::text::{self, default_stopwords};
use crate::core::timestamp;
use crate::domain::model::{AggregateView, ClassifiedRow, Dataset, Label};
use crate::domain::ports::PolarityScorer;
use crate::utils::error::{DashboardError, Result};
use std::collections::{BTreeMap, HashSet};

pub const DEFAULT_TEXT_FIELD: &str = "Reviews";
pub const DEFAULT_TIMESTAMP_FIELD: &str = "Timestamp";
pub const DEFAULT_MAX_WORDS: usize = 50;

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub text_field: String,
    pub timestamp_field: Option<String>,
    pub stopwords: HashSet<String>,
    pub max_words: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            text_field: DEFAULT_TEXT_FIELD.to_string(),
            timestamp_field: Some(DEFAULT_TIMESTAMP_FIELD.to_string()),
            stopwords: default_stopwords(),
            max_words: DEFAULT_MAX_WORDS,
        }
    }
}

/// 將儲存格的值轉成文字；數字等非字串值不可讓分類失敗
pub fn coerce_text(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// 以預設詞典分類並彙總
pub fn aggregate(
    dataset: &Dataset,
    options: &AnalysisOptions,
) -> Result<(Vec<ClassifiedRow>, AggregateView)> {
    aggregate_with(dataset, options, &SentimentClassifier::<LexiconScorer>::default())
}

pub fn aggregate_with<S: PolarityScorer>(
    dataset: &Dataset,
    options: &AnalysisOptions,
    classifier: &SentimentClassifier<S>,
) -> Result<(Vec<ClassifiedRow>, AggregateView)> {
    // 缺少文字欄位時整批失敗，不產生部分結果
    if !dataset.has_column(&options.text_field) {
        return Err(DashboardError::Schema {
            field: options.text_field.clone(),
            available: dataset.columns.clone(),
        });
    }

    let timestamp_field = options
        .timestamp_field
        .as_deref()
        .filter(|f| dataset.has_column(f));

    let classified: Vec<ClassifiedRow> = dataset
        .rows
        .iter()
        .map(|row| {
            let text = coerce_text(row.get(&options.text_field));
            let (label, polarity) = classifier.classify(&text);
            let date = timestamp_field.map(|f| timestamp::parse_bucket(row.get(f)));
            ClassifiedRow {
                row: row.clone(),
                text,
                label,
                polarity,
                date,
            }
        })
        .collect();

    let mut counts: BTreeMap<Label, usize> = Label::ALL.iter().map(|l| (*l, 0)).collect();
    let mut daily_trend = BTreeMap::new();
    for row in &classified {
        *counts.entry(row.label).or_insert(0) += 1;
        if let Some(date) = row.date {
            *daily_trend.entry((date, row.label)).or_insert(0) += 1;
        }
    }

    let corpus_text = text::strip_stopwords(
        classified.iter().map(|r| r.text.as_str()),
        &options.stopwords,
    );
    let word_frequencies = text::word_frequencies(&corpus_text, options.max_words);

    tracing::debug!(
        "Aggregated {} rows: {} positive, {} neutral, {} negative, {} trend buckets",
        classified.len(),
        counts[&Label::Positive],
        counts[&Label::Neutral],
        counts[&Label::Negative],
        daily_trend.len()
    );

    Ok((
        classified,
        AggregateView {
            counts,
            corpus_text,
            word_frequencies,
            daily_trend,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DateBucket, FeedbackRow};
    use chrono::NaiveDate;
    use serde_json::json;

    fn dataset(rows: Vec<FeedbackRow>) -> Dataset {
        Dataset::new(vec!["Timestamp".to_string(), "Reviews".to_string()], rows)
    }

    fn row(ts: &str, text: impl Into<serde_json::Value>) -> FeedbackRow {
        FeedbackRow::new().with("Timestamp", ts).with("Reviews", text)
    }

    fn day(d: u32) -> DateBucket {
        DateBucket::Date(NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
    }

    #[test]
    fn test_reference_scenario() {
        let data = dataset(vec![
            row("2024-01-01", "Great app, love it!"),
            row("2024-01-01", "Terrible, crashes always"),
            row("2024-01-02", "It's fine I guess"),
        ]);

        let (rows, view) = aggregate(&data, &AnalysisOptions::default()).unwrap();

        let labels: Vec<Label> = rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec![Label::Positive, Label::Negative, Label::Neutral]);
        assert_eq!(view.count(Label::Positive), 1);
        assert_eq!(view.count(Label::Negative), 1);
        assert_eq!(view.count(Label::Neutral), 1);

        let dates: HashSet<DateBucket> = view.daily_trend.keys().map(|(d, _)| *d).collect();
        assert_eq!(dates.len(), 2);
        assert_eq!(view.daily_trend[&(day(1), Label::Positive)], 1);
        assert_eq!(view.daily_trend[&(day(1), Label::Negative)], 1);
        assert_eq!(view.daily_trend[&(day(2), Label::Neutral)], 1);
    }

    #[test]
    fn test_numeric_review_is_coerced() {
        let data = dataset(vec![row("2024-01-01", json!(5))]);
        let (rows, _) = aggregate(&data, &AnalysisOptions::default()).unwrap();
        assert_eq!(rows[0].text, "5");
        assert_eq!(rows[0].label, Label::Neutral);
        assert_eq!(rows[0].polarity, 0.0);
    }

    #[test]
    fn test_unparsable_timestamp_goes_to_unknown_bucket() {
        let data = dataset(vec![
            row("not-a-date", "good"),
            row("2024-01-02", "good"),
        ]);
        let (rows, view) = aggregate(&data, &AnalysisOptions::default()).unwrap();
        assert_eq!(rows[0].date, Some(DateBucket::Unknown));
        assert_eq!(view.daily_trend[&(DateBucket::Unknown, Label::Positive)], 1);
        // 未知日期排在最後
        let first = view.daily_trend.keys().next().unwrap();
        assert_eq!(first.0, day(2));
    }

    #[test]
    fn test_missing_text_column_is_schema_error() {
        let data = Dataset::new(
            vec!["Timestamp".to_string(), "Comment".to_string()],
            vec![FeedbackRow::new().with("Comment", "great")],
        );
        let err = aggregate(&data, &AnalysisOptions::default()).unwrap_err();
        match err {
            DashboardError::Schema { field, available } => {
                assert_eq!(field, "Reviews");
                assert_eq!(available, vec!["Timestamp", "Comment"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_counts_zero_filled_and_sum_to_len() {
        let data = dataset(vec![row("2024-01-01", "good"), row("2024-01-01", "nice")]);
        let (rows, view) = aggregate(&data, &AnalysisOptions::default()).unwrap();
        assert_eq!(view.counts.len(), 3);
        assert_eq!(view.count(Label::Negative), 0);
        assert_eq!(view.total(), rows.len());

        let (_, empty) = aggregate(&dataset(vec![]), &AnalysisOptions::default()).unwrap();
        assert_eq!(empty.counts.len(), 3);
        assert_eq!(empty.total(), 0);
    }

    #[test]
    fn test_no_timestamp_column_skips_trend() {
        let data = Dataset::new(
            vec!["Reviews".to_string()],
            vec![FeedbackRow::new().with("Reviews", "great")],
        );
        let (rows, view) = aggregate(&data, &AnalysisOptions::default()).unwrap();
        assert!(view.daily_trend.is_empty());
        assert_eq!(rows[0].date, None);
    }

    #[test]
    fn test_order_preserved_and_idempotent() {
        let texts = ["bad", "good", "meh", "awful", "love it", "5"];
        let data = dataset(texts.iter().map(|t| row("2024-01-03", *t)).collect());
        let options = AnalysisOptions::default();

        let (first, view_a) = aggregate(&data, &options).unwrap();
        let (second, view_b) = aggregate(&data, &options).unwrap();

        let order: Vec<&str> = first.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(order, texts);
        assert_eq!(view_a.counts, view_b.counts);
        let labels_a: Vec<Label> = first.iter().map(|r| r.label).collect();
        let labels_b: Vec<Label> = second.iter().map(|r| r.label).collect();
        assert_eq!(labels_a, labels_b);
    }

    #[test]
    fn test_corpus_removes_stopwords() {
        let data = dataset(vec![
            row("2024-01-01", "The app is okay"),
            row("2024-01-01", "Nothing works"),
        ]);
        let mut options = AnalysisOptions::default();
        options.stopwords.insert("works".to_string());
        let (_, view) = aggregate(&data, &options).unwrap();
        assert_eq!(view.corpus_text, "");
        assert!(view.word_frequencies.is_empty());
    }

    #[test]
    fn test_null_and_missing_cells_are_empty_text() {
        let data = dataset(vec![
            FeedbackRow::new().with("Timestamp", "2024-01-01"),
            row("2024-01-01", serde_json::Value::Null),
        ]);
        let (rows, view) = aggregate(&data, &AnalysisOptions::default()).unwrap();
        assert!(rows.iter().all(|r| r.text.is_empty()));
        assert_eq!(view.count(Label::Neutral), 2);
    }
}
