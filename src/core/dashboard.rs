use crate::core::aggregate::{aggregate_with, AnalysisOptions};
use crate::core::cache::{self, CacheState, DEFAULT_TTL};
use crate::core::classifier::SentimentClassifier;
use crate::core::lexicon::LexiconScorer;
use crate::core::timestamp;
use crate::domain::model::{AggregateView, ClassifiedRow, Dataset, Label, RenderModel, TrendSeries};
use crate::domain::ports::{FeedbackSource, PolarityScorer};
use crate::utils::error::Result;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

pub const DEFAULT_TITLE: &str = "Real-Time Sentiment Detection from Google Feedback";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub title: String,
    pub cache_ttl: Duration,
    pub analysis: AnalysisOptions,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            cache_ttl: DEFAULT_TTL,
            analysis: AnalysisOptions::default(),
        }
    }
}

/// 每次刷新：讀取（經快取）→ 分類 → 彙總 → 產生呈現模型
pub struct DashboardEngine<S: FeedbackSource, P: PolarityScorer = LexiconScorer> {
    source: S,
    classifier: SentimentClassifier<P>,
    settings: DashboardSettings,
}

impl<S: FeedbackSource> DashboardEngine<S, LexiconScorer> {
    pub fn new(source: S, settings: DashboardSettings) -> Self {
        Self::with_scorer(source, LexiconScorer::new(), settings)
    }
}

impl<S: FeedbackSource, P: PolarityScorer> DashboardEngine<S, P> {
    pub fn with_scorer(source: S, scorer: P, settings: DashboardSettings) -> Self {
        Self {
            source,
            classifier: SentimentClassifier::new(scorer),
            settings,
        }
    }

    /// 所有錯誤都只影響這一次刷新；快取狀態一律交回呼叫端
    pub async fn tick(&self, cache: CacheState, now: Instant) -> (Result<RenderModel>, CacheState) {
        let (loaded, cache) =
            cache::load_through(&self.source, cache, now, self.settings.cache_ttl).await;

        let result = loaded.and_then(|dataset| {
            tracing::debug!("Loaded {} rows, columns: {:?}", dataset.len(), dataset.columns);
            let (rows, view) = aggregate_with(&dataset, &self.settings.analysis, &self.classifier)?;
            Ok(build_render_model(&self.settings, &dataset, rows, view))
        });

        match &result {
            Ok(model) => tracing::info!(
                "🔄 Refreshed dashboard: {} reviews ({} positive, {} neutral, {} negative)",
                model.latest.len(),
                model.view.count(Label::Positive),
                model.view.count(Label::Neutral),
                model.view.count(Label::Negative)
            ),
            Err(e) => tracing::warn!("⚠️ Refresh failed: {} (retrying next tick)", e),
        }

        (result, cache)
    }
}

pub fn build_render_model(
    settings: &DashboardSettings,
    dataset: &Dataset,
    mut rows: Vec<ClassifiedRow>,
    view: AggregateView,
) -> RenderModel {
    let timestamp_field = settings
        .analysis
        .timestamp_field
        .clone()
        .filter(|f| dataset.has_column(f));

    // 由新到舊；無法解析的時間排最後，同時間維持原順序
    if let Some(field) = &timestamp_field {
        rows.sort_by_key(|r| {
            let parsed = timestamp::parse_datetime(r.row.get(field));
            (parsed.is_none(), Reverse(parsed))
        });
    }

    let total = view.total();
    let percentages = Label::ALL
        .iter()
        .map(|label| {
            let share = if total == 0 {
                0.0
            } else {
                view.count(*label) as f64 * 100.0 / total as f64
            };
            (*label, share)
        })
        .collect();

    let trend = trend_series(&view);

    RenderModel {
        title: settings.title.clone(),
        columns: dataset.columns.clone(),
        text_field: settings.analysis.text_field.clone(),
        timestamp_field,
        latest: rows,
        view,
        percentages,
        trend,
    }
}

/// 每個標籤一條序列，依 Positive、Neutral、Negative 排列，缺的日期補 0
pub fn trend_series(view: &AggregateView) -> Vec<TrendSeries> {
    if view.daily_trend.is_empty() {
        return Vec::new();
    }

    let dates: BTreeSet<_> = view.daily_trend.keys().map(|(date, _)| *date).collect();
    Label::ALL
        .iter()
        .map(|label| TrendSeries {
            label: *label,
            points: dates
                .iter()
                .map(|date| {
                    let count = view.daily_trend.get(&(*date, *label)).copied().unwrap_or(0);
                    (*date, count)
                })
                .collect(),
        })
        .collect()
}
