use crate::domain::model::Dataset;
use crate::domain::ports::FeedbackSource;
use crate::utils::error::Result;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct Snapshot {
    fetched_at: Instant,
    dataset: Dataset,
}

/// 最近一次成功讀取的資料；由呼叫端在每次刷新之間傳遞
#[derive(Debug, Clone, Default)]
pub struct CacheState {
    snapshot: Option<Snapshot>,
}

impl CacheState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn store(dataset: Dataset, now: Instant) -> Self {
        Self {
            snapshot: Some(Snapshot {
                fetched_at: now,
                dataset,
            }),
        }
    }

    pub fn age(&self, now: Instant) -> Option<Duration> {
        self.snapshot
            .as_ref()
            .map(|s| now.saturating_duration_since(s.fetched_at))
    }

    /// TTL 內的快照
    pub fn fresh(&self, now: Instant, ttl: Duration) -> Option<&Dataset> {
        self.snapshot
            .as_ref()
            .filter(|s| now.saturating_duration_since(s.fetched_at) < ttl)
            .map(|s| &s.dataset)
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_none()
    }
}

/// 透過快取讀取：TTL 內直接回傳快照，否則重新抓取；抓取失敗時保留原本的快取
pub async fn load_through<S: FeedbackSource + ?Sized>(
    source: &S,
    cache: CacheState,
    now: Instant,
    ttl: Duration,
) -> (Result<Dataset>, CacheState) {
    if let Some(dataset) = cache.fresh(now, ttl) {
        tracing::debug!(
            "Using cached sheet snapshot ({:?} old, {} rows)",
            cache.age(now).unwrap_or_default(),
            dataset.len()
        );
        return (Ok(dataset.clone()), cache);
    }

    match source.load().await {
        Ok(dataset) => {
            tracing::debug!("Fetched fresh sheet snapshot with {} rows", dataset.len());
            (Ok(dataset.clone()), CacheState::store(dataset, now))
        }
        Err(e) => (Err(e), cache),
    }
}
