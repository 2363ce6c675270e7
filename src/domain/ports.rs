use crate::domain::model::{Dataset, RenderModel};
use crate::utils::error::{DashboardError, Result};
use async_trait::async_trait;

/// 回饋資料來源（試算表）
#[async_trait]
pub trait FeedbackSource: Send + Sync {
    async fn load(&self) -> Result<Dataset>;
}

/// 文字 → 極性分數，必須落在 [-1.0, 1.0] 且對同一輸入結果固定
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

pub trait Presenter {
    fn render(&mut self, model: &RenderModel) -> std::io::Result<()>;
    fn report_error(&mut self, error: &DashboardError) -> std::io::Result<()>;
}
