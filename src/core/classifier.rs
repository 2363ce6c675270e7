use crate::core::lexicon::LexiconScorer;
use crate::domain::model::Label;
use crate::domain::ports::PolarityScorer;
use std::sync::OnceLock;

/// 高於此值為正向（不含等於）
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// 低於此值為負向（不含等於）
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

impl Label {
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > POSITIVE_THRESHOLD {
            Label::Positive
        } else if polarity < NEGATIVE_THRESHOLD {
            Label::Negative
        } else {
            Label::Neutral
        }
    }
}

/// 將一段文字分類為 (標籤, 極性)；任何輸入都有結果
#[derive(Debug, Clone, Default)]
pub struct SentimentClassifier<S: PolarityScorer = LexiconScorer> {
    scorer: S,
}

impl<S: PolarityScorer> SentimentClassifier<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn classify(&self, text: &str) -> (Label, f64) {
        let raw = self.scorer.polarity(text);
        // 外掛評分器回傳 NaN 或超出範圍時仍維持合約
        let polarity = if raw.is_nan() { 0.0 } else { raw.clamp(-1.0, 1.0) };
        (Label::from_polarity(polarity), polarity)
    }
}

/// 使用預設詞典分類
pub fn classify(text: &str) -> (Label, f64) {
    static DEFAULT: OnceLock<SentimentClassifier> = OnceLock::new();
    DEFAULT
        .get_or_init(|| SentimentClassifier::new(LexiconScorer::new()))
        .classify(text)
}
