//! Word-level polarity lexicon with intensifier, negation and hedge handling.

use crate::core::text::tokenize;
use crate::domain::ports::PolarityScorer;
use std::collections::HashMap;

/// 否定詞對後方情緒詞的乘數
const NEGATION_FACTOR: f64 = -0.5;
/// 否定詞往後影響的詞數
const NEGATION_WINDOW: usize = 3;
/// 含有保留語氣詞時整體分數的乘數
const HEDGE_FACTOR: f64 = 0.5;
/// 每個結尾驚嘆號放大的比例
const EXCLAMATION_BOOST: f64 = 0.1;
const MAX_EXCLAMATIONS: usize = 3;

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("brilliant", 0.9),
    ("clean", 0.37),
    ("convenient", 0.5),
    ("cool", 0.35),
    ("easy", 0.43),
    ("efficient", 0.5),
    ("enjoy", 0.4),
    ("enjoyed", 0.4),
    ("excellent", 1.0),
    ("fantastic", 0.4),
    ("fast", 0.2),
    ("favorite", 0.5),
    ("fine", 0.15),
    ("fun", 0.3),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("helpful", 0.5),
    ("impressive", 1.0),
    ("intuitive", 0.5),
    ("like", 0.2),
    ("liked", 0.3),
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("pleasant", 0.73),
    ("recommend", 0.4),
    ("reliable", 0.5),
    ("satisfied", 0.5),
    ("simple", 0.1),
    ("smooth", 0.4),
    ("superb", 1.0),
    ("thanks", 0.2),
    ("useful", 0.3),
    ("wonderful", 1.0),
    ("works", 0.2),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("annoying", -0.8),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("broken", -0.4),
    ("buggy", -0.5),
    ("confusing", -0.3),
    ("crash", -0.4),
    ("crashed", -0.4),
    ("crashes", -0.5),
    ("crashing", -0.5),
    ("difficult", -0.5),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("error", -0.4),
    ("errors", -0.4),
    ("expensive", -0.5),
    ("fail", -0.5),
    ("failed", -0.5),
    ("frustrating", -0.4),
    ("hard", -0.3),
    ("hate", -0.8),
    ("horrible", -1.0),
    ("laggy", -0.5),
    ("poor", -0.4),
    ("problem", -0.3),
    ("sad", -0.5),
    ("slow", -0.3),
    ("stupid", -0.8),
    ("terrible", -1.0),
    ("ugly", -0.7),
    ("unusable", -0.8),
    ("useless", -0.5),
    ("waste", -0.6),
    ("worse", -0.4),
    ("worst", -1.0),
    ("wrong", -0.5),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.4),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("incredibly", 1.5),
    ("quite", 1.1),
    ("really", 1.3),
    ("so", 1.2),
    ("super", 1.4),
    ("totally", 1.3),
    ("very", 1.3),
    // 減弱
    ("kinda", 0.6),
    ("slightly", 0.5),
    ("somewhat", 0.6),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "wasn't", "aren't", "won't",
    "can't", "cannot", "couldn't", "shouldn't", "wouldn't", "hardly", "without", "dont", "cant",
];

const HEDGES: &[&str] = &["guess", "suppose", "maybe", "perhaps", "meh"];

/// 查表式情緒評分：情緒詞分數平均，再套用強化、否定、保留語氣與驚嘆號
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negators: Vec<String>,
    hedges: Vec<String>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        let words = POSITIVE_WORDS
            .iter()
            .chain(NEGATIVE_WORDS)
            .map(|(w, s)| (w.to_string(), *s))
            .collect();
        let intensifiers = INTENSIFIERS
            .iter()
            .map(|(w, m)| (w.to_string(), *m))
            .collect();

        Self {
            words,
            intensifiers,
            negators: NEGATORS.iter().map(|w| w.to_string()).collect(),
            hedges: HEDGES.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// 加入或覆寫詞彙分數（會限制在 [-1, 1]）
    pub fn with_word(mut self, word: &str, score: f64) -> Self {
        self.words
            .insert(word.to_lowercase(), score.clamp(-1.0, 1.0));
        self
    }

    pub fn word_score(&self, word: &str) -> Option<f64> {
        self.words.get(&word.to_lowercase()).copied()
    }

    fn is_negator(&self, token: &str) -> bool {
        self.negators.iter().any(|n| n == token)
    }

    fn is_hedge(&self, token: &str) -> bool {
        self.hedges.iter().any(|h| h == token)
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let tokens: Vec<String> = tokenize(text).iter().map(|t| t.to_lowercase()).collect();

        let mut scores = Vec::new();
        let mut hedged = false;
        let mut modifier = 1.0;
        let mut since_negation: Option<usize> = None;

        for token in &tokens {
            if self.is_negator(token) {
                since_negation = Some(0);
                continue;
            }
            if self.is_hedge(token) {
                hedged = true;
            }

            if let Some(m) = self.intensifiers.get(token) {
                modifier = *m;
            } else if let Some(base) = self.words.get(token) {
                let mut score = base * modifier;
                if since_negation.is_some_and(|n| n < NEGATION_WINDOW) {
                    score *= NEGATION_FACTOR;
                }
                scores.push(score);
                modifier = 1.0;
            } else {
                modifier = 1.0;
            }

            since_negation = since_negation.map(|n| n + 1);
        }

        if scores.is_empty() {
            return 0.0;
        }

        let mut polarity = scores.iter().sum::<f64>() / scores.len() as f64;
        if hedged {
            polarity *= HEDGE_FACTOR;
        }

        let exclamations = text
            .trim_end()
            .chars()
            .rev()
            .take_while(|c| *c == '!')
            .count()
            .min(MAX_EXCLAMATIONS);
        polarity *= 1.0 + EXCLAMATION_BOOST * exclamations as f64;

        polarity.clamp(-1.0, 1.0)
    }
}
