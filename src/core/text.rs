//! Tokenizing and stopword handling shared by the scorer and the word-cloud view.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// 文字雲的切詞規則：以字元開頭，可含撇號
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w[\w']*").expect("word pattern is valid"));

/// 常見英文停用詞（文字雲預設清單）
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few",
    "for", "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't",
    "having", "he", "he'd", "he'll", "he's", "hence", "her", "here", "here's", "hers", "herself",
    "him", "himself", "his", "how", "how's", "however", "http", "i", "i'd", "i'll", "i'm",
    "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "k",
    "let's", "like", "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of",
    "off", "on", "once", "only", "or", "other", "otherwise", "ought", "our", "ours",
    "ourselves", "out", "over", "own", "r", "same", "shall", "shan't", "she", "she'd",
    "she'll", "she's", "should", "shouldn't", "since", "so", "some", "such", "than", "that",
    "that's", "the", "their", "theirs", "them", "themselves", "then", "there", "there's",
    "therefore", "these", "they", "they'd", "they'll", "they're", "they've", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "wasn't", "we", "we'd",
    "we'll", "we're", "we've", "were", "weren't", "what", "what's", "when", "when's", "where",
    "where's", "which", "while", "who", "who's", "whom", "why", "why's", "with", "won't",
    "would", "wouldn't", "www", "you", "you'd", "you'll", "you're", "you've", "your", "yours",
    "yourself", "yourselves",
];

/// 回饋內容裡常見但沒有資訊量的詞
pub const FEEDBACK_STOPWORDS: &[&str] = &["app", "okay", "nothing"];

pub fn default_stopwords() -> HashSet<String> {
    DEFAULT_STOPWORDS
        .iter()
        .chain(FEEDBACK_STOPWORDS)
        .map(|w| w.to_string())
        .collect()
}

/// 依字母、數字與撇號切詞，保留原本大小寫
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.replace(['\u{2019}', '\u{2018}'], "'");
    WORD_RE
        .find_iter(&normalized)
        .map(|m| m.as_str().trim_end_matches('\'').to_string())
        .collect()
}

/// 去除停用詞（不分大小寫）後的文字
pub fn strip_stopwords<'a, I>(texts: I, stopwords: &HashSet<String>) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let joined = texts.into_iter().collect::<Vec<_>>().join(" ");
    tokenize(&joined)
        .into_iter()
        .filter(|t| !stopwords.contains(&t.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// 文字雲用的詞頻：忽略單字元與純數字，`'s` 併回原詞；依次數遞減、同次數依字母排序
pub fn word_frequencies(corpus: &str, limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in tokenize(corpus) {
        let mut word = token.to_lowercase();
        if let Some(stem) = word.strip_suffix("'s") {
            word = stem.to_string();
        }
        if word.chars().count() < 2 || word.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    let mut frequencies: Vec<(String, usize)> = counts.into_iter().collect();
    frequencies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    frequencies.truncate(limit);
    frequencies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_keeps_contractions() {
        assert_eq!(
            tokenize("Don’t crash, please!!"),
            vec!["Don't", "crash", "please"]
        );
        assert_eq!(tokenize("  ...  "), Vec::<String>::new());
        assert_eq!(tokenize("'quoted' users' notes"), vec!["quoted", "users", "notes"]);
    }

    #[test]
    fn test_strip_stopwords_case_insensitive() {
        let stopwords = default_stopwords();
        let corpus = strip_stopwords(["The App is GREAT", "Okay, nothing new"], &stopwords);
        assert_eq!(corpus, "GREAT new");
    }

    #[test]
    fn test_only_stopwords_gives_empty_corpus() {
        let stopwords = default_stopwords();
        assert_eq!(strip_stopwords(["it is what it is", "!!!"], &stopwords), "");
        assert!(word_frequencies("", 10).is_empty());
    }

    #[test]
    fn test_word_frequencies_order() {
        let freq = word_frequencies("crash Crash slow 42 x user's user", 10);
        assert_eq!(
            freq,
            vec![
                ("crash".to_string(), 2),
                ("user".to_string(), 2),
                ("slow".to_string(), 1)
            ]
        );
        assert_eq!(
            word_frequencies("bb aa cc aa", 2),
            vec![("aa".to_string(), 2), ("bb".to_string(), 1)]
        );
    }
}
