use crate::core::aggregate::coerce_text;
use crate::domain::model::{Label, RenderModel};
use crate::domain::ports::Presenter;
use crate::utils::error::DashboardError;
use std::io::Write;

const MAX_REVIEW_WIDTH: usize = 60;
const TOP_WORDS_SHOWN: usize = 15;

/// 純文字儀表板，寫到任意 `Write`（預設為 stdout）
pub struct TerminalPresenter<W: Write> {
    out: W,
    table_rows: usize,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, table_rows: usize) -> Self {
        Self { out, table_rows }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn truncate(text: &str, width: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= width {
        single_line
    } else {
        let cut: String = single_line.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn bar(percent: f64) -> String {
    "█".repeat((percent / 5.0).round() as usize)
}

/// 表情摘要行，依 Positive、Neutral、Negative 排列
pub fn summary_line(model: &RenderModel) -> String {
    Label::ALL
        .iter()
        .map(|label| {
            format!(
                "{} {}: {}",
                label.emoji(),
                label,
                model.view.count(*label)
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render(&mut self, model: &RenderModel) -> std::io::Result<()> {
        let out = &mut self.out;

        writeln!(out, "📊 {}", model.title)?;
        writeln!(out, "columns from sheet: {:?}", model.columns)?;
        writeln!(out)?;

        writeln!(out, "📝 Latest Feedback")?;
        let ts_header = model.timestamp_field.as_deref().unwrap_or("Timestamp");
        writeln!(
            out,
            "{:<20} | {:>8} | {:<9} | {}",
            ts_header, "Polarity", "Sentiment", model.text_field
        )?;
        for row in model.latest.iter().take(self.table_rows) {
            let ts = model
                .timestamp_field
                .as_deref()
                .map(|f| coerce_text(row.row.get(f)))
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                out,
                "{:<20} | {:>8.3} | {:<9} | {}",
                truncate(&ts, 20),
                row.polarity,
                row.label,
                truncate(&row.text, MAX_REVIEW_WIDTH)
            )?;
        }
        if model.latest.len() > self.table_rows {
            writeln!(out, "… {} more", model.latest.len() - self.table_rows)?;
        }
        writeln!(out)?;

        writeln!(out, "😊 Emoji-Based Sentiment Summary")?;
        writeln!(out, "{}", summary_line(model))?;
        writeln!(out)?;

        writeln!(out, "☁️ Word Cloud of Reviews")?;
        if model.view.word_frequencies.is_empty() {
            writeln!(out, "(no words to show)")?;
        } else {
            let words = model
                .view
                .word_frequencies
                .iter()
                .take(TOP_WORDS_SHOWN)
                .map(|(word, count)| format!("{} ({})", word, count))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(out, "{}", words)?;
        }
        writeln!(out)?;

        writeln!(out, "📊 Sentiment Distribution")?;
        for (label, percent) in &model.percentages {
            writeln!(out, "{:<9} {:>5.1}% {}", label, percent, bar(*percent))?;
        }

        if !model.trend.is_empty() {
            writeln!(out)?;
            writeln!(out, "📈 Sentiment Trend Over Time")?;
            let titles: Vec<String> = model
                .trend
                .iter()
                .map(|s| format!("{} ({})", s.label, s.label.color()))
                .collect();
            writeln!(out, "{:<12} {}", "Date", titles.join(" "))?;

            let dates = model.trend[0].points.iter().map(|(date, _)| *date);
            for (i, date) in dates.enumerate() {
                let counts = model
                    .trend
                    .iter()
                    .zip(&titles)
                    .map(|(s, title)| format!("{:>width$}", s.points[i].1, width = title.len()))
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(out, "{:<12} {}", date.to_string(), counts)?;
            }
        }

        writeln!(out)?;
        out.flush()
    }

    fn report_error(&mut self, error: &DashboardError) -> std::io::Result<()> {
        writeln!(self.out, "🛑 {}", error.user_friendly_message())?;
        writeln!(self.out, "💡 {}", error.recovery_suggestion())?;
        writeln!(self.out)?;
        self.out.flush()
    }
}
