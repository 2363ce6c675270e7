pub mod aggregate;
pub mod cache;
pub mod classifier;
pub mod dashboard;
pub mod lexicon;
pub mod text;
pub mod timestamp;

pub use crate::domain::model::{AggregateView, ClassifiedRow, Dataset, FeedbackRow, Label};
pub use crate::domain::ports::{FeedbackSource, PolarityScorer, Presenter};
pub use crate::utils::error::Result;
