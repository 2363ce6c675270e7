pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliArgs;

pub use crate::adapters::sheet::{SheetFormat, SheetSource};
pub use crate::app::terminal::TerminalPresenter;
pub use crate::config::DashboardConfig;
pub use crate::core::aggregate::{aggregate, AnalysisOptions};
pub use crate::core::cache::CacheState;
pub use crate::core::classifier::classify;
pub use crate::core::dashboard::{DashboardEngine, DashboardSettings};
pub use crate::utils::error::{DashboardError, FetchError, Result};
