use crate::config::toml_config::DashboardConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "feedback-dashboard")]
#[command(about = "Real-time sentiment dashboard for spreadsheet feedback")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "dashboard.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run a single refresh and exit
    #[arg(long)]
    pub once: bool,

    /// Override the refresh interval from config (milliseconds)
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Show the configuration summary without fetching anything
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut DashboardConfig) {
        if let Some(interval) = self.interval_ms {
            config.dashboard.refresh_interval_ms = Some(interval);
            tracing::info!("🔧 Refresh interval overridden to: {}ms", interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args_and_override() {
        let args = CliArgs::parse_from([
            "feedback-dashboard",
            "--config",
            "custom.toml",
            "--interval-ms",
            "2500",
            "--once",
        ]);
        assert_eq!(args.config, "custom.toml");
        assert!(args.once);
        assert!(!args.dry_run);

        let mut config = DashboardConfig::from_toml_str(
            "[source]\nendpoint = \"https://sheets.example.com\"\n",
        )
        .unwrap();
        args.apply_overrides(&mut config);
        assert_eq!(
            config.refresh_interval(),
            std::time::Duration::from_millis(2500)
        );
    }

    #[test]
    fn test_default_config_path() {
        let args = CliArgs::parse_from(["feedback-dashboard"]);
        assert_eq!(args.config, "dashboard.toml");
        assert_eq!(args.interval_ms, None);
    }
}
