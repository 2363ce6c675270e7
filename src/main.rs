use clap::Parser;
use feedback_sentiment::core::cache::CacheState;
use feedback_sentiment::domain::ports::Presenter;
use feedback_sentiment::utils::{logger, validation::Validate};
use feedback_sentiment::{CliArgs, DashboardConfig, DashboardEngine, TerminalPresenter};
use std::time::Instant;
use tokio::time::MissedTickBehavior;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 載入 TOML 配置
    let mut config = match DashboardConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let level = config.logging.level.clone();
    if config.log_json() {
        logger::init_json_logger(args.verbose, level.as_deref());
    } else {
        logger::init_cli_logger(args.verbose, level.as_deref());
    }

    tracing::info!("🚀 Starting feedback sentiment dashboard");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    args.apply_overrides(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No data will be fetched");
        return Ok(());
    }

    let engine = DashboardEngine::new(config.sheet_source(), config.settings());
    let mut presenter = TerminalPresenter::new(std::io::stdout(), config.table_rows());

    let mut interval = tokio::time::interval(config.refresh_interval());
    // 抓取較慢時順延下一次刷新，不補跑
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut cache = CacheState::empty();

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("👋 Shutting down dashboard");
                break;
            }
        }

        let (result, next_cache) = engine.tick(cache, Instant::now()).await;
        cache = next_cache;

        match result {
            Ok(model) => presenter.render(&model)?,
            Err(e) => {
                tracing::error!(
                    "❌ Refresh failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                presenter.report_error(&e)?;

                if let Some(code) = e.exit_code(args.once) {
                    std::process::exit(code);
                }
            }
        }

        if args.once {
            break;
        }
    }

    Ok(())
}

fn display_config_summary(config: &DashboardConfig, args: &CliArgs) {
    println!("📋 Configuration Summary:");
    println!("  Title: {}", config.title());
    println!("  Source: {} ({:?})", config.source.endpoint, config.source.format);
    println!("  Refresh: every {:?}", config.refresh_interval());
    println!("  Cache TTL: {:?}", config.cache_ttl());
    println!("  Text column: {}", config.text_field());
    match config.timestamp_field() {
        Some(field) => println!("  Timestamp column: {}", field),
        None => println!("  Timestamp column: (trend disabled)"),
    }
    println!("  Stopwords: {}", config.stopwords().len());

    if let Some(headers) = &config.source.headers {
        println!("  Headers: {} custom headers", headers.len());
    }

    if args.once {
        println!("  ⏱️ Single refresh mode");
    }
    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
