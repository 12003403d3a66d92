use clap::Parser;
use delivery_monitor::core::DayWindow;
use delivery_monitor::domain::ports::Notifier;
use delivery_monitor::utils::logger;
use delivery_monitor::{
    notifier_for, CliArgs, ConsoleNotifier, MonitorConfig, MonitorEngine, MonitorError,
    UberDirectClient,
};

fn exit_with_config_error(e: &MonitorError) -> ! {
    tracing::error!("❌ Configuration validation failed: {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}

fn display_config_summary(config: &MonitorConfig, args: &CliArgs) {
    tracing::info!("📋 Configuration Summary:");
    tracing::info!("  API: {}", config.api.base_url);
    tracing::info!("  Scopes: {}", config.api.scope_ids.join(", "));
    tracing::info!("  Known stores: {}", config.stores.len());
    tracing::info!(
        "  Mail: {}",
        if args.dry_run {
            "dry run (console)".to_string()
        } else if config.mail.is_configured() {
            format!("{} recipients", config.mail.recipients.len())
        } else {
            "not configured (console)".to_string()
        }
    );
    if let Some(report_dir) = &config.report_dir {
        tracing::info!("  Report directory: {}", report_dir);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    // 缺少必要設定時直接結束，不發出任何網路請求
    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => exit_with_config_error(&e),
    };
    if args.verbose {
        display_config_summary(&config, &args);
    }

    let client = match UberDirectClient::new(&config.api) {
        Ok(client) => client,
        Err(e) if e.is_fatal() => exit_with_config_error(&e),
        Err(e) => return Err(e.into()),
    };

    let notifier: Box<dyn Notifier> = if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - alerts are printed, not emailed");
        Box::new(ConsoleNotifier)
    } else {
        notifier_for(&config.mail)
    };

    let window = args
        .date
        .map(DayWindow::new)
        .unwrap_or_else(DayWindow::yesterday);

    let engine = MonitorEngine::from_config(client, notifier, &config);
    let summary = engine.run(window).await;

    tracing::debug!(
        "Run summary: fetched={}, overuse={}, early_cancellations={}, alerts_sent={}",
        summary.fetched,
        summary.overuse.len(),
        summary.early_cancellations.len(),
        summary.alerts_sent
    );

    Ok(())
}
