#[cfg(feature = "lambda")]
use delivery_monitor::core::DayWindow;
#[cfg(feature = "lambda")]
use delivery_monitor::utils::logger;
#[cfg(feature = "lambda")]
use delivery_monitor::{
    notifier_for, ConfigOverrides, MonitorConfig, MonitorEngine, RunSummary, TomlConfig,
    UberDirectClient,
};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

/// Scheduled (EventBridge) trigger; the event payload is not used.
#[cfg(feature = "lambda")]
async fn function_handler(_event: LambdaEvent<serde_json::Value>) -> Result<RunSummary, Error> {
    tracing::info!("Starting delivery monitor Lambda function");

    let overrides = ConfigOverrides::from_env();
    let file = match &overrides.config_path {
        Some(path) => Some(TomlConfig::from_file(path)?),
        None => None,
    };
    let config = MonitorConfig::resolve(file, overrides)?;

    let client = UberDirectClient::new(&config.api)?;
    let notifier = notifier_for(&config.mail);
    let engine = MonitorEngine::from_config(client, notifier, &config);

    let summary = engine.run(DayWindow::yesterday()).await;

    tracing::info!(
        fetched = summary.fetched,
        alerts_sent = summary.alerts_sent,
        "Delivery monitor Lambda function completed"
    );
    Ok(summary)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
