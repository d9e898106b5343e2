use std::sync::Arc;

use anyhow::Context;
use billpay_e2e::config::HarnessConfig;
use billpay_e2e::modules::api::ApiClient;
use billpay_e2e::modules::scenarios::{catalog, run_scenarios, ScenarioContext};
use billpay_e2e::modules::ui::ChromeSession;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(config: &HarnessConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("billpay_e2e={}", config.app.log_level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if config.app.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = HarnessConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    init_tracing(&config);

    tracing::info!("Starting Utility Bill Pay E2E harness");
    tracing::info!(
        env = %config.app.env,
        api = %config.api.base_url,
        ui = %config.ui.base_url,
        suite = ?config.runner.suite,
        "Configuration loaded"
    );

    let api = ApiClient::new(&config.api).context("Failed to build API client")?;
    let config = Arc::new(config);
    let mut ctx = ScenarioContext::new(api, config.clone());

    let browser = if config.runner.suite.includes_ui() {
        let session = Arc::new(
            ChromeSession::launch(&config.ui)
                .await
                .context("Failed to launch browser")?,
        );
        ctx = ctx.with_ui(session.clone());
        Some(session)
    } else {
        None
    };

    let summary = run_scenarios(catalog(config.runner.suite), ctx, &config.runner).await;

    if let Some(browser) = browser {
        browser.close().await?;
    }

    for report in summary.failures() {
        tracing::error!(
            area = %report.area,
            scenario = report.name,
            attempts = report.attempts,
            error = report.error.as_deref().unwrap_or_default(),
            "FAILED"
        );
    }
    tracing::info!(
        passed = summary.passed(),
        failed = summary.failed(),
        flaky = summary.flaky(),
        "Summary"
    );

    if !summary.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
