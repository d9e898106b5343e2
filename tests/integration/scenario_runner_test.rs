// Integration tests for the scenario runner
//
// Retry budget, worker bound, panic isolation and report ordering, then the
// whole API catalog against the stub service.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use billpay_e2e::config::Suite;
use billpay_e2e::scenarios::{catalog, run_scenarios, Area, Scenario, ScenarioContext};
use billpay_e2e::{ApiClient, HarnessConfig};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use helpers::*;

fn offline_context(workers: usize, retries: u32) -> (ScenarioContext, HarnessConfig) {
    let mut config = HarnessConfig::new("http://127.0.0.1:9", "http://dashboard.test");
    config.runner.workers = workers;
    config.runner.retries = retries;
    let api = ApiClient::new(&config.api).unwrap();
    (ScenarioContext::new(api, Arc::new(config.clone())), config)
}

static FLAKY_CALLS: AtomicU32 = AtomicU32::new(0);

fn flaky_once(_ctx: ScenarioContext) -> BoxFuture<'static, anyhow::Result<()>> {
    async {
        if FLAKY_CALLS.fetch_add(1, Ordering::SeqCst) == 0 {
            bail!("first attempt fails");
        }
        Ok(())
    }
    .boxed()
}

static BROKEN_CALLS: AtomicU32 = AtomicU32::new(0);

fn always_broken(_ctx: ScenarioContext) -> BoxFuture<'static, anyhow::Result<()>> {
    async {
        let attempt = BROKEN_CALLS.fetch_add(1, Ordering::SeqCst) + 1;
        bail!("attempt {} failed", attempt)
    }
    .boxed()
}

fn passes(_ctx: ScenarioContext) -> BoxFuture<'static, anyhow::Result<()>> {
    async { Ok(()) }.boxed()
}

#[tokio::test]
async fn test_retries_mark_flaky_and_keep_last_error() {
    let (ctx, config) = offline_context(2, 2);
    let scenarios = vec![
        Scenario::new(Area::Health, "flaky", flaky_once),
        Scenario::new(Area::Health, "broken", always_broken),
        Scenario::new(Area::Health, "steady", passes),
    ];

    let summary = run_scenarios(scenarios, ctx, &config.runner).await;

    let names: Vec<_> = summary.reports.iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["flaky", "broken", "steady"]);

    let flaky = &summary.reports[0];
    assert!(flaky.passed);
    assert_eq!(flaky.attempts, 2);

    let broken = &summary.reports[1];
    assert!(!broken.passed);
    assert_eq!(broken.attempts, 3);
    assert_eq!(broken.error.as_deref(), Some("attempt 3 failed"));

    assert_eq!(summary.reports[2].attempts, 1);
    assert_eq!(summary.passed(), 2);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.flaky(), 1);
    assert!(!summary.is_success());
}

static RUNNING: AtomicUsize = AtomicUsize::new(0);
static PEAK: AtomicUsize = AtomicUsize::new(0);

fn tracked(_ctx: ScenarioContext) -> BoxFuture<'static, anyhow::Result<()>> {
    async {
        let now = RUNNING.fetch_add(1, Ordering::SeqCst) + 1;
        PEAK.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        RUNNING.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
    .boxed()
}

#[tokio::test]
async fn test_worker_bound() {
    let (ctx, config) = offline_context(3, 0);
    let scenarios = (0..10)
        .map(|_| Scenario::new(Area::Invoices, "tracked", tracked))
        .collect();

    let summary = run_scenarios(scenarios, ctx, &config.runner).await;

    assert_eq!(summary.passed(), 10);
    let peak = PEAK.load(Ordering::SeqCst);
    assert!((1..=3).contains(&peak), "peak concurrency {}", peak);
}

fn panics(_ctx: ScenarioContext) -> BoxFuture<'static, anyhow::Result<()>> {
    async { panic!("scenario blew up") }.boxed()
}

#[tokio::test]
async fn test_panic_is_isolated() {
    let (ctx, config) = offline_context(2, 0);
    let scenarios = vec![
        Scenario::new(Area::Payments, "panics", panics),
        Scenario::new(Area::Payments, "passes", passes),
    ];

    let summary = run_scenarios(scenarios, ctx, &config.runner).await;

    assert!(!summary.reports[0].passed);
    assert!(summary.reports[0]
        .error
        .as_deref()
        .unwrap_or_default()
        .starts_with("panicked"));
    assert!(summary.reports[1].passed);
}

#[tokio::test]
async fn test_summary_serializes() {
    let (ctx, config) = offline_context(1, 0);
    let summary = run_scenarios(
        vec![Scenario::new(Area::Ui, "needs browser", passes)],
        ctx,
        &config.runner,
    )
    .await;

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["reports"][0]["area"], "ui");
    assert_eq!(json["reports"][0]["passed"], false);
    assert_eq!(json["reports"][0]["attempts"], 0);
}

#[actix_web::test]
async fn test_api_catalog_passes_against_stub() {
    let store = new_store();
    let srv = spawn_stub_service(store.clone());
    let config = harness_config(&srv);
    let ctx = ScenarioContext::new(api_client(&srv), config.clone());

    let summary = run_scenarios(catalog(Suite::Api), ctx, &config.runner).await;

    let failures: Vec<_> = summary.failures().map(|r| (r.area, r.name, r.error.clone())).collect();
    assert!(failures.is_empty(), "failed scenarios: {:?}", failures);
    assert_eq!(summary.passed(), 25);
    assert_eq!(summary.flaky(), 0);
    assert!(!store.lock().unwrap().invoices().is_empty());
}
