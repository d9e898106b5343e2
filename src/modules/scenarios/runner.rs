//! Scenario execution: bounded concurrency, a fixed retry budget per scenario and a
//! pass/fail summary.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{join_all, BoxFuture};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{error, info, warn};

use super::context::ScenarioContext;
use crate::config::RunnerConfig;

pub type ScenarioFn = fn(ScenarioContext) -> BoxFuture<'static, anyhow::Result<()>>;

/// Group a scenario belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Health,
    Invoices,
    Payments,
    Ui,
}

impl Area {
    pub fn needs_browser(&self) -> bool {
        matches!(self, Area::Ui)
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Area::Health => "health",
            Area::Invoices => "invoices",
            Area::Payments => "payments",
            Area::Ui => "ui",
        };
        f.write_str(name)
    }
}

/// A named, independently runnable check
#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub area: Area,
    pub run: ScenarioFn,
}

impl Scenario {
    pub fn new(area: Area, name: &'static str, run: ScenarioFn) -> Self {
        Self { name, area, run }
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("area", &self.area)
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub area: Area,
    pub name: &'static str,
    pub passed: bool,
    pub attempts: u32,
    /// Error of the last attempt when the scenario failed
    pub error: Option<String>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub reports: Vec<ScenarioReport>,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.reports.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.passed()
    }

    /// Scenarios that failed at least once but passed on a retry
    pub fn flaky(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.passed && r.attempts > 1)
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioReport> {
        self.reports.iter().filter(|r| !r.passed)
    }
}

/// Run one scenario, retrying up to `retries` extra times
async fn run_one(scenario: Scenario, ctx: ScenarioContext, retries: u32) -> ScenarioReport {
    let started = Instant::now();
    let mut attempts = 0;
    let mut last_error = None;

    while attempts <= retries {
        attempts += 1;
        match (scenario.run)(ctx.clone()).await {
            Ok(()) => {
                info!(
                    area = %scenario.area,
                    scenario = scenario.name,
                    attempts,
                    "Scenario passed"
                );
                return ScenarioReport {
                    area: scenario.area,
                    name: scenario.name,
                    passed: true,
                    attempts,
                    error: None,
                    duration: started.elapsed(),
                };
            }
            Err(e) => {
                if attempts <= retries {
                    warn!(
                        area = %scenario.area,
                        scenario = scenario.name,
                        attempt = attempts,
                        error = %format!("{:#}", e),
                        "Scenario failed, retrying"
                    );
                }
                last_error = Some(format!("{:#}", e));
            }
        }
    }

    error!(
        area = %scenario.area,
        scenario = scenario.name,
        attempts,
        error = last_error.as_deref().unwrap_or_default(),
        "Scenario failed"
    );
    ScenarioReport {
        area: scenario.area,
        name: scenario.name,
        passed: false,
        attempts,
        error: last_error,
        duration: started.elapsed(),
    }
}

/// Execute scenarios with at most `config.workers` running at once.
///
/// Browser scenarios are reported as failed without running when the context has no
/// UI session. Reports come back in input order.
pub async fn run_scenarios(
    scenarios: Vec<Scenario>,
    ctx: ScenarioContext,
    config: &RunnerConfig,
) -> RunSummary {
    let semaphore = Arc::new(Semaphore::new(config.workers.max(1)));
    let retries = config.retries;
    let mut handles = Vec::with_capacity(scenarios.len());

    info!(
        scenarios = scenarios.len(),
        workers = config.workers,
        retries,
        "Running scenarios"
    );

    for scenario in &scenarios {
        let scenario = *scenario;
        let semaphore = semaphore.clone();
        let ctx = ctx.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            if scenario.area.needs_browser() && !ctx.has_ui() {
                return ScenarioReport {
                    area: scenario.area,
                    name: scenario.name,
                    passed: false,
                    attempts: 0,
                    error: Some("no browser session available".to_string()),
                    duration: Duration::ZERO,
                };
            }
            run_one(scenario, ctx, retries).await
        }));
    }

    let reports = join_all(handles)
        .await
        .into_iter()
        .zip(scenarios.iter())
        .map(|(joined, scenario)| {
            joined.unwrap_or_else(|e| {
                error!(scenario = scenario.name, error = %e, "Scenario task panicked");
                ScenarioReport {
                    area: scenario.area,
                    name: scenario.name,
                    passed: false,
                    attempts: 1,
                    error: Some(format!("panicked: {}", e)),
                    duration: Duration::ZERO,
                }
            })
        })
        .collect();

    let summary = RunSummary { reports };
    info!(
        passed = summary.passed(),
        failed = summary.failed(),
        flaky = summary.flaky(),
        "Run finished"
    );
    summary
}
