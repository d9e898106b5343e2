use std::time::Duration;

use anyhow::ensure;
use futures_util::FutureExt;
use tokio::time::Instant;

use super::context::ScenarioContext;
use super::runner::{Area, Scenario};

/// Upper bound for a health check round trip
pub const HEALTH_RESPONSE_BUDGET: Duration = Duration::from_secs(2);

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(Area::Health, "returns healthy status", |ctx| {
            returns_healthy_status(ctx).boxed()
        }),
        Scenario::new(Area::Health, "responds within two seconds", |ctx| {
            responds_quickly(ctx).boxed()
        }),
    ]
}

async fn returns_healthy_status(ctx: ScenarioContext) -> anyhow::Result<()> {
    ensure!(ctx.api.health_check().await?, "health endpoint did not return 2xx");
    Ok(())
}

async fn responds_quickly(ctx: ScenarioContext) -> anyhow::Result<()> {
    let started = Instant::now();
    let healthy = ctx.api.health_check().await?;
    let elapsed = started.elapsed();

    ensure!(healthy, "health endpoint did not return 2xx");
    ensure!(
        elapsed < HEALTH_RESPONSE_BUDGET,
        "health check took {:?}, budget is {:?}",
        elapsed,
        HEALTH_RESPONSE_BUDGET
    );
    Ok(())
}
