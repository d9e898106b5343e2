// Scenarios module: the contract checks and the runner executing them

pub mod checks;
pub mod context;
pub mod health;
pub mod invoices;
pub mod payments;
pub mod runner;
pub mod ui;

pub use context::{ScenarioContext, UiSession};
pub use runner::{run_scenarios, Area, RunSummary, Scenario, ScenarioFn, ScenarioReport};

use crate::config::Suite;

/// Every scenario the suite selects, API areas first
pub fn catalog(suite: Suite) -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    if suite.includes_api() {
        scenarios.extend(health::scenarios());
        scenarios.extend(invoices::scenarios());
        scenarios.extend(payments::scenarios());
    }
    if suite.includes_ui() {
        scenarios.extend(ui::scenarios());
    }
    scenarios
}
