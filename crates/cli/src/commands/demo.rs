use anyhow::{Context, Result};
use serde::Serialize;

use outfitter_agent::{BriefParser, ParseMethod, ParsedBrief};
use outfitter_core::catalog::{Catalog, RetailerDirectory};
use outfitter_core::checkout::{simulate_checkout, CheckoutStep};
use outfitter_core::config::{AppConfig, LoadOptions};
use outfitter_core::discovery::{discover, Discovery};
use outfitter_core::domain::brief::ShoppingBrief;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct DemoReport {
    message: String,
    parsing_method: ParseMethod,
    spec: ShoppingBrief,
    discovery: Discovery,
    checkout_steps: Vec<CheckoutStep>,
}

pub fn run(message: &str) -> CommandResult {
    match build_report(message) {
        Ok(report) => {
            let output = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|error| format!("{{\"error\":\"{error}\"}}"));
            CommandResult { exit_code: 0, output }
        }
        Err(error) => CommandResult { exit_code: 1, output: format!("demo failed: {error:#}") },
    }
}

fn build_report(message: &str) -> Result<DemoReport> {
    let config = AppConfig::load(LoadOptions::default()).context("configuration failed to load")?;
    let parser = BriefParser::from_config(&config.llm).context("brief parser setup failed")?;

    let catalog = Catalog::builtin();
    let directory = RetailerDirectory::builtin();
    catalog.validate(&directory).context("catalog integrity check failed")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to initialize async runtime")?;
    let ParsedBrief { brief, method } = runtime.block_on(parser.parse(message));

    let discovery =
        discover(&brief, &catalog, &directory).context("discovery pass failed")?;
    let checkout_steps = simulate_checkout(&discovery.auto_cart, &directory);

    Ok(DemoReport {
        message: message.to_string(),
        parsing_method: method,
        spec: brief,
        discovery,
        checkout_steps,
    })
}
