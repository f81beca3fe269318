//! funnel-report: recompute stage counts and voucher status for a lead export
//!
//! Usage: `funnel-report <leads.json>` where the file holds an array of lead
//! records. Prints the stage summary and the current voucher offer as JSON.

use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use dental_funnel::{
    InMemoryLeadStore, LeadCaptureService, StageSummary, StageSyncJob, VoucherOffer,
};
use dental_funnel_config::{load_settings, CampaignBridge, Settings};
use dental_funnel_core::LeadRecord;

#[derive(Serialize)]
struct Report {
    campaign_id: String,
    summary: StageSummary,
    offer: VoucherOffer,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Priority: env vars > config/{env} > config/default > defaults
    let env = std::env::var("DENTAL_FUNNEL_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&settings);

    let leads_path = std::env::args()
        .nth(1)
        .context("usage: funnel-report <leads.json>")?;

    let campaign = settings.load_campaign()?;
    let content = std::fs::read_to_string(&leads_path)
        .with_context(|| format!("failed to read {}", leads_path))?;
    let records: Vec<LeadRecord> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", leads_path))?;

    tracing::info!(path = %leads_path, records = records.len(), "Loaded lead export");

    let bridge = CampaignBridge::new(Arc::new(campaign));
    let store = Arc::new(InMemoryLeadStore::with_records(
        bridge.config().household.clone(),
        records,
    ));

    let summary = StageSyncJob::new(bridge.stage_classifier(), store.clone())
        .run()
        .await?;
    let offer = LeadCaptureService::new(
        bridge.voucher_allocator(),
        bridge.stage_classifier(),
        store,
        bridge.config().vouchers.clone(),
    )
    .page_offer()
    .await?;

    let report = Report {
        campaign_id: bridge.config().campaign_id.clone(),
        summary,
        offer,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(&settings.observability.log_level).into());

    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Filter used when `RUST_LOG` is unset: every crate of the workspace,
/// including this binary, at the configured level
fn default_filter(level: &str) -> String {
    format!(
        "funnel_report={level},dental_funnel={level},dental_funnel_config={level}",
        level = level
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_covers_binary_target() {
        let filter = default_filter("debug");
        assert!(filter.contains("funnel_report=debug"));
        assert!(filter.contains("dental_funnel=debug"));
        assert!(filter.contains("dental_funnel_config=debug"));
        assert!(tracing_subscriber::EnvFilter::try_new(&filter).is_ok());
    }
}
