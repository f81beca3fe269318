//! Stage sync job
//!
//! Recomputes funnel milestone counts over every stored lead and persists
//! them as a summary row. Run after any lead field update; stages are always
//! derived from the current field values, never read back from a stored flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use dental_funnel_core::{LeadRecord, StageClassifier, StageCounts};

use crate::error::Result;
use crate::store::LeadRepository;

/// Aggregate funnel counters for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSummary {
    /// Milestone counts ("reached at least"), household members excluded
    pub counts: StageCounts,
    /// Distinct non-blank visitor ids
    pub unique_visitors: usize,
    pub total_records: usize,
    pub household_members: usize,
    pub signup_count: u64,
    pub computed_at: DateTime<Utc>,
}

impl StageSummary {
    /// Compute a summary from a record set
    pub fn compute(
        classifier: &dyn StageClassifier,
        records: &[LeadRecord],
        signup_count: u64,
    ) -> Self {
        Self {
            counts: classifier.aggregate(records),
            unique_visitors: classifier.unique_visitor_count(records),
            total_records: records.len(),
            household_members: records.iter().filter(|r| r.household_member).count(),
            signup_count,
            computed_at: Utc::now(),
        }
    }

    /// Share of stage 1 leads that went on to complete stage 3
    pub fn completion_rate(&self) -> f64 {
        if self.counts.stage1 == 0 {
            0.0
        } else {
            self.counts.stage3 as f64 / self.counts.stage1 as f64
        }
    }
}

/// Bulk stage recomputation over the lead store
pub struct StageSyncJob {
    classifier: Arc<dyn StageClassifier>,
    store: Arc<dyn LeadRepository>,
}

impl StageSyncJob {
    pub fn new(classifier: Arc<dyn StageClassifier>, store: Arc<dyn LeadRepository>) -> Self {
        Self { classifier, store }
    }

    /// Recompute and persist the stage summary
    pub async fn run(&self) -> Result<StageSummary> {
        let records = self.store.lead_records().await?;
        let signup_count = self.store.signup_count().await?;

        let summary = StageSummary::compute(self.classifier.as_ref(), &records, signup_count);
        self.store.write_stage_summary(&summary).await?;

        tracing::info!(
            stage1 = summary.counts.stage1,
            stage2 = summary.counts.stage2,
            stage3 = summary.counts.stage3,
            unique_visitors = summary.unique_visitors,
            household_members = summary.household_members,
            "Stage counts synced"
        );

        Ok(summary)
    }
}
