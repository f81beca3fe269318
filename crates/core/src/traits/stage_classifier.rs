//! Funnel stage classifier trait
//!
//! A lead reaches:
//! - Stage 1 once every contact field is filled
//! - Stage 2 once the short survey is also complete
//! - Stage 3 once the extended survey is also complete
//!
//! Stages are recomputed from field values on every call and never stored,
//! so re-classification is idempotent and cannot move a lead backwards as
//! fields are filled in.
//!
//! # Example
//!
//! ```ignore
//! use dental_funnel_core::traits::StageClassifier;
//!
//! let classifier = campaign_bridge.stage_classifier();
//! let counts = classifier.aggregate(&records);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::lead::LeadRecord;

/// Funnel milestone reached by a lead, ordered by progress
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    /// Contact details incomplete
    #[default]
    Unstarted,
    /// Contact details captured
    Stage1,
    /// Short survey completed
    Stage2,
    /// Extended survey completed
    Stage3,
}

impl FunnelStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unstarted => "unstarted",
            Self::Stage1 => "stage1",
            Self::Stage2 => "stage2",
            Self::Stage3 => "stage3",
        }
    }
}

/// Milestone counts with "reached at least" semantics: a Stage 3 lead is
/// counted in all three fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCounts {
    pub stage1: usize,
    pub stage2: usize,
    pub stage3: usize,
}

impl StageCounts {
    /// Count one lead that reached `stage`
    pub fn record(&mut self, stage: FunnelStage) {
        if stage >= FunnelStage::Stage1 {
            self.stage1 += 1;
        }
        if stage >= FunnelStage::Stage2 {
            self.stage2 += 1;
        }
        if stage >= FunnelStage::Stage3 {
            self.stage3 += 1;
        }
    }
}

/// Trait for funnel stage classification
pub trait StageClassifier: Send + Sync {
    /// Stage reached by the record's fields, ignoring the household flag
    fn classify(&self, record: &LeadRecord) -> FunnelStage;

    /// Stage for counting purposes; `None` for household-member entries
    fn classify_countable(&self, record: &LeadRecord) -> Option<FunnelStage> {
        if record.household_member {
            None
        } else {
            Some(self.classify(record))
        }
    }

    /// Milestone counts across records, household members excluded
    fn aggregate(&self, records: &[LeadRecord]) -> StageCounts {
        let mut counts = StageCounts::default();
        for stage in records.iter().filter_map(|r| self.classify_countable(r)) {
            counts.record(stage);
        }
        counts
    }

    /// Number of distinct non-blank universal ids
    fn unique_visitor_count(&self, records: &[LeadRecord]) -> usize {
        records
            .iter()
            .filter_map(LeadRecord::visitor_id)
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Classifier over the three fixed field groups
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldGroupClassifier;

impl FieldGroupClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl StageClassifier for FieldGroupClassifier {
    fn classify(&self, record: &LeadRecord) -> FunnelStage {
        if !record.contact.is_complete() {
            return FunnelStage::Unstarted;
        }
        if !record.short_survey.is_complete() {
            return FunnelStage::Stage1;
        }
        if !record.extended_survey.is_complete() {
            return FunnelStage::Stage2;
        }
        FunnelStage::Stage3
    }
}
