//! Lead capture service
//!
//! Backs the landing page: the voucher offer shown on page load and the
//! signup submission that claims it. Survey answers are saved against an
//! existing lead.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use dental_funnel_config::VoucherConfig;
use dental_funnel_core::{
    ExtendedSurvey, FunnelStage, LeadRecord, ShortSurvey, StageClassifier, VoucherAllocator,
    VoucherTier,
};

use crate::error::Result;
use crate::store::{LeadChange, LeadMutation, LeadRepository, SignupReceipt};

/// Voucher offer rendered on page load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherOffer {
    pub value: u32,
    /// Value with currency symbol, e.g. "£50"
    pub display_value: String,
    pub message: String,
    /// "X vouchers left" counter
    pub remaining_in_batch: u64,
    pub signup_count: u64,
}

/// Result of a signup submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupOutcome {
    pub receipt: SignupReceipt,
    /// Tier the new lead claimed
    pub tier: VoucherTier,
    pub display_value: String,
    /// Counter shown to the next visitor
    pub remaining_in_batch: u64,
    /// Restock banner, set when this signup completed a batch
    pub announcement: Option<String>,
}

pub struct LeadCaptureService {
    allocator: Arc<dyn VoucherAllocator>,
    classifier: Arc<dyn StageClassifier>,
    store: Arc<dyn LeadRepository>,
    vouchers: VoucherConfig,
}

impl LeadCaptureService {
    pub fn new(
        allocator: Arc<dyn VoucherAllocator>,
        classifier: Arc<dyn StageClassifier>,
        store: Arc<dyn LeadRepository>,
        vouchers: VoucherConfig,
    ) -> Self {
        Self {
            allocator,
            classifier,
            store,
            vouchers,
        }
    }

    /// Offer for the next visitor. Read-only: does not touch the counter.
    pub async fn page_offer(&self) -> Result<VoucherOffer> {
        let signup_count = self.store.signup_count().await?;
        let tier = self.allocator.current_tier(signup_count);

        Ok(VoucherOffer {
            value: tier.value,
            display_value: self.vouchers.format_value(tier.value),
            message: tier.message.clone(),
            remaining_in_batch: self.allocator.remaining_in_batch(signup_count),
            signup_count,
        })
    }

    /// Record a new lead and work out its voucher.
    ///
    /// The lead claims the tier that was on offer before its own signup,
    /// i.e. the tier for position `signup_count - 1`.
    pub async fn submit(&self, record: LeadRecord) -> Result<SignupOutcome> {
        let receipt = self.store.record_signup(record).await?;
        let count = receipt.signup_count;

        let tier = self
            .allocator
            .current_tier(count.saturating_sub(1))
            .clone();
        let announcement = self
            .allocator
            .should_announce_new_batch(count)
            .then(|| self.allocator.batch_announcement_message(count));

        if let Some(message) = &announcement {
            tracing::info!(signup_count = count, %message, "Voucher batch released");
        }
        tracing::info!(
            lead_id = %receipt.lead_id,
            signup_count = count,
            voucher_value = tier.value,
            "Lead captured"
        );

        Ok(SignupOutcome {
            display_value: self.vouchers.format_value(tier.value),
            remaining_in_batch: self.allocator.remaining_in_batch(count),
            tier,
            announcement,
            receipt,
        })
    }

    /// Save short survey answers and return the lead's new stage
    pub async fn save_short_survey(
        &self,
        lead_id: Uuid,
        answers: ShortSurvey,
    ) -> Result<FunnelStage> {
        let change: LeadMutation = Box::new(move |record| record.short_survey = answers);
        self.update(lead_id, change).await
    }

    /// Save extended survey answers and return the lead's new stage
    pub async fn save_extended_survey(
        &self,
        lead_id: Uuid,
        answers: ExtendedSurvey,
    ) -> Result<FunnelStage> {
        let change: LeadMutation = Box::new(move |record| record.extended_survey = answers);
        self.update(lead_id, change).await
    }

    /// Apply one field group change inside the store so concurrent saves
    /// for the same lead never overwrite each other
    async fn update(&self, lead_id: Uuid, change: LeadMutation) -> Result<FunnelStage> {
        let LeadChange { before, after } = self.store.modify_lead(lead_id, change).await?;
        let before = self.classifier.classify(&before);
        let after = self.classifier.classify(&after);

        if after != before {
            tracing::info!(%lead_id, from = before.as_str(), to = after.as_str(), "Lead advanced");
        }
        Ok(after)
    }
}
