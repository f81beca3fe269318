//! Campaign Bridge - Adapts campaign configuration to core trait implementations
//!
//! # Example
//!
//! ```ignore
//! use dental_funnel_config::domain::{CampaignBridge, CampaignConfig};
//!
//! let config = CampaignConfig::load("config/campaign.yaml")?;
//! let bridge = CampaignBridge::new(Arc::new(config));
//!
//! let allocator = bridge.voucher_allocator();
//! let classifier = bridge.stage_classifier();
//! ```

use std::sync::Arc;

use dental_funnel_core::traits::{
    FieldGroupClassifier, StageClassifier, TieredVoucherAllocator, VoucherAllocator,
};

use super::CampaignConfig;

/// Campaign bridge - creates trait implementations from config
#[derive(Debug, Clone)]
pub struct CampaignBridge {
    config: Arc<CampaignConfig>,
}

impl CampaignBridge {
    pub fn new(config: Arc<CampaignConfig>) -> Self {
        Self { config }
    }

    /// Get the underlying config
    pub fn config(&self) -> &CampaignConfig {
        &self.config
    }

    /// Voucher allocator built from the voucher section
    pub fn voucher_allocator(&self) -> Arc<dyn VoucherAllocator> {
        let vouchers = &self.config.vouchers;
        Arc::new(TieredVoucherAllocator::new(
            vouchers.tiers.clone(),
            vouchers.batch_size,
            vouchers.release_size,
            vouchers.announcement_template.clone(),
        ))
    }

    /// Stage classifier for lead records
    pub fn stage_classifier(&self) -> Arc<dyn StageClassifier> {
        Arc::new(FieldGroupClassifier::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dental_funnel_core::{LeadRecord, VoucherTier};

    #[test]
    fn test_allocator_uses_config() {
        let mut config = CampaignConfig::default();
        config.vouchers.tiers = vec![
            VoucherTier::new(0, Some(10), 99, "early bird"),
            VoucherTier::new(10, None, 5, "late"),
        ];
        config.vouchers.batch_size = 5;
        config.vouchers.release_size = 6;
        config.vouchers.announcement_template = "{released} more after {signup_count}".to_string();

        let bridge = CampaignBridge::new(Arc::new(config));
        let allocator = bridge.voucher_allocator();

        assert_eq!(allocator.current_tier(9).value, 99);
        assert_eq!(allocator.current_tier(10).value, 5);
        assert_eq!(allocator.remaining_in_batch(7), 3);
        assert!(allocator.should_announce_new_batch(10));
        assert_eq!(allocator.batch_announcement_message(10), "6 more after 10");
    }

    #[test]
    fn test_stage_classifier() {
        let bridge = CampaignBridge::new(Arc::new(CampaignConfig::default()));
        let classifier = bridge.stage_classifier();
        assert_eq!(classifier.aggregate(&[LeadRecord::default()]).stage1, 0);
    }
}
