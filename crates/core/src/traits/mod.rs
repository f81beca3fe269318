//! Core traits for the dental funnel
//!
//! ```text
//! Promotion:
//!   - VoucherAllocator: signup count -> tier, batch remaining, announcements
//!
//! Lead funnel:
//!   - StageClassifier: lead fields -> Stage 1/2/3, bulk counts
//! ```

mod stage_classifier;
mod voucher_allocator;

pub use stage_classifier::{FieldGroupClassifier, FunnelStage, StageClassifier, StageCounts};
pub use voucher_allocator::{
    default_voucher_tiers, BatchState, TieredVoucherAllocator, VoucherAllocator, VoucherTier,
    BATCH_RELEASE_SIZE, BATCH_SIZE, DEFAULT_ANNOUNCEMENT_TEMPLATE,
};
