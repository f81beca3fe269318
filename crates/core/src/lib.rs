//! Core traits and types for the dental funnel
//!
//! This crate holds the pure rules of the promotion, with no I/O:
//! - Lead record types (named field groups)
//! - Voucher tier and batch allocation
//! - Funnel stage classification and aggregate counts

pub mod lead;
pub mod traits;

pub use lead::{is_filled, ContactDetails, ExtendedSurvey, LeadRecord, ShortSurvey};

pub use traits::{
    default_voucher_tiers, BatchState, FieldGroupClassifier, FunnelStage, StageClassifier,
    StageCounts, TieredVoucherAllocator, VoucherAllocator, VoucherTier, BATCH_RELEASE_SIZE,
    BATCH_SIZE, DEFAULT_ANNOUNCEMENT_TEMPLATE,
};
