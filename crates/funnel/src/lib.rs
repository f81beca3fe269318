//! Dental funnel services
//!
//! Wires the pure rules from `dental_funnel_core` to a lead store:
//! - `capture`: voucher offer on page load, signup submission, survey saves
//! - `stage_sync`: bulk stage counts persisted as a summary row
//! - `follow_up`: which message variant to send, and when
//! - `household`: family member entries under a global bonus cap
//! - `store`: lead store traits and an in-memory implementation

pub mod capture;
pub mod error;
pub mod follow_up;
pub mod household;
pub mod stage_sync;
pub mod store;

pub use capture::{LeadCaptureService, SignupOutcome, VoucherOffer};
pub use error::{FunnelError, Result};
pub use follow_up::{Channel, ContactHistory, FollowUpAction, FollowUpPlanner};
pub use household::{bonus_entries_allowed, HouseholdOutcome, HouseholdService};
pub use stage_sync::{StageSummary, StageSyncJob};
pub use store::{
    InMemoryLeadStore, LeadChange, LeadMutation, LeadRepository, LeadStore, SignupReceipt,
    SignupRecorder,
};
