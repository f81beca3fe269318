//! Campaign Configuration
//!
//! Business rules for a promotion live in one YAML file (campaign.yaml).
//! The bridge turns the loaded config into core trait implementations and
//! the validator rejects inconsistent tier tables at startup.

mod bridge;
mod campaign;
mod follow_up;
mod validator;
mod vouchers;

pub use bridge::CampaignBridge;
pub use campaign::{CampaignConfig, HouseholdConfig, PracticeConfig};
pub use follow_up::FollowUpConfig;
pub use validator::{
    CampaignValidator, ValidationCategory, ValidationError, ValidationResult, ValidationSeverity,
};
pub use vouchers::VoucherConfig;
