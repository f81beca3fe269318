//! Error types for the funnel services

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum FunnelError {
    #[error("Lead not found: {0}")]
    LeadNotFound(Uuid),

    /// Household entries are added through the household service and
    /// never count as signups
    #[error("Household member cannot be recorded as a signup (campaign source: {0})")]
    HouseholdSignup(String),

    /// Failure reported by a lead store backend
    #[error("Lead store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, FunnelError>;
