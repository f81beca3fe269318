//! Lead record types
//!
//! A lead is a set of named optional string fields split into three ordered
//! groups: contact details, the short survey and the extended survey. Fields
//! are addressed by name only. Values are trimmed before any emptiness check,
//! so whitespace-only answers count as missing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Returns true when the field holds a non-blank value.
pub fn is_filled(field: &Option<String>) -> bool {
    field.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// Group A: contact details captured by the landing page form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactDetails {
    pub customer_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub postcode: Option<String>,
}

impl ContactDetails {
    pub fn is_complete(&self) -> bool {
        [
            &self.customer_id,
            &self.email,
            &self.name,
            &self.phone,
            &self.postcode,
        ]
        .into_iter()
        .all(is_filled)
    }
}

/// Group B: the five-question short survey
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortSurvey {
    pub last_visit: Option<String>,
    pub visit_frequency: Option<String>,
    pub main_concern: Option<String>,
    pub treatment_interest: Option<String>,
    pub preferred_contact_time: Option<String>,
}

impl ShortSurvey {
    pub fn is_complete(&self) -> bool {
        [
            &self.last_visit,
            &self.visit_frequency,
            &self.main_concern,
            &self.treatment_interest,
            &self.preferred_contact_time,
        ]
        .into_iter()
        .all(is_filled)
    }
}

/// Group C: the five-question extended survey
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendedSurvey {
    pub smile_rating: Option<String>,
    pub dental_anxiety: Option<String>,
    pub budget_range: Option<String>,
    pub insurance_status: Option<String>,
    pub referral_source: Option<String>,
}

impl ExtendedSurvey {
    pub fn is_complete(&self) -> bool {
        [
            &self.smile_rating,
            &self.dental_anxiety,
            &self.budget_range,
            &self.insurance_status,
            &self.referral_source,
        ]
        .into_iter()
        .all(is_filled)
    }
}

/// A captured lead as read back from the lead store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadRecord {
    /// Client-generated visitor id, used for unique visitor counts
    pub universal_id: Option<String>,
    pub contact: ContactDetails,
    pub short_survey: ShortSurvey,
    pub extended_survey: ExtendedSurvey,
    /// Free-text campaign source, informational only
    pub campaign_source: Option<String>,
    /// Auto-generated entry for a family member of a primary lead.
    /// Set once when the record is created; never derived from `campaign_source` here.
    pub household_member: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl LeadRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trimmed universal id, if present and non-blank
    pub fn visitor_id(&self) -> Option<&str> {
        self.universal_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
