//! Household member entries
//!
//! A primary lead can bring family members into the promotion. Each member
//! is stored as its own record flagged `household_member`, which keeps it out
//! of conversion counts and the signup total. Bonus entries are capped
//! globally.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use dental_funnel_config::HouseholdConfig;
use dental_funnel_core::LeadRecord;

use crate::error::{FunnelError, Result};
use crate::store::LeadRepository;

/// Bonus entries that can still be granted under `cap`
pub fn bonus_entries_allowed(cap: u32, already_granted: u32, requested: u32) -> u32 {
    requested.min(cap.saturating_sub(already_granted))
}

/// Result of adding household members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdOutcome {
    pub added: Vec<Uuid>,
    /// Members turned away because the bonus cap was reached
    pub rejected: usize,
}

pub struct HouseholdService {
    store: Arc<dyn LeadRepository>,
    config: HouseholdConfig,
}

impl HouseholdService {
    pub fn new(store: Arc<dyn LeadRepository>, config: HouseholdConfig) -> Self {
        Self { store, config }
    }

    /// Add family members for `primary_id`, up to the remaining bonus cap
    pub async fn add_members(
        &self,
        primary_id: Uuid,
        members: Vec<LeadRecord>,
    ) -> Result<HouseholdOutcome> {
        let primary = self
            .store
            .get_lead(primary_id)
            .await?
            .ok_or(FunnelError::LeadNotFound(primary_id))?;

        let requested = members.len();
        let tag = self
            .config
            .source_tags
            .first()
            .cloned()
            .unwrap_or_default();

        let members = members
            .into_iter()
            .map(|mut member| {
                member.household_member = true;
                member.campaign_source = Some(format!("{}|primary={}", tag, primary_id));
                if member.universal_id.is_none() {
                    member.universal_id = primary.universal_id.clone();
                }
                member
            })
            .collect();

        // the store checks the cap and appends under one lock
        let added = self
            .store
            .append_household_members(members, self.config.max_bonus_entries)
            .await?;

        let rejected = requested.saturating_sub(added.len());
        if rejected > 0 {
            tracing::warn!(
                %primary_id,
                rejected,
                cap = self.config.max_bonus_entries,
                "Household bonus cap reached"
            );
        }

        Ok(HouseholdOutcome { added, rejected })
    }
}
