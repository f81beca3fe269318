//! Lead store interfaces and an in-memory implementation
//!
//! The store owns the signup counter and the lead records. The rules in
//! `dental_funnel_core` only ever read a count or a record set handed to
//! them; every mutation goes through these traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use dental_funnel_config::HouseholdConfig;
use dental_funnel_core::LeadRecord;

use crate::error::{FunnelError, Result};
use crate::household::bonus_entries_allowed;
use crate::stage_sync::StageSummary;

/// Result of recording a new signup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupReceipt {
    pub lead_id: Uuid,
    /// Total signups including this one
    pub signup_count: u64,
    pub recorded_at: DateTime<Utc>,
}

/// Field-level change applied to a stored lead
pub type LeadMutation = Box<dyn FnOnce(&mut LeadRecord) + Send>;

/// A lead before and after a [`LeadStore::modify_lead`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadChange {
    pub before: LeadRecord,
    pub after: LeadRecord,
}

/// Read/update access to persisted leads
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Current signup total
    async fn signup_count(&self) -> Result<u64>;

    /// Every stored record, household members included
    async fn lead_records(&self) -> Result<Vec<LeadRecord>>;

    async fn get_lead(&self, lead_id: Uuid) -> Result<Option<LeadRecord>>;

    /// Apply `change` to a stored lead as one atomic step and return the
    /// record before and after. The household flag is never changed.
    async fn modify_lead(&self, lead_id: Uuid, change: LeadMutation) -> Result<LeadChange>;

    /// Store household member records without counting them as signups.
    ///
    /// Counting existing members and appending happen atomically, so at most
    /// `cap` household records ever exist. Returns ids of the stored members;
    /// members beyond the cap are dropped.
    async fn append_household_members(
        &self,
        members: Vec<LeadRecord>,
        cap: u32,
    ) -> Result<Vec<Uuid>>;

    /// Persist the latest stage summary row
    async fn write_stage_summary(&self, summary: &StageSummary) -> Result<()>;
}

/// Records new signups
#[async_trait]
pub trait SignupRecorder: Send + Sync {
    /// Store the lead, increment the signup count by exactly one and
    /// return the generated lead id with the new total.
    ///
    /// Records tagged as household members are rejected with
    /// [`FunnelError::HouseholdSignup`] and leave the count unchanged.
    async fn record_signup(&self, record: LeadRecord) -> Result<SignupReceipt>;
}

/// A store that can both record signups and serve lead data
pub trait LeadRepository: LeadStore + SignupRecorder {}

impl<T: LeadStore + SignupRecorder> LeadRepository for T {}

/// In-memory lead store
///
/// The signup counter is an atomic increment-and-read, so concurrent
/// signups each observe a distinct count.
#[derive(Debug, Default)]
pub struct InMemoryLeadStore {
    leads: RwLock<Vec<(Uuid, LeadRecord)>>,
    signup_count: AtomicU64,
    summaries: RwLock<Vec<StageSummary>>,
    household: HouseholdConfig,
}

impl InMemoryLeadStore {
    pub fn new(household: HouseholdConfig) -> Self {
        Self {
            household,
            ..Self::default()
        }
    }

    /// Seed with existing records. Records not flagged as household members
    /// count towards the signup total.
    pub fn with_records(household: HouseholdConfig, records: Vec<LeadRecord>) -> Self {
        let store = Self::new(household);
        {
            let mut leads = store.leads.write();
            for record in records {
                let record = store.tag_household(record);
                if !record.household_member {
                    store.signup_count.fetch_add(1, Ordering::SeqCst);
                }
                leads.push((Uuid::new_v4(), record));
            }
        }
        store
    }

    /// Summaries written so far, oldest first
    pub fn stage_summaries(&self) -> Vec<StageSummary> {
        self.summaries.read().clone()
    }

    /// Set the explicit household flag from the raw campaign source
    fn tag_household(&self, mut record: LeadRecord) -> LeadRecord {
        if !record.household_member {
            record.household_member = record
                .campaign_source
                .as_deref()
                .map(|source| self.household.is_household_source(source))
                .unwrap_or(false);
        }
        record
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn signup_count(&self) -> Result<u64> {
        Ok(self.signup_count.load(Ordering::SeqCst))
    }

    async fn lead_records(&self) -> Result<Vec<LeadRecord>> {
        Ok(self
            .leads
            .read()
            .iter()
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn get_lead(&self, lead_id: Uuid) -> Result<Option<LeadRecord>> {
        Ok(self
            .leads
            .read()
            .iter()
            .find(|(id, _)| *id == lead_id)
            .map(|(_, record)| record.clone()))
    }

    async fn modify_lead(&self, lead_id: Uuid, change: LeadMutation) -> Result<LeadChange> {
        let mut leads = self.leads.write();
        let (_, record) = leads
            .iter_mut()
            .find(|(id, _)| *id == lead_id)
            .ok_or(FunnelError::LeadNotFound(lead_id))?;

        let before = record.clone();
        change(record);
        // household flag is fixed at creation
        record.household_member = before.household_member;

        Ok(LeadChange {
            before,
            after: record.clone(),
        })
    }

    async fn append_household_members(
        &self,
        members: Vec<LeadRecord>,
        cap: u32,
    ) -> Result<Vec<Uuid>> {
        let mut leads = self.leads.write();
        let granted = leads.iter().filter(|(_, r)| r.household_member).count();
        let granted = u32::try_from(granted).unwrap_or(u32::MAX);
        let requested = u32::try_from(members.len()).unwrap_or(u32::MAX);
        let allowed = bonus_entries_allowed(cap, granted, requested) as usize;

        let mut added = Vec::with_capacity(allowed);
        for mut member in members.into_iter().take(allowed) {
            member.household_member = true;
            let lead_id = Uuid::new_v4();
            leads.push((lead_id, member));
            added.push(lead_id);
        }
        Ok(added)
    }

    async fn write_stage_summary(&self, summary: &StageSummary) -> Result<()> {
        self.summaries.write().push(summary.clone());
        Ok(())
    }
}

#[async_trait]
impl SignupRecorder for InMemoryLeadStore {
    async fn record_signup(&self, record: LeadRecord) -> Result<SignupReceipt> {
        let lead_id = Uuid::new_v4();
        let recorded_at = Utc::now();

        let mut record = self.tag_household(record);
        if record.household_member {
            let source = record.campaign_source.clone().unwrap_or_default();
            tracing::warn!(%source, "Rejected household member submitted as a signup");
            return Err(FunnelError::HouseholdSignup(source));
        }
        if !dental_funnel_core::is_filled(&record.contact.customer_id) {
            record.contact.customer_id = Some(lead_id.to_string());
        }
        if record.created_at.is_none() {
            record.created_at = Some(recorded_at);
        }

        let signup_count = {
            let mut leads = self.leads.write();
            leads.push((lead_id, record));
            self.signup_count.fetch_add(1, Ordering::SeqCst) + 1
        };

        tracing::debug!(%lead_id, signup_count, "Signup recorded");

        Ok(SignupReceipt {
            lead_id,
            signup_count,
            recorded_at,
        })
    }
}
