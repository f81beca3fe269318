//! Follow-up planning
//!
//! Picks the follow-up message variant for a lead from its funnel stage and
//! decides when it is due from the configured cadence. Sending is left to
//! the notification dispatcher; this module only produces the payload.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use dental_funnel_config::{FollowUpConfig, PracticeConfig};
use dental_funnel_core::{FunnelStage, LeadRecord, StageClassifier};

/// Outbound message channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Sms,
    #[serde(rename = "whatsapp")]
    WhatsApp,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::WhatsApp => "whatsapp",
        }
    }
}

/// Follow-ups already sent to a lead
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactHistory {
    pub attempts: usize,
    pub last_contacted_at: Option<DateTime<Utc>>,
}

/// A planned follow-up message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpAction {
    pub stage: FunnelStage,
    pub template_key: String,
    pub channel: Channel,
    /// 1-based attempt number
    pub attempt: usize,
    pub due_at: DateTime<Utc>,
    /// Rendered text, when a template exists for the key
    pub message: Option<String>,
}

impl FollowUpAction {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }
}

pub struct FollowUpPlanner {
    classifier: Arc<dyn StageClassifier>,
    config: FollowUpConfig,
    practice: PracticeConfig,
}

impl FollowUpPlanner {
    pub fn new(
        classifier: Arc<dyn StageClassifier>,
        config: FollowUpConfig,
        practice: PracticeConfig,
    ) -> Self {
        Self {
            classifier,
            config,
            practice,
        }
    }

    /// Next follow-up for a lead, or `None` when nothing should be sent.
    ///
    /// Household members and leads without contact details are never
    /// followed up, and a lead gets at most one message per configured delay.
    /// The delay runs from the last contact, else from lead creation, else
    /// from `now`.
    pub fn plan(
        &self,
        record: &LeadRecord,
        history: &ContactHistory,
        channel: Channel,
        now: DateTime<Utc>,
    ) -> Option<FollowUpAction> {
        let stage = self.classifier.classify_countable(record)?;
        if stage == FunnelStage::Unstarted {
            return None;
        }

        let delay_hours = *self.config.delays_hours.get(history.attempts)?;
        let template_key = self.config.template_key_for_stage(stage.as_str())?;

        let reference = history
            .last_contacted_at
            .or(record.created_at)
            .unwrap_or(now);
        let Some(due_at) = Duration::try_hours(delay_hours)
            .and_then(|delay| reference.checked_add_signed(delay))
        else {
            tracing::warn!(delay_hours, "Follow-up delay out of range, skipping");
            return None;
        };

        let message = self.config.build_message(
            template_key,
            channel.as_str(),
            &self.placeholders(record),
        );

        tracing::debug!(
            stage = stage.as_str(),
            template = template_key,
            attempt = history.attempts + 1,
            %due_at,
            "Follow-up planned"
        );

        Some(FollowUpAction {
            stage,
            template_key: template_key.to_string(),
            channel,
            attempt: history.attempts + 1,
            due_at,
            message,
        })
    }

    /// Plans that are due at `now`
    pub fn due(
        &self,
        leads: &[(LeadRecord, ContactHistory)],
        channel: Channel,
        now: DateTime<Utc>,
    ) -> Vec<FollowUpAction> {
        leads
            .iter()
            .filter_map(|(record, history)| self.plan(record, history, channel, now))
            .filter(|action| action.is_due(now))
            .collect()
    }

    fn placeholders(&self, record: &LeadRecord) -> HashMap<String, String> {
        let mut placeholders = HashMap::new();
        placeholders.insert(
            "name".to_string(),
            record
                .contact
                .name
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        );
        placeholders.insert("practice".to_string(), self.practice.name.clone());
        placeholders.insert("phone".to_string(), self.practice.phone.clone());
        placeholders.insert("booking_url".to_string(), self.practice.booking_url.clone());
        placeholders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use dental_funnel_core::FieldGroupClassifier;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, 0, 0).unwrap()
    }

    fn stage1_lead() -> LeadRecord {
        let mut record = LeadRecord::new();
        record.contact.customer_id = Some("c-9".to_string());
        record.contact.email = Some("kim@example.com".to_string());
        record.contact.name = Some(" Kim ".to_string());
        record.contact.phone = Some("07700900000".to_string());
        record.contact.postcode = Some("CF10 1EP".to_string());
        record.created_at = Some(at(0));
        record
    }

    fn planner() -> FollowUpPlanner {
        let mut config = FollowUpConfig::default();
        let mut channels = HashMap::new();
        channels.insert(
            "email".to_string(),
            "Hi {name}, finish your survey with {practice}.".to_string(),
        );
        config
            .templates
            .insert("complete_short_survey".to_string(), channels);

        let practice = PracticeConfig {
            name: "Bright Smile".to_string(),
            ..PracticeConfig::default()
        };
        FollowUpPlanner::new(Arc::new(FieldGroupClassifier::new()), config, practice)
    }

    #[test]
    fn test_first_follow_up_for_stage1() {
        let action = planner()
            .plan(&stage1_lead(), &ContactHistory::default(), Channel::Email, at(1))
            .unwrap();

        assert_eq!(action.stage, FunnelStage::Stage1);
        assert_eq!(action.template_key, "complete_short_survey");
        assert_eq!(action.attempt, 1);
        assert_eq!(action.due_at, at(0) + Duration::hours(24));
        assert_eq!(
            action.message.as_deref(),
            Some("Hi Kim, finish your survey with Bright Smile.")
        );
        assert!(!action.is_due(at(1)));
    }

    #[test]
    fn test_channel_without_template_falls_back_to_default() {
        let action = planner()
            .plan(&stage1_lead(), &ContactHistory::default(), Channel::WhatsApp, at(1))
            .unwrap();
        assert!(action.message.is_some());
        assert_eq!(action.channel, Channel::WhatsApp);
    }

    #[test]
    fn test_delay_counts_from_last_contact() {
        let history = ContactHistory {
            attempts: 1,
            last_contacted_at: Some(at(5)),
        };
        let action = planner()
            .plan(&stage1_lead(), &history, Channel::Email, at(6))
            .unwrap();
        assert_eq!(action.attempt, 2);
        assert_eq!(action.due_at, at(5) + Duration::hours(72));
    }

    #[test]
    fn test_out_of_range_delay_plans_nothing() {
        let mut planner = planner();
        planner.config.delays_hours = vec![i64::MAX];
        let history = ContactHistory::default();
        assert!(planner
            .plan(&stage1_lead(), &history, Channel::Email, at(1))
            .is_none());

        // in range for Duration but past the last representable date
        planner.config.delays_hours = vec![10_000_000_000];
        assert!(planner
            .plan(&stage1_lead(), &history, Channel::Email, at(1))
            .is_none());
    }

    #[test]
    fn test_no_follow_up_after_max_attempts() {
        let history = ContactHistory {
            attempts: 3,
            last_contacted_at: Some(at(0)),
        };
        assert!(planner()
            .plan(&stage1_lead(), &history, Channel::Email, at(1))
            .is_none());
    }

    #[test]
    fn test_no_follow_up_for_unstarted_or_household() {
        let planner = planner();
        let history = ContactHistory::default();

        assert!(planner
            .plan(&LeadRecord::new(), &history, Channel::Email, at(1))
            .is_none());

        let mut member = stage1_lead();
        member.household_member = true;
        assert!(planner.plan(&member, &history, Channel::Email, at(1)).is_none());
    }

    #[test]
    fn test_stage_selects_template_variant() {
        let mut record = stage1_lead();
        record.short_survey.last_visit = Some("1 year".to_string());
        record.short_survey.visit_frequency = Some("yearly".to_string());
        record.short_survey.main_concern = Some("gaps".to_string());
        record.short_survey.treatment_interest = Some("implants".to_string());
        record.short_survey.preferred_contact_time = Some("any".to_string());

        let action = planner()
            .plan(&record, &ContactHistory::default(), Channel::Sms, at(1))
            .unwrap();
        assert_eq!(action.stage, FunnelStage::Stage2);
        assert_eq!(action.template_key, "complete_extended_survey");
        assert_eq!(action.message, None);
    }

    #[test]
    fn test_due_filters_by_time() {
        let planner = planner();
        let mut fresh = stage1_lead();
        fresh.created_at = Some(at(12));
        let leads = vec![
            (stage1_lead(), ContactHistory::default()),
            (fresh, ContactHistory::default()),
        ];

        let due = planner.due(&leads, Channel::Email, at(0) + Duration::hours(25));
        assert_eq!(due.len(), 1);
    }
}
