//! Follow-up Messaging Configuration
//!
//! Cadence and message templates for follow-up messages. Templates are keyed
//! by template key, then by channel, and rendered with `{placeholder}`
//! substitution.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::follow_up;

/// Follow-up section of campaign.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUpConfig {
    /// Hours to wait before attempt N (index 0 = first follow-up)
    #[serde(default = "default_delays_hours")]
    pub delays_hours: Vec<i64>,
    /// Template key to use for each funnel stage ("stage1", "stage2", "stage3")
    #[serde(default = "default_stage_templates")]
    pub stage_templates: HashMap<String, String>,
    /// Templates keyed by template key, then by channel ("email", "sms", "whatsapp")
    #[serde(default)]
    pub templates: HashMap<String, HashMap<String, String>>,
    /// Channel used when a template has no variant for the requested one
    #[serde(default = "default_channel")]
    pub default_channel: String,
}

fn default_delays_hours() -> Vec<i64> {
    follow_up::DEFAULT_DELAYS_HOURS.to_vec()
}

fn default_stage_templates() -> HashMap<String, String> {
    [
        ("stage1", "complete_short_survey"),
        ("stage2", "complete_extended_survey"),
        ("stage3", "book_appointment"),
    ]
    .into_iter()
    .map(|(stage, key)| (stage.to_string(), key.to_string()))
    .collect()
}

fn default_channel() -> String {
    "email".to_string()
}

impl Default for FollowUpConfig {
    fn default() -> Self {
        Self {
            delays_hours: default_delays_hours(),
            stage_templates: default_stage_templates(),
            templates: HashMap::new(),
            default_channel: default_channel(),
        }
    }
}

impl FollowUpConfig {
    /// Maximum number of follow-ups per lead
    pub fn max_attempts(&self) -> usize {
        self.delays_hours.len()
    }

    /// Template key for a stage name
    pub fn template_key_for_stage(&self, stage: &str) -> Option<&str> {
        self.stage_templates.get(stage).map(|s| s.as_str())
    }

    /// Get template by key and channel, falling back to the default channel
    pub fn get_template(&self, template_key: &str, channel: &str) -> Option<&str> {
        self.templates
            .get(template_key)
            .and_then(|channels| {
                channels
                    .get(channel)
                    .or_else(|| channels.get(&self.default_channel))
            })
            .map(|s| s.as_str())
    }

    /// Build message from template with placeholder substitution
    pub fn build_message(
        &self,
        template_key: &str,
        channel: &str,
        placeholders: &HashMap<String, String>,
    ) -> Option<String> {
        let template = self.get_template(template_key, channel)?;
        let mut message = template.to_string();

        for (key, value) in placeholders {
            message = message.replace(&format!("{{{}}}", key), value);
        }

        Some(message)
    }
}
