//! Self-advocacy payloads: scripts, hearing prep, insurance calls, appeal
//! letters, boundary phrases and access-needs cards.

use crate::model::record::{CollectionRecord, Dated};
use crate::registry::collections::{
    ACCESS_CARDS, ADVOCACY_SCRIPTS, APPEAL_LETTERS, BOUNDARIES, HEARING_PREP, INSURANCE_CALLS,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptTone {
    Calm,
    Firm,
    Warm,
    Assertive,
    Professional,
}

impl ScriptTone {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Calm => "calm",
            Self::Firm => "firm",
            Self::Warm => "warm",
            Self::Assertive => "assertive",
            Self::Professional => "professional",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptCategory {
    Medical,
    Insurance,
    Disability,
    Work,
    Social,
    Legal,
}

impl ScriptCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Medical => "medical",
            Self::Insurance => "insurance",
            Self::Disability => "disability",
            Self::Work => "work",
            Self::Social => "social",
            Self::Legal => "legal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvocacyScript {
    pub title: String,
    pub tone: ScriptTone,
    pub category: ScriptCategory,
    pub situation: String,
    pub script: String,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub when_to_use: String,
    #[serde(default)]
    pub follow_up_scripts: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HearingType {
    #[serde(rename = "SSI")]
    Ssi,
    #[serde(rename = "SSDI")]
    Ssdi,
    #[serde(rename = "appeal")]
    Appeal,
    #[serde(rename = "reconsideration")]
    Reconsideration,
    #[serde(rename = "ALJ")]
    Alj,
    #[serde(rename = "other")]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub item: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Disability hearing preparation notebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HearingPrep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hearing_date: Option<NaiveDate>,
    pub hearing_type: HearingType,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    #[serde(default)]
    pub documents_needed: Vec<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub medical_evidence: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default)]
    pub notes: String,
    /// Derived from `checklist`, 0..=100.
    #[serde(default)]
    pub completion_percentage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    Resolved,
    Pending,
    Escalated,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceCallLog {
    pub date: NaiveDate,
    pub company: String,
    pub purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_number: Option<String>,
    pub representative: String,
    /// Free-text call length as noted by the caller (`"45 min"`).
    pub duration: String,
    pub outcome: CallOutcome,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub follow_up_needed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppealStatus {
    Draft,
    Sent,
    Pending,
    Approved,
    Denied,
}

impl AppealStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealLetter {
    pub date: NaiveDate,
    pub recipient_name: String,
    #[serde(default)]
    pub recipient_address: String,
    pub subject: String,
    pub denial_date: NaiveDate,
    pub denial_reason: String,
    #[serde(rename = "yourArgument")]
    pub argument: String,
    #[serde(default)]
    pub supporting_evidence: Vec<String>,
    #[serde(default)]
    pub medical_documentation: Vec<String>,
    pub requested_action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub status: AppealStatus,
    #[serde(default)]
    pub letter_content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryCategory {
    Time,
    Energy,
    Physical,
    Emotional,
    Communication,
    Care,
}

impl BoundaryCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Energy => "energy",
            Self::Physical => "physical",
            Self::Emotional => "emotional",
            Self::Communication => "communication",
            Self::Care => "care",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryTone {
    Gentle,
    Firm,
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryPhrase {
    pub category: BoundaryCategory,
    pub situation: String,
    pub phrase: String,
    pub tone: BoundaryTone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardLayout {
    #[default]
    Card,
    Letter,
    Poster,
}

/// Printable summary of needs and accommodations to hand to staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessNeedsCard {
    pub title: String,
    #[serde(default)]
    pub needs: Vec<String>,
    #[serde(default)]
    pub accommodations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(default)]
    pub medical_info: Vec<String>,
    #[serde(default)]
    pub printable: bool,
    #[serde(default)]
    pub layout: CardLayout,
}

impl CollectionRecord for AdvocacyScript {
    const COLLECTION: &'static str = ADVOCACY_SCRIPTS;
}

impl CollectionRecord for HearingPrep {
    const COLLECTION: &'static str = HEARING_PREP;
}

impl CollectionRecord for InsuranceCallLog {
    const COLLECTION: &'static str = INSURANCE_CALLS;
}

impl CollectionRecord for AppealLetter {
    const COLLECTION: &'static str = APPEAL_LETTERS;
}

impl CollectionRecord for BoundaryPhrase {
    const COLLECTION: &'static str = BOUNDARIES;
}

impl CollectionRecord for AccessNeedsCard {
    const COLLECTION: &'static str = ACCESS_CARDS;
}

impl Dated for InsuranceCallLog {
    fn day(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for AppealLetter {
    fn day(&self) -> NaiveDate {
        self.date
    }
}
