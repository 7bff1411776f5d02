use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;
use vita_crm_utils::create_random_code;

#[derive(Error, Debug)]
pub enum InvalidEnumValue {
    #[error("Value: {0} is not recognized")]
    Unrecognized(String),
}

/// A scheduled customer-contact task, tracked through its status lifecycle.
/// Whether a follow up is overdue or due for a reminder is never stored, it
/// is derived from the scheduled fields and the current instant, see
/// [`FollowUp::is_overdue`] and [`crate::reminder::reminder_bucket`].
#[derive(Debug, Clone)]
pub struct FollowUp {
    pub id: ID,
    /// Human readable code, assigned once at creation and never changed
    pub follow_up_code: String,
    pub customer_id: ID,
    pub assigned_to_id: Option<ID>,
    pub created_by_id: Option<ID>,
    pub follow_up_type: FollowUpType,
    pub priority: Priority,
    pub communication_method: CommunicationMethod,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: Option<NaiveTime>,
    pub next_follow_up_date: Option<NaiveDate>,
    pub next_follow_up_reason: Option<String>,
    pub status: FollowUpStatus,
    /// Present if and only if `status == Completed`
    pub completed_date: Option<DateTime<Utc>>,
    /// Minutes spent on the contact
    pub actual_duration: Option<i32>,
    pub outcome: Option<FollowUpOutcome>,
    pub customer_satisfaction: Option<i16>,
    pub customer_feedback: Option<String>,
    pub reminder_sent: bool,
    /// Do not offer this record for proactive reminding before this instant
    pub reminder_date: Option<DateTime<Utc>>,
    pub title: String,
    pub description: Option<String>,
    pub internal_notes: Option<String>,
    pub public_notes: Option<String>,
    pub tags: Vec<String>,
    pub health_status: HealthStatusSnapshot,
    pub product_usage: Vec<ProductUsageObservation>,
    pub recommendations: Vec<String>,
    pub action_items: Vec<ActionItem>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Entity for FollowUp {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl FollowUp {
    pub fn new(customer_id: ID, title: String, scheduled_date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            id: Default::default(),
            follow_up_code: format!("FU-{}", create_random_code(8)),
            customer_id,
            assigned_to_id: None,
            created_by_id: None,
            follow_up_type: Default::default(),
            priority: Default::default(),
            communication_method: Default::default(),
            scheduled_date,
            scheduled_time: None,
            next_follow_up_date: None,
            next_follow_up_reason: None,
            status: FollowUpStatus::Scheduled,
            completed_date: None,
            actual_duration: None,
            outcome: None,
            customer_satisfaction: None,
            customer_feedback: None,
            reminder_sent: false,
            reminder_date: None,
            title,
            description: None,
            internal_notes: None,
            public_notes: None,
            tags: Vec::new(),
            health_status: Default::default(),
            product_usage: Vec::new(),
            recommendations: Vec::new(),
            action_items: Vec::new(),
            created: now,
            updated: now,
        }
    }

    /// Whether the scheduled instant has passed. Terminal records are never
    /// overdue. When no time of day is set the record only becomes overdue
    /// once its calendar day has ended.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        match self.scheduled_time {
            Some(time) => {
                let scheduled =
                    DateTime::<Utc>::from_utc(self.scheduled_date.and_time(time), Utc);
                scheduled < now
            }
            None => self.scheduled_date < now.naive_utc().date(),
        }
    }

    /// Changes the status while keeping `completed_date` consistent with it
    pub fn set_status(&mut self, status: FollowUpStatus, now: DateTime<Utc>) {
        self.status = status;
        if status == FollowUpStatus::Completed {
            if self.completed_date.is_none() {
                self.completed_date = Some(now);
            }
        } else {
            self.completed_date = None;
        }
    }

    pub fn set_customer_satisfaction(&mut self, rating: i16) -> bool {
        if (1..=5).contains(&rating) {
            self.customer_satisfaction = Some(rating);
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Rescheduled,
    NoResponse,
}

impl FollowUpStatus {
    /// Terminal records are excluded from overdue and reminder computations
    /// by definition. `NoResponse` is terminal in practice but stays open
    /// for corrections, so it does not count here.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Rescheduled => "rescheduled",
            Self::NoResponse => "no_response",
        }
    }
}

impl Display for FollowUpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FollowUpStatus {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "rescheduled" => Ok(Self::Rescheduled),
            "no_response" => Ok(Self::NoResponse),
            _ => Err(InvalidEnumValue::Unrecognized(s.to_string())),
        }
    }
}

/// Ordered from least to most urgent so that comparisons and sorting can
/// use the type directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Urgent,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(InvalidEnumValue::Unrecognized(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpType {
    HealthCheck,
    ProductFeedback,
    ReorderReminder,
    PlanAdjustment,
    SatisfactionSurvey,
    GeneralInquiry,
    ComplaintResolution,
    Education,
    Promotional,
    Other,
}

impl FollowUpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HealthCheck => "health_check",
            Self::ProductFeedback => "product_feedback",
            Self::ReorderReminder => "reorder_reminder",
            Self::PlanAdjustment => "plan_adjustment",
            Self::SatisfactionSurvey => "satisfaction_survey",
            Self::GeneralInquiry => "general_inquiry",
            Self::ComplaintResolution => "complaint_resolution",
            Self::Education => "education",
            Self::Promotional => "promotional",
            Self::Other => "other",
        }
    }
}

impl Default for FollowUpType {
    fn default() -> Self {
        Self::GeneralInquiry
    }
}

impl Display for FollowUpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FollowUpType {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "health_check" => Ok(Self::HealthCheck),
            "product_feedback" => Ok(Self::ProductFeedback),
            "reorder_reminder" => Ok(Self::ReorderReminder),
            "plan_adjustment" => Ok(Self::PlanAdjustment),
            "satisfaction_survey" => Ok(Self::SatisfactionSurvey),
            "general_inquiry" => Ok(Self::GeneralInquiry),
            "complaint_resolution" => Ok(Self::ComplaintResolution),
            "education" => Ok(Self::Education),
            "promotional" => Ok(Self::Promotional),
            "other" => Ok(Self::Other),
            _ => Err(InvalidEnumValue::Unrecognized(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationMethod {
    Phone,
    Email,
    Wechat,
    Sms,
    InPerson,
    VideoCall,
}

impl CommunicationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Wechat => "wechat",
            Self::Sms => "sms",
            Self::InPerson => "in_person",
            Self::VideoCall => "video_call",
        }
    }
}

impl Default for CommunicationMethod {
    fn default() -> Self {
        Self::Phone
    }
}

impl Display for CommunicationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CommunicationMethod {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phone" => Ok(Self::Phone),
            "email" => Ok(Self::Email),
            "wechat" => Ok(Self::Wechat),
            "sms" => Ok(Self::Sms),
            "in_person" => Ok(Self::InPerson),
            "video_call" => Ok(Self::VideoCall),
            _ => Err(InvalidEnumValue::Unrecognized(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpOutcome {
    Successful,
    PartiallySuccessful,
    Unsuccessful,
    Rescheduled,
    NoContact,
}

impl FollowUpOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Successful => "successful",
            Self::PartiallySuccessful => "partially_successful",
            Self::Unsuccessful => "unsuccessful",
            Self::Rescheduled => "rescheduled",
            Self::NoContact => "no_contact",
        }
    }
}

impl Display for FollowUpOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FollowUpOutcome {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "successful" => Ok(Self::Successful),
            "partially_successful" => Ok(Self::PartiallySuccessful),
            "unsuccessful" => Ok(Self::Unsuccessful),
            "rescheduled" => Ok(Self::Rescheduled),
            "no_contact" => Ok(Self::NoContact),
            _ => Err(InvalidEnumValue::Unrecognized(s.to_string())),
        }
    }
}

/// Snapshot of the customer's health observed during a contact. Owned by
/// its `FollowUp`, no identity of its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatusSnapshot {
    pub current_condition: Option<String>,
    pub improvements: Vec<String>,
    pub concerns: Vec<String>,
    pub side_effects: Vec<String>,
}

/// Per product adherence and effectiveness noted during a contact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUsageObservation {
    pub product_id: ID,
    pub adherence: Option<String>,
    pub effectiveness: Option<String>,
}

/// Checklist entry inside a `FollowUp`. Action items are ordered, carry no
/// identity outside their parent and are only written as part of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub assigned_to: Option<ID>,
    pub priority: Priority,
    pub status: ActionItemStatus,
}

impl ActionItem {
    pub fn new(description: String) -> Self {
        Self {
            description,
            due_date: None,
            assigned_to: None,
            priority: Default::default(),
            status: ActionItemStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionItemStatus {
    Pending,
    InProgress,
    Completed,
}

impl ActionItemStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl FromStr for ActionItemStatus {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(InvalidEnumValue::Unrecognized(s.to_string())),
        }
    }
}
