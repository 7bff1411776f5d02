use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use vita_crm_domain::{
    ActionItem, CommunicationMethod, FollowUp, FollowUpOutcome, FollowUpStatus, FollowUpType,
    HealthStatusSnapshot, Priority, ProductUsageObservation, ID,
};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpDTO {
    pub id: ID,
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
    pub completed_date: Option<DateTime<Utc>>,
    pub actual_duration: Option<i32>,
    pub outcome: Option<FollowUpOutcome>,
    pub customer_satisfaction: Option<i16>,
    pub customer_feedback: Option<String>,
    pub reminder_sent: bool,
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

impl FollowUpDTO {
    pub fn new(follow_up: FollowUp) -> Self {
        Self {
            id: follow_up.id,
            follow_up_code: follow_up.follow_up_code,
            customer_id: follow_up.customer_id,
            assigned_to_id: follow_up.assigned_to_id,
            created_by_id: follow_up.created_by_id,
            follow_up_type: follow_up.follow_up_type,
            priority: follow_up.priority,
            communication_method: follow_up.communication_method,
            scheduled_date: follow_up.scheduled_date,
            scheduled_time: follow_up.scheduled_time,
            next_follow_up_date: follow_up.next_follow_up_date,
            next_follow_up_reason: follow_up.next_follow_up_reason,
            status: follow_up.status,
            completed_date: follow_up.completed_date,
            actual_duration: follow_up.actual_duration,
            outcome: follow_up.outcome,
            customer_satisfaction: follow_up.customer_satisfaction,
            customer_feedback: follow_up.customer_feedback,
            reminder_sent: follow_up.reminder_sent,
            reminder_date: follow_up.reminder_date,
            title: follow_up.title,
            description: follow_up.description,
            internal_notes: follow_up.internal_notes,
            public_notes: follow_up.public_notes,
            tags: follow_up.tags,
            health_status: follow_up.health_status,
            product_usage: follow_up.product_usage,
            recommendations: follow_up.recommendations,
            action_items: follow_up.action_items,
            created: follow_up.created,
            updated: follow_up.updated,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDTO {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
}

/// Aggregate over the full filtered set, independent of pagination
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpSummaryDTO {
    pub total_follow_ups: i64,
    pub completed_count: i64,
    pub scheduled_count: i64,
    pub overdue_count: i64,
    /// Mean satisfaction over the records that carry a rating, absent when
    /// none do
    pub average_rating: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSummaryDTO {
    pub total: usize,
    pub urgent: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// One priority partition of a reminder bucket. `follow_ups` is truncated
/// to a preview size, `total` always reports the full group size.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderGroupDTO {
    pub priority: Priority,
    pub total: usize,
    pub follow_ups: Vec<FollowUpDTO>,
}
