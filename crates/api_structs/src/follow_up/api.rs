use crate::dtos::{
    FollowUpDTO, FollowUpSummaryDTO, PaginationDTO, ReminderGroupDTO, ReminderSummaryDTO,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use vita_crm_domain::{
    ActionItem, CommunicationMethod, FollowUp, FollowUpOutcome, FollowUpStatus, FollowUpType,
    HealthStatusSnapshot, Priority, ProductUsageObservation, ID,
};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpResponse {
    pub follow_up: FollowUpDTO,
}

impl FollowUpResponse {
    pub fn new(follow_up: FollowUp) -> Self {
        Self {
            follow_up: FollowUpDTO::new(follow_up),
        }
    }
}

pub mod create_follow_up {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub customer_id: ID,
        pub title: String,
        pub scheduled_date: NaiveDate,
        pub scheduled_time: Option<NaiveTime>,
        pub follow_up_type: Option<FollowUpType>,
        pub priority: Option<Priority>,
        pub communication_method: Option<CommunicationMethod>,
        pub assigned_to_id: Option<ID>,
        pub created_by_id: Option<ID>,
        pub description: Option<String>,
        pub internal_notes: Option<String>,
        pub public_notes: Option<String>,
        pub tags: Option<Vec<String>>,
        pub next_follow_up_date: Option<NaiveDate>,
        pub next_follow_up_reason: Option<String>,
        pub action_items: Option<Vec<ActionItem>>,
    }

    pub type APIResponse = FollowUpResponse;
}

pub mod get_follow_up {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub follow_up_id: ID,
    }

    pub type APIResponse = FollowUpResponse;
}

pub mod get_follow_ups {
    use super::*;

    /// Enum-valued filters arrive as free strings here. They are parsed
    /// into the closed domain types before touching any comparison, an
    /// unrecognized value simply matches nothing.
    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub search: Option<String>,
        pub status: Option<String>,
        pub priority: Option<String>,
        pub follow_up_type: Option<String>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub overdue_only: Option<bool>,
        pub sort_by: Option<String>,
        pub sort_dir: Option<String>,
        pub page: Option<i64>,
        pub limit: Option<i64>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub follow_ups: Vec<FollowUpDTO>,
        pub pagination: PaginationDTO,
        pub summary: FollowUpSummaryDTO,
    }
}

pub mod update_follow_up {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub follow_up_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: Option<String>,
        pub description: Option<String>,
        pub follow_up_type: Option<FollowUpType>,
        pub priority: Option<Priority>,
        pub communication_method: Option<CommunicationMethod>,
        pub scheduled_date: Option<NaiveDate>,
        pub scheduled_time: Option<NaiveTime>,
        pub status: Option<FollowUpStatus>,
        pub outcome: Option<FollowUpOutcome>,
        pub customer_satisfaction: Option<i16>,
        pub customer_feedback: Option<String>,
        pub actual_duration: Option<i32>,
        pub assigned_to_id: Option<ID>,
        pub next_follow_up_date: Option<NaiveDate>,
        pub next_follow_up_reason: Option<String>,
        pub internal_notes: Option<String>,
        pub public_notes: Option<String>,
        pub tags: Option<Vec<String>>,
        pub health_status: Option<HealthStatusSnapshot>,
        pub product_usage: Option<Vec<ProductUsageObservation>>,
        pub recommendations: Option<Vec<String>>,
        pub action_items: Option<Vec<ActionItem>>,
    }

    pub type APIResponse = FollowUpResponse;
}

pub mod delete_follow_up {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub follow_up_id: ID,
    }

    pub type APIResponse = FollowUpResponse;
}

pub mod get_follow_up_reminders {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        /// One of `overdue`, `today`, `upcoming`, `next_week`
        pub bucket: String,
        pub assigned_to_id: Option<ID>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub follow_ups: Vec<FollowUpDTO>,
        pub summary: ReminderSummaryDTO,
        pub grouped: Vec<ReminderGroupDTO>,
    }
}

pub mod bulk_follow_up_actions {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub follow_up_ids: Vec<ID>,
        /// One of `mark_reminder_sent`, `snooze_reminder`, `reschedule`
        pub action: String,
        pub snooze_until: Option<DateTime<Utc>>,
        pub new_date: Option<NaiveDate>,
        pub new_time: Option<NaiveTime>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub modified_count: usize,
    }
}
