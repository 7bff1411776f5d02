use crate::{
    error::CrmError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use itertools::Itertools;
use std::collections::HashMap;
use vita_crm_api_structs::dtos::{FollowUpDTO, ReminderGroupDTO, ReminderSummaryDTO};
use vita_crm_api_structs::get_follow_up_reminders::*;
use vita_crm_domain::{reminder_bucket, FollowUp, FollowUpStatus, Priority, ID};
use vita_crm_infra::{CrmContext, FollowUpFilter, FollowUpSort};

fn handle_error(e: UseCaseErrors) -> CrmError {
    match e {
        UseCaseErrors::InvalidBucket(bucket) => CrmError::BadClientData(format!(
            "The provided bucket: {} is not one of overdue, today, upcoming, next_week",
            bucket
        )),
        UseCaseErrors::StorageError => CrmError::InternalError,
    }
}

pub async fn get_follow_up_reminders_controller(
    query_params: web::Query<QueryParams>,
    ctx: web::Data<CrmContext>,
) -> Result<HttpResponse, CrmError> {
    let query_params = query_params.0;
    let usecase = GetFollowUpRemindersUseCase {
        bucket: query_params.bucket,
        assigned_to_id: query_params.assigned_to_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| {
            HttpResponse::Ok().json(APIResponse {
                follow_ups: reminders
                    .follow_ups
                    .into_iter()
                    .map(FollowUpDTO::new)
                    .collect(),
                summary: ReminderSummaryDTO {
                    total: reminders.summary.total,
                    urgent: reminders.summary.urgent,
                    high: reminders.summary.high,
                    medium: reminders.summary.medium,
                    low: reminders.summary.low,
                },
                grouped: reminders
                    .grouped
                    .into_iter()
                    .map(|group| ReminderGroupDTO {
                        priority: group.priority,
                        total: group.total,
                        follow_ups: group.follow_ups.into_iter().map(FollowUpDTO::new).collect(),
                    })
                    .collect(),
            })
        })
        .map_err(handle_error)
}

/// Single bucket view for the reminder dashboard. Bucketing and priority
/// grouping are two independent axes over the same member set so the UI
/// can render both from one round trip.
#[derive(Debug)]
pub struct GetFollowUpRemindersUseCase {
    pub bucket: String,
    pub assigned_to_id: Option<ID>,
}

#[derive(Debug)]
pub struct FollowUpReminders {
    pub follow_ups: Vec<FollowUp>,
    pub summary: ReminderSummary,
    pub grouped: Vec<ReminderGroup>,
}

#[derive(Debug)]
pub struct ReminderSummary {
    pub total: usize,
    pub urgent: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// `follow_ups` holds a display preview, `total` the full group size
#[derive(Debug)]
pub struct ReminderGroup {
    pub priority: Priority,
    pub total: usize,
    pub follow_ups: Vec<FollowUp>,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    InvalidBucket(String),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetFollowUpRemindersUseCase {
    type Response = FollowUpReminders;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetFollowUpReminders";

    async fn execute(&mut self, ctx: &CrmContext) -> Result<Self::Response, Self::Errors> {
        let bucket = self
            .bucket
            .parse()
            .map_err(|_| UseCaseErrors::InvalidBucket(self.bucket.clone()))?;

        // Terminal records are excluded by definition, not by what happens
        // to be filtered out downstream
        let filter = FollowUpFilter {
            assigned_to_id: self.assigned_to_id.clone(),
            statuses: Some(
                vec![
                    FollowUpStatus::Scheduled,
                    FollowUpStatus::InProgress,
                    FollowUpStatus::Rescheduled,
                    FollowUpStatus::NoResponse,
                ],
            ),
            ..Default::default()
        };
        let records = ctx
            .repos
            .follow_ups
            .find_by_filter(&filter, &FollowUpSort::default(), 0, None)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        let now = ctx.sys.get_utc_now();
        let windows = &ctx.config.reminder_windows;
        let members = records
            .into_iter()
            .filter(|follow_up| reminder_bucket(follow_up, now, windows) == Some(bucket))
            .collect::<Vec<_>>();

        let count_for = |priority: Priority| {
            members
                .iter()
                .filter(|follow_up| follow_up.priority == priority)
                .count()
        };
        let summary = ReminderSummary {
            total: members.len(),
            urgent: count_for(Priority::Urgent),
            high: count_for(Priority::High),
            medium: count_for(Priority::Medium),
            low: count_for(Priority::Low),
        };

        let mut by_priority: HashMap<Priority, Vec<FollowUp>> = members
            .iter()
            .cloned()
            .map(|follow_up| (follow_up.priority, follow_up))
            .into_group_map();
        let preview_limit = ctx.config.reminder_group_preview_limit;
        let grouped = Priority::ALL
            .iter()
            .map(|priority| {
                let group = by_priority.remove(priority).unwrap_or_default();
                let total = group.len();
                ReminderGroup {
                    priority: *priority,
                    total,
                    follow_ups: group.into_iter().take(preview_limit).collect(),
                }
            })
            .collect();

        Ok(FollowUpReminders {
            follow_ups: members,
            summary,
            grouped,
        })
    }
}
