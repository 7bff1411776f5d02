use crate::{
    error::CrmError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use vita_crm_api_structs::dtos::{FollowUpDTO, FollowUpSummaryDTO, PaginationDTO};
use vita_crm_api_structs::get_follow_ups::*;
use vita_crm_domain::{FollowUp, FollowUpStatus};
use vita_crm_infra::{CrmContext, FollowUpFilter, FollowUpSort, SearchFilter};

const DEFAULT_PAGE_SIZE: i64 = 20;

fn handle_error(e: UseCaseErrors) -> CrmError {
    match e {
        UseCaseErrors::StorageError => CrmError::InternalError,
    }
}

pub async fn get_follow_ups_controller(
    query_params: web::Query<QueryParams>,
    ctx: web::Data<CrmContext>,
) -> Result<HttpResponse, CrmError> {
    let query_params = query_params.0;
    let usecase = GetFollowUpsUseCase {
        search: query_params.search,
        status: query_params.status,
        priority: query_params.priority,
        follow_up_type: query_params.follow_up_type,
        start_date: query_params.start_date,
        end_date: query_params.end_date,
        overdue_only: query_params.overdue_only.unwrap_or(false),
        sort_by: query_params.sort_by,
        sort_dir: query_params.sort_dir,
        page: query_params.page,
        limit: query_params.limit,
    };

    execute(usecase, &ctx)
        .await
        .map(|page| {
            HttpResponse::Ok().json(APIResponse {
                follow_ups: page
                    .follow_ups
                    .into_iter()
                    .map(FollowUpDTO::new)
                    .collect(),
                pagination: PaginationDTO {
                    current_page: page.current_page,
                    total_pages: page.total_pages,
                    total_count: page.total_count,
                },
                summary: FollowUpSummaryDTO {
                    total_follow_ups: page.summary.total_follow_ups,
                    completed_count: page.summary.completed_count,
                    scheduled_count: page.summary.scheduled_count,
                    overdue_count: page.summary.overdue_count,
                    average_rating: page.summary.average_rating,
                },
            })
        })
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct GetFollowUpsUseCase {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub follow_up_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub overdue_only: bool,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug)]
pub struct FollowUpsPage {
    pub follow_ups: Vec<FollowUp>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub summary: FollowUpsSummary,
}

/// Computed over the full filtered set before pagination
#[derive(Debug, Default)]
pub struct FollowUpsSummary {
    pub total_follow_ups: i64,
    pub completed_count: i64,
    pub scheduled_count: i64,
    pub overdue_count: i64,
    pub average_rating: Option<f64>,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

fn empty_page(page: i64) -> FollowUpsPage {
    FollowUpsPage {
        follow_ups: Vec::new(),
        current_page: page,
        total_pages: 0,
        total_count: 0,
        summary: Default::default(),
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetFollowUpsUseCase {
    type Response = FollowUpsPage;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetFollowUps";

    async fn execute(&mut self, ctx: &CrmContext) -> Result<Self::Response, Self::Errors> {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .max(1)
            .min(ctx.config.max_query_limit);

        // Filters arrive as free strings from the boundary. An unrecognized
        // enum value cannot match any stored record, so it yields an empty
        // result rather than an error.
        let statuses = match &self.status {
            Some(status) => match status.parse() {
                Ok(status) => Some(vec![status]),
                Err(_) => return Ok(empty_page(page)),
            },
            None => None,
        };
        let priority = match &self.priority {
            Some(priority) => match priority.parse() {
                Ok(priority) => Some(priority),
                Err(_) => return Ok(empty_page(page)),
            },
            None => None,
        };
        let follow_up_type = match &self.follow_up_type {
            Some(follow_up_type) => match follow_up_type.parse() {
                Ok(follow_up_type) => Some(follow_up_type),
                Err(_) => return Ok(empty_page(page)),
            },
            None => None,
        };

        let search = match &self.search {
            Some(text) if !text.trim().is_empty() => {
                let text = text.trim().to_string();
                let customers = ctx
                    .repos
                    .customers
                    .search_by_name(&text)
                    .await
                    .map_err(|_| UseCaseErrors::StorageError)?;
                Some(SearchFilter {
                    text,
                    customer_ids: customers.into_iter().map(|customer| customer.id).collect(),
                })
            }
            _ => None,
        };

        let filter = FollowUpFilter {
            statuses,
            priority,
            follow_up_type,
            scheduled_from: self.start_date,
            scheduled_until: self.end_date,
            search,
            ..Default::default()
        };
        let sort = FollowUpSort {
            field: self
                .sort_by
                .as_deref()
                .and_then(|field| field.parse().ok())
                .unwrap_or(FollowUpSort::default().field),
            direction: self
                .sort_dir
                .as_deref()
                .and_then(|direction| direction.parse().ok())
                .unwrap_or(FollowUpSort::default().direction),
        };

        // One snapshot feeds both the summary and the page so a caller never
        // sees them disagree
        let mut records = ctx
            .repos
            .follow_ups
            .find_by_filter(&filter, &sort, 0, None)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        let now = ctx.sys.get_utc_now();
        if self.overdue_only {
            records.retain(|follow_up| follow_up.is_overdue(now));
        }

        let ratings = records
            .iter()
            .filter_map(|follow_up| follow_up.customer_satisfaction)
            .collect::<Vec<_>>();
        let average_rating = if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().map(|rating| *rating as f64).sum::<f64>() / ratings.len() as f64)
        };

        let summary = FollowUpsSummary {
            total_follow_ups: records.len() as i64,
            completed_count: records
                .iter()
                .filter(|follow_up| follow_up.status == FollowUpStatus::Completed)
                .count() as i64,
            scheduled_count: records
                .iter()
                .filter(|follow_up| follow_up.status == FollowUpStatus::Scheduled)
                .count() as i64,
            overdue_count: records
                .iter()
                .filter(|follow_up| follow_up.is_overdue(now))
                .count() as i64,
            average_rating,
        };

        let total_count = records.len() as i64;
        let total_pages = (total_count + limit - 1) / limit;
        let follow_ups = records
            .into_iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .collect();

        Ok(FollowUpsPage {
            follow_ups,
            current_page: page,
            total_pages,
            total_count,
            summary,
        })
    }
}
