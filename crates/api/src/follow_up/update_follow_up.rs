use crate::{
    error::CrmError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, NaiveTime};
use vita_crm_api_structs::update_follow_up::*;
use vita_crm_domain::{
    ActionItem, CommunicationMethod, FollowUp, FollowUpOutcome, FollowUpStatus, FollowUpType,
    HealthStatusSnapshot, Priority, ProductUsageObservation, ID,
};
use vita_crm_infra::CrmContext;

fn handle_error(e: UseCaseErrors) -> CrmError {
    match e {
        UseCaseErrors::NotFound(follow_up_id) => CrmError::NotFound(format!(
            "The follow up with id: {}, was not found.",
            follow_up_id
        )),
        UseCaseErrors::InvalidTitle => {
            CrmError::BadClientData("The provided title cannot be empty".into())
        }
        UseCaseErrors::InvalidSatisfaction(rating) => CrmError::BadClientData(format!(
            "The provided customerSatisfaction: {} must be an integer between 1 and 5",
            rating
        )),
        UseCaseErrors::StorageError => CrmError::InternalError,
    }
}

pub async fn update_follow_up_controller(
    body: web::Json<RequestBody>,
    path_params: web::Path<PathParams>,
    ctx: web::Data<CrmContext>,
) -> Result<HttpResponse, CrmError> {
    let body = body.0;
    let usecase = UpdateFollowUpUseCase {
        follow_up_id: path_params.follow_up_id.clone(),
        title: body.title,
        description: body.description,
        follow_up_type: body.follow_up_type,
        priority: body.priority,
        communication_method: body.communication_method,
        scheduled_date: body.scheduled_date,
        scheduled_time: body.scheduled_time,
        status: body.status,
        outcome: body.outcome,
        customer_satisfaction: body.customer_satisfaction,
        customer_feedback: body.customer_feedback,
        actual_duration: body.actual_duration,
        assigned_to_id: body.assigned_to_id,
        next_follow_up_date: body.next_follow_up_date,
        next_follow_up_reason: body.next_follow_up_reason,
        internal_notes: body.internal_notes,
        public_notes: body.public_notes,
        tags: body.tags,
        health_status: body.health_status,
        product_usage: body.product_usage,
        recommendations: body.recommendations,
        action_items: body.action_items,
    };

    execute(usecase, &ctx)
        .await
        .map(|follow_up| HttpResponse::Ok().json(APIResponse::new(follow_up)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct UpdateFollowUpUseCase {
    pub follow_up_id: ID,
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

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    InvalidTitle,
    InvalidSatisfaction(i16),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateFollowUpUseCase {
    type Response = FollowUp;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "UpdateFollowUp";

    async fn execute(&mut self, ctx: &CrmContext) -> Result<Self::Response, Self::Errors> {
        let mut follow_up = ctx
            .repos
            .follow_ups
            .find(&self.follow_up_id)
            .await
            .ok_or_else(|| UseCaseErrors::NotFound(self.follow_up_id.clone()))?;

        // Validate everything before mutating anything
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(UseCaseErrors::InvalidTitle);
            }
        }
        if let Some(rating) = self.customer_satisfaction {
            if !(1..=5).contains(&rating) {
                return Err(UseCaseErrors::InvalidSatisfaction(rating));
            }
        }

        let now = ctx.sys.get_utc_now();

        if let Some(title) = &self.title {
            follow_up.title = title.clone();
        }
        if let Some(description) = &self.description {
            follow_up.description = Some(description.clone());
        }
        if let Some(follow_up_type) = self.follow_up_type {
            follow_up.follow_up_type = follow_up_type;
        }
        if let Some(priority) = self.priority {
            follow_up.priority = priority;
        }
        if let Some(communication_method) = self.communication_method {
            follow_up.communication_method = communication_method;
        }
        if let Some(scheduled_date) = self.scheduled_date {
            follow_up.scheduled_date = scheduled_date;
        }
        if let Some(scheduled_time) = self.scheduled_time {
            follow_up.scheduled_time = Some(scheduled_time);
        }
        // Every documented transition is allowed, staff may always correct
        // a record. `set_status` keeps the completion stamp consistent.
        if let Some(status) = self.status {
            follow_up.set_status(status, now);
        }
        if let Some(outcome) = self.outcome {
            follow_up.outcome = Some(outcome);
        }
        if let Some(rating) = self.customer_satisfaction {
            follow_up.set_customer_satisfaction(rating);
        }
        if let Some(customer_feedback) = &self.customer_feedback {
            follow_up.customer_feedback = Some(customer_feedback.clone());
        }
        if let Some(actual_duration) = self.actual_duration {
            follow_up.actual_duration = Some(actual_duration);
        }
        if let Some(assigned_to_id) = &self.assigned_to_id {
            follow_up.assigned_to_id = Some(assigned_to_id.clone());
        }
        if let Some(next_follow_up_date) = self.next_follow_up_date {
            follow_up.next_follow_up_date = Some(next_follow_up_date);
        }
        if let Some(next_follow_up_reason) = &self.next_follow_up_reason {
            follow_up.next_follow_up_reason = Some(next_follow_up_reason.clone());
        }
        if let Some(internal_notes) = &self.internal_notes {
            follow_up.internal_notes = Some(internal_notes.clone());
        }
        if let Some(public_notes) = &self.public_notes {
            follow_up.public_notes = Some(public_notes.clone());
        }
        if let Some(tags) = &self.tags {
            follow_up.tags = tags.clone();
        }
        if let Some(health_status) = &self.health_status {
            follow_up.health_status = health_status.clone();
        }
        if let Some(product_usage) = &self.product_usage {
            follow_up.product_usage = product_usage.clone();
        }
        if let Some(recommendations) = &self.recommendations {
            follow_up.recommendations = recommendations.clone();
        }
        // Action items live and die with their parent, the incoming list
        // replaces the stored one
        if let Some(action_items) = &self.action_items {
            follow_up.action_items = action_items.clone();
        }
        follow_up.updated = now;

        ctx.repos
            .follow_ups
            .save(&follow_up)
            .await
            .map(|_| follow_up)
            .map_err(|_| UseCaseErrors::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};
    use vita_crm_domain::{ActionItemStatus, FollowUp};

    fn empty_update(follow_up_id: ID) -> UpdateFollowUpUseCase {
        UpdateFollowUpUseCase {
            follow_up_id,
            title: None,
            description: None,
            follow_up_type: None,
            priority: None,
            communication_method: None,
            scheduled_date: None,
            scheduled_time: None,
            status: None,
            outcome: None,
            customer_satisfaction: None,
            customer_feedback: None,
            actual_duration: None,
            assigned_to_id: None,
            next_follow_up_date: None,
            next_follow_up_reason: None,
            internal_notes: None,
            public_notes: None,
            tags: None,
            health_status: None,
            product_usage: None,
            recommendations: None,
            action_items: None,
        }
    }

    async fn insert_follow_up(ctx: &CrmContext) -> FollowUp {
        let follow_up = FollowUp::new(
            Default::default(),
            "Reorder reminder".into(),
            NaiveDate::from_ymd(2021, 4, 12),
            Utc.ymd(2021, 4, 1).and_hms(9, 0, 0),
        );
        ctx.repos.follow_ups.insert(&follow_up).await.unwrap();
        follow_up
    }

    #[actix_web::test]
    async fn update_nonexisting_follow_up() {
        let ctx = CrmContext::create_inmemory();
        let usecase = empty_update(Default::default());
        let res = execute(usecase, &ctx).await;
        assert!(res.is_err());
    }

    #[actix_web::test]
    async fn rejects_out_of_range_satisfaction_without_writing() {
        let ctx = CrmContext::create_inmemory();
        let follow_up = insert_follow_up(&ctx).await;

        let mut usecase = empty_update(follow_up.id.clone());
        usecase.customer_satisfaction = Some(9);
        usecase.title = Some("Renamed".into());
        let res = execute(usecase, &ctx).await;
        assert!(matches!(res, Err(UseCaseErrors::InvalidSatisfaction(9))));

        // No partial write happened
        let stored = ctx.repos.follow_ups.find(&follow_up.id).await.unwrap();
        assert_eq!(stored.title, "Reorder reminder");
        assert!(stored.customer_satisfaction.is_none());
    }

    #[actix_web::test]
    async fn completing_stamps_completed_date_and_reopening_clears_it() {
        let ctx = CrmContext::create_inmemory();
        let follow_up = insert_follow_up(&ctx).await;

        let mut usecase = empty_update(follow_up.id.clone());
        usecase.status = Some(FollowUpStatus::Completed);
        usecase.outcome = Some(FollowUpOutcome::Successful);
        usecase.customer_satisfaction = Some(4);
        let updated = execute(usecase, &ctx).await.unwrap();
        assert!(updated.completed_date.is_some());
        assert_eq!(updated.customer_satisfaction, Some(4));

        let mut usecase = empty_update(follow_up.id.clone());
        usecase.status = Some(FollowUpStatus::Scheduled);
        let reopened = execute(usecase, &ctx).await.unwrap();
        assert!(reopened.completed_date.is_none());
    }

    #[actix_web::test]
    async fn replaces_action_items_as_a_whole() {
        let ctx = CrmContext::create_inmemory();
        let follow_up = insert_follow_up(&ctx).await;

        let mut first = ActionItem::new("Send dosage guide".into());
        first.status = ActionItemStatus::InProgress;
        let second = ActionItem::new("Book next call".into());

        let mut usecase = empty_update(follow_up.id.clone());
        usecase.action_items = Some(vec![first, second]);
        let updated = execute(usecase, &ctx).await.unwrap();
        assert_eq!(updated.action_items.len(), 2);
        assert_eq!(updated.action_items[0].status, ActionItemStatus::InProgress);

        let mut usecase = empty_update(follow_up.id.clone());
        usecase.action_items = Some(Vec::new());
        let cleared = execute(usecase, &ctx).await.unwrap();
        assert!(cleared.action_items.is_empty());
    }
}
