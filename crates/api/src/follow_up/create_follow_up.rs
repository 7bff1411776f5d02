use crate::{
    error::CrmError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, NaiveTime};
use vita_crm_api_structs::create_follow_up::*;
use vita_crm_domain::{
    ActionItem, CommunicationMethod, FollowUp, FollowUpType, Priority, ID,
};
use vita_crm_infra::CrmContext;

fn handle_error(e: UseCaseErrors) -> CrmError {
    match e {
        UseCaseErrors::CustomerNotFound(customer_id) => CrmError::NotFound(format!(
            "The customer with id: {}, was not found.",
            customer_id
        )),
        UseCaseErrors::InvalidTitle => {
            CrmError::BadClientData("The provided title cannot be empty".into())
        }
        UseCaseErrors::StorageError => CrmError::InternalError,
    }
}

pub async fn create_follow_up_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<CrmContext>,
) -> Result<HttpResponse, CrmError> {
    let body = body.0;
    let usecase = CreateFollowUpUseCase {
        customer_id: body.customer_id,
        title: body.title,
        scheduled_date: body.scheduled_date,
        scheduled_time: body.scheduled_time,
        follow_up_type: body.follow_up_type,
        priority: body.priority,
        communication_method: body.communication_method,
        assigned_to_id: body.assigned_to_id,
        created_by_id: body.created_by_id,
        description: body.description,
        internal_notes: body.internal_notes,
        public_notes: body.public_notes,
        tags: body.tags.unwrap_or_default(),
        next_follow_up_date: body.next_follow_up_date,
        next_follow_up_reason: body.next_follow_up_reason,
        action_items: body.action_items.unwrap_or_default(),
    };

    execute(usecase, &ctx)
        .await
        .map(|follow_up| HttpResponse::Created().json(APIResponse::new(follow_up)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct CreateFollowUpUseCase {
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
    pub tags: Vec<String>,
    pub next_follow_up_date: Option<NaiveDate>,
    pub next_follow_up_reason: Option<String>,
    pub action_items: Vec<ActionItem>,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    CustomerNotFound(ID),
    InvalidTitle,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateFollowUpUseCase {
    type Response = FollowUp;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "CreateFollowUp";

    async fn execute(&mut self, ctx: &CrmContext) -> Result<Self::Response, Self::Errors> {
        if self.title.trim().is_empty() {
            return Err(UseCaseErrors::InvalidTitle);
        }
        let customer = ctx
            .repos
            .customers
            .find(&self.customer_id)
            .await
            .ok_or_else(|| UseCaseErrors::CustomerNotFound(self.customer_id.clone()))?;

        let now = ctx.sys.get_utc_now();
        let mut follow_up = FollowUp::new(
            customer.id,
            self.title.clone(),
            self.scheduled_date,
            now,
        );
        follow_up.scheduled_time = self.scheduled_time;
        if let Some(follow_up_type) = self.follow_up_type {
            follow_up.follow_up_type = follow_up_type;
        }
        if let Some(priority) = self.priority {
            follow_up.priority = priority;
        }
        if let Some(communication_method) = self.communication_method {
            follow_up.communication_method = communication_method;
        }
        follow_up.assigned_to_id = self.assigned_to_id.clone();
        follow_up.created_by_id = self.created_by_id.clone();
        follow_up.description = self.description.clone();
        follow_up.internal_notes = self.internal_notes.clone();
        follow_up.public_notes = self.public_notes.clone();
        follow_up.tags = self.tags.clone();
        follow_up.next_follow_up_date = self.next_follow_up_date;
        follow_up.next_follow_up_reason = self.next_follow_up_reason.clone();
        follow_up.action_items = self.action_items.clone();

        ctx.repos
            .follow_ups
            .insert(&follow_up)
            .await
            .map(|_| follow_up)
            .map_err(|_| UseCaseErrors::StorageError)
    }
}
