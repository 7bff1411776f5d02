use crate::{
    error::CrmError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use vita_crm_api_structs::get_follow_up::*;
use vita_crm_domain::{FollowUp, ID};
use vita_crm_infra::CrmContext;

fn handle_error(e: UseCaseErrors) -> CrmError {
    match e {
        UseCaseErrors::NotFound(follow_up_id) => CrmError::NotFound(format!(
            "The follow up with id: {}, was not found.",
            follow_up_id
        )),
    }
}

pub async fn get_follow_up_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<CrmContext>,
) -> Result<HttpResponse, CrmError> {
    let usecase = GetFollowUpUseCase {
        follow_up_id: path_params.follow_up_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|follow_up| HttpResponse::Ok().json(APIResponse::new(follow_up)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct GetFollowUpUseCase {
    pub follow_up_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetFollowUpUseCase {
    type Response = FollowUp;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetFollowUp";

    async fn execute(&mut self, ctx: &CrmContext) -> Result<Self::Response, Self::Errors> {
        ctx.repos
            .follow_ups
            .find(&self.follow_up_id)
            .await
            .ok_or_else(|| UseCaseErrors::NotFound(self.follow_up_id.clone()))
    }
}
