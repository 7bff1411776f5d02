use crate::{
    error::CrmError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use vita_crm_api_structs::delete_follow_up::*;
use vita_crm_domain::{FollowUp, FollowUpStatus, ID};
use vita_crm_infra::CrmContext;

fn handle_error(e: UseCaseErrors) -> CrmError {
    match e {
        UseCaseErrors::NotFound(follow_up_id) => CrmError::NotFound(format!(
            "The follow up with id: {}, was not found.",
            follow_up_id
        )),
        UseCaseErrors::CompletedFollowUpLocked => CrmError::Conflict(
            "A completed follow up cannot be deleted".into(),
        ),
    }
}

pub async fn delete_follow_up_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<CrmContext>,
) -> Result<HttpResponse, CrmError> {
    let usecase = DeleteFollowUpUseCase {
        follow_up_id: path_params.follow_up_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|follow_up| HttpResponse::Ok().json(APIResponse::new(follow_up)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct DeleteFollowUpUseCase {
    pub follow_up_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    CompletedFollowUpLocked,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteFollowUpUseCase {
    type Response = FollowUp;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "DeleteFollowUp";

    async fn execute(&mut self, ctx: &CrmContext) -> Result<Self::Response, Self::Errors> {
        let follow_up = ctx
            .repos
            .follow_ups
            .find(&self.follow_up_id)
            .await
            .ok_or_else(|| UseCaseErrors::NotFound(self.follow_up_id.clone()))?;

        // Completed records are kept for the customer history
        if follow_up.status == FollowUpStatus::Completed {
            return Err(UseCaseErrors::CompletedFollowUpLocked);
        }

        ctx.repos
            .follow_ups
            .delete(&self.follow_up_id)
            .await
            .ok_or_else(|| UseCaseErrors::NotFound(self.follow_up_id.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[actix_web::test]
    async fn deletes_scheduled_but_not_completed_follow_ups() {
        let ctx = CrmContext::create_inmemory();
        let now = Utc.ymd(2021, 4, 1).and_hms(9, 0, 0);

        let scheduled = FollowUp::new(
            Default::default(),
            "Intro call".into(),
            NaiveDate::from_ymd(2021, 4, 12),
            now,
        );
        let mut completed = FollowUp::new(
            Default::default(),
            "Closing call".into(),
            NaiveDate::from_ymd(2021, 3, 12),
            now,
        );
        completed.set_status(FollowUpStatus::Completed, now);
        ctx.repos.follow_ups.insert(&scheduled).await.unwrap();
        ctx.repos.follow_ups.insert(&completed).await.unwrap();

        let usecase = DeleteFollowUpUseCase {
            follow_up_id: scheduled.id.clone(),
        };
        assert!(execute(usecase, &ctx).await.is_ok());
        assert!(ctx.repos.follow_ups.find(&scheduled.id).await.is_none());

        let usecase = DeleteFollowUpUseCase {
            follow_up_id: completed.id.clone(),
        };
        let res = execute(usecase, &ctx).await;
        assert!(matches!(res, Err(UseCaseErrors::CompletedFollowUpLocked)));
        assert!(ctx.repos.follow_ups.find(&completed.id).await.is_some());
    }
}
