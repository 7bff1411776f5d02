use crate::{
    error::CrmError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::warn;
use vita_crm_api_structs::bulk_follow_up_actions::*;
use vita_crm_domain::{FollowUpStatus, ID};
use vita_crm_infra::CrmContext;

fn handle_error(e: UseCaseErrors) -> CrmError {
    match e {
        UseCaseErrors::EmptyIdSet => {
            CrmError::BadClientData("At least one follow up id must be provided".into())
        }
        UseCaseErrors::UnrecognizedAction(action) => CrmError::BadClientData(format!(
            "The provided action: {} is not one of mark_reminder_sent, snooze_reminder, reschedule",
            action
        )),
        UseCaseErrors::MissingActionParameter(param) => CrmError::BadClientData(format!(
            "The provided action requires the {} parameter",
            param
        )),
        UseCaseErrors::SnoozeNotInFuture => {
            CrmError::BadClientData("The snoozeUntil instant must be in the future".into())
        }
        UseCaseErrors::StorageError => CrmError::InternalError,
    }
}

pub async fn bulk_follow_up_actions_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<CrmContext>,
) -> Result<HttpResponse, CrmError> {
    let body = body.0;
    let usecase = BulkFollowUpActionsUseCase {
        follow_up_ids: body.follow_up_ids,
        action: body.action,
        snooze_until: body.snooze_until,
        new_date: body.new_date,
        new_time: body.new_time,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse {
                modified_count: res.modified_count,
            })
        })
        .map_err(handle_error)
}

/// Applies one action to every resolvable target. Ids that do not resolve
/// are skipped silently, the call only fails wholesale on bad input. Each
/// record is saved on its own, a failing save must not undo the others.
#[derive(Debug)]
pub struct BulkFollowUpActionsUseCase {
    pub follow_up_ids: Vec<ID>,
    pub action: String,
    pub snooze_until: Option<DateTime<Utc>>,
    pub new_date: Option<NaiveDate>,
    pub new_time: Option<NaiveTime>,
}

#[derive(Debug)]
pub struct BulkActionsResult {
    pub modified_count: usize,
}

#[derive(Debug)]
enum BulkAction {
    MarkReminderSent,
    SnoozeReminder(DateTime<Utc>),
    Reschedule(NaiveDate, Option<NaiveTime>),
}

#[derive(Debug)]
pub enum UseCaseErrors {
    EmptyIdSet,
    UnrecognizedAction(String),
    MissingActionParameter(&'static str),
    SnoozeNotInFuture,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for BulkFollowUpActionsUseCase {
    type Response = BulkActionsResult;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "BulkFollowUpActions";

    async fn execute(&mut self, ctx: &CrmContext) -> Result<Self::Response, Self::Errors> {
        if self.follow_up_ids.is_empty() {
            return Err(UseCaseErrors::EmptyIdSet);
        }

        // One frozen instant per batch call so re-applying an action is
        // observably idempotent
        let now = ctx.sys.get_utc_now();

        let action = match self.action.as_str() {
            "mark_reminder_sent" => BulkAction::MarkReminderSent,
            "snooze_reminder" => {
                let until = self
                    .snooze_until
                    .ok_or(UseCaseErrors::MissingActionParameter("snoozeUntil"))?;
                if until <= now {
                    return Err(UseCaseErrors::SnoozeNotInFuture);
                }
                BulkAction::SnoozeReminder(until)
            }
            "reschedule" => {
                let new_date = self
                    .new_date
                    .ok_or(UseCaseErrors::MissingActionParameter("newDate"))?;
                BulkAction::Reschedule(new_date, self.new_time)
            }
            _ => return Err(UseCaseErrors::UnrecognizedAction(self.action.clone())),
        };

        let follow_ups = ctx
            .repos
            .follow_ups
            .find_many(&self.follow_up_ids)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        let mut modified_count = 0;
        for mut follow_up in follow_ups {
            match &action {
                BulkAction::MarkReminderSent => {
                    follow_up.reminder_sent = true;
                    follow_up.reminder_date = Some(now);
                }
                BulkAction::SnoozeReminder(until) => {
                    // Defers when the record is next offered for reminding,
                    // without pretending the reminder was acted upon
                    follow_up.reminder_date = Some(*until);
                }
                BulkAction::Reschedule(new_date, new_time) => {
                    follow_up.scheduled_date = *new_date;
                    follow_up.scheduled_time = *new_time;
                    follow_up.set_status(FollowUpStatus::Scheduled, now);
                    // The prior reminder cycle is moot once the record moves
                    follow_up.reminder_sent = false;
                    follow_up.reminder_date = None;
                }
            }
            follow_up.updated = now;

            match ctx.repos.follow_ups.save(&follow_up).await {
                Ok(_) => modified_count += 1,
                Err(e) => warn!(
                    "Bulk action failed to save follow up with id: {}. Error: {:?}",
                    follow_up.id, e
                ),
            }
        }

        Ok(BulkActionsResult { modified_count })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;
    use vita_crm_domain::FollowUp;
    use vita_crm_infra::ISys;

    struct StaticTimeSys;
    impl ISys for StaticTimeSys {
        fn get_utc_now(&self) -> DateTime<Utc> {
            // Wed Mar 10 2021 09:00:00 UTC
            Utc.ymd(2021, 3, 10).and_hms(9, 0, 0)
        }
    }

    fn setup_ctx() -> CrmContext {
        let mut ctx = CrmContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys {});
        ctx
    }

    async fn insert_follow_up(ctx: &CrmContext, days_from_now: i64) -> FollowUp {
        let now = ctx.sys.get_utc_now();
        let date = now.naive_utc().date() + Duration::days(days_from_now);
        let follow_up = FollowUp::new(Default::default(), "Check in".into(), date, now);
        ctx.repos.follow_ups.insert(&follow_up).await.unwrap();
        follow_up
    }

    fn usecase_with(ids: Vec<ID>, action: &str) -> BulkFollowUpActionsUseCase {
        BulkFollowUpActionsUseCase {
            follow_up_ids: ids,
            action: action.into(),
            snooze_until: None,
            new_date: None,
            new_time: None,
        }
    }

    #[actix_web::test]
    async fn marking_reminder_sent_is_idempotent() {
        let ctx = setup_ctx();
        let now = ctx.sys.get_utc_now();
        let a = insert_follow_up(&ctx, -1).await;
        let b = insert_follow_up(&ctx, -2).await;
        let ids = vec![a.id.clone(), b.id.clone()];

        let res = execute(usecase_with(ids.clone(), "mark_reminder_sent"), &ctx)
            .await
            .unwrap();
        assert_eq!(res.modified_count, 2);

        let first_pass = ctx.repos.follow_ups.find(&a.id).await.unwrap();
        assert!(first_pass.reminder_sent);
        assert_eq!(first_pass.reminder_date, Some(now));

        // Applying the same action again yields the same final state
        let res = execute(usecase_with(ids, "mark_reminder_sent"), &ctx)
            .await
            .unwrap();
        assert_eq!(res.modified_count, 2);
        let second_pass = ctx.repos.follow_ups.find(&a.id).await.unwrap();
        assert!(second_pass.reminder_sent);
        assert_eq!(second_pass.reminder_date, Some(now));
    }

    #[actix_web::test]
    async fn unresolvable_ids_are_skipped_silently() {
        let ctx = setup_ctx();
        let existing = insert_follow_up(&ctx, -1).await;

        let usecase = usecase_with(
            vec![existing.id.clone(), ID::default()],
            "mark_reminder_sent",
        );
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.modified_count, 1);
    }

    #[actix_web::test]
    async fn fails_wholesale_on_bad_input() {
        let ctx = setup_ctx();
        let existing = insert_follow_up(&ctx, -1).await;

        let res = execute(usecase_with(Vec::new(), "mark_reminder_sent"), &ctx).await;
        assert!(matches!(res, Err(UseCaseErrors::EmptyIdSet)));

        let res = execute(
            usecase_with(vec![existing.id.clone()], "mark_everything_done"),
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseErrors::UnrecognizedAction(_))));

        let res = execute(usecase_with(vec![existing.id.clone()], "snooze_reminder"), &ctx).await;
        assert!(matches!(
            res,
            Err(UseCaseErrors::MissingActionParameter("snoozeUntil"))
        ));

        let mut usecase = usecase_with(vec![existing.id.clone()], "snooze_reminder");
        usecase.snooze_until = Some(ctx.sys.get_utc_now() - Duration::hours(1));
        let res = execute(usecase, &ctx).await;
        assert!(matches!(res, Err(UseCaseErrors::SnoozeNotInFuture)));

        // Nothing was modified along the way
        let stored = ctx.repos.follow_ups.find(&existing.id).await.unwrap();
        assert!(!stored.reminder_sent);
    }

    #[actix_web::test]
    async fn snoozing_defers_reminding_without_touching_status() {
        let ctx = setup_ctx();
        let now = ctx.sys.get_utc_now();
        let follow_up = insert_follow_up(&ctx, -1).await;
        let until = now + Duration::days(1);

        let mut usecase = usecase_with(vec![follow_up.id.clone()], "snooze_reminder");
        usecase.snooze_until = Some(until);
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.modified_count, 1);

        let stored = ctx.repos.follow_ups.find(&follow_up.id).await.unwrap();
        assert_eq!(stored.reminder_date, Some(until));
        assert!(!stored.reminder_sent);
        assert_eq!(stored.status, FollowUpStatus::Scheduled);
        // The plain overdue view is unaffected by the snooze
        assert!(stored.is_overdue(now));
    }

    #[actix_web::test]
    async fn rescheduling_moves_the_record_and_resets_its_reminder_cycle() {
        let ctx = setup_ctx();
        let now = ctx.sys.get_utc_now();

        // Overdue record with a played out reminder cycle
        let mut follow_up = insert_follow_up(&ctx, -1).await;
        follow_up.reminder_sent = true;
        follow_up.reminder_date = Some(now - Duration::days(1));
        follow_up.set_status(FollowUpStatus::Cancelled, now);
        ctx.repos.follow_ups.save(&follow_up).await.unwrap();

        let tomorrow = now.naive_utc().date() + Duration::days(1);
        let mut usecase = usecase_with(vec![follow_up.id.clone()], "reschedule");
        usecase.new_date = Some(tomorrow);
        usecase.new_time = Some(NaiveTime::from_hms(10, 0, 0));
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.modified_count, 1);

        let stored = ctx.repos.follow_ups.find(&follow_up.id).await.unwrap();
        assert_eq!(stored.status, FollowUpStatus::Scheduled);
        assert_eq!(stored.scheduled_date, tomorrow);
        assert_eq!(stored.scheduled_time, Some(NaiveTime::from_hms(10, 0, 0)));
        assert!(!stored.is_overdue(now));
        assert!(!stored.reminder_sent);
        assert!(stored.reminder_date.is_none());

        // Omitting the time clears a previously set one
        let mut usecase = usecase_with(vec![follow_up.id.clone()], "reschedule");
        usecase.new_date = Some(tomorrow);
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.modified_count, 1);
        let stored = ctx.repos.follow_ups.find(&follow_up.id).await.unwrap();
        assert!(stored.scheduled_time.is_none());
    }

    #[actix_web::test]
    async fn overdue_record_recovers_after_reschedule() {
        let ctx = setup_ctx();
        let now = ctx.sys.get_utc_now();
        let follow_up = insert_follow_up(&ctx, -1).await;
        assert!(follow_up.is_overdue(now));

        let mut usecase = usecase_with(vec![follow_up.id.clone()], "reschedule");
        usecase.new_date = Some(now.naive_utc().date() + Duration::days(1));
        execute(usecase, &ctx).await.unwrap();

        let stored = ctx.repos.follow_ups.find(&follow_up.id).await.unwrap();
        assert!(!stored.is_overdue(now));
        assert_eq!(stored.status, FollowUpStatus::Scheduled);
        assert!(!stored.reminder_sent);
    }
}
