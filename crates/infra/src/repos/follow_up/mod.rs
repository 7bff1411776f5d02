mod inmemory;
mod postgres;

use crate::repos::shared::query_structs::{FollowUpFilter, FollowUpSort};
pub use inmemory::InMemoryFollowUpRepo;
pub use postgres::PostgresFollowUpRepo;
use vita_crm_domain::{FollowUp, ID};

#[async_trait::async_trait]
pub trait IFollowUpRepo: Send + Sync {
    async fn insert(&self, follow_up: &FollowUp) -> anyhow::Result<()>;
    async fn save(&self, follow_up: &FollowUp) -> anyhow::Result<()>;
    async fn find(&self, follow_up_id: &ID) -> Option<FollowUp>;
    async fn find_many(&self, follow_up_ids: &[ID]) -> anyhow::Result<Vec<FollowUp>>;
    /// Filtered, sorted and paginated retrieval. `limit = None` fetches the
    /// full matching set, which read services use to compute summaries from
    /// the same snapshot they page from.
    async fn find_by_filter(
        &self,
        filter: &FollowUpFilter,
        sort: &FollowUpSort,
        skip: i64,
        limit: Option<i64>,
    ) -> anyhow::Result<Vec<FollowUp>>;
    async fn count(&self, filter: &FollowUpFilter) -> anyhow::Result<i64>;
    async fn delete(&self, follow_up_id: &ID) -> Option<FollowUp>;
}

#[cfg(test)]
mod tests {
    use crate::repos::shared::query_structs::{
        FollowUpSortField, SearchFilter, SortDirection,
    };
    use crate::CrmContext;
    use chrono::{NaiveDate, TimeZone, Utc};
    use vita_crm_domain::{Entity, FollowUpStatus, Priority};

    use super::*;

    fn generate_follow_up(title: &str, scheduled: NaiveDate) -> FollowUp {
        FollowUp::new(
            Default::default(),
            title.into(),
            scheduled,
            Utc.ymd(2021, 3, 1).and_hms(8, 0, 0),
        )
    }

    #[tokio::test]
    async fn create_and_delete() {
        let ctx = CrmContext::create_inmemory();
        let follow_up = generate_follow_up("Post delivery call", NaiveDate::from_ymd(2021, 3, 5));

        assert!(ctx.repos.follow_ups.insert(&follow_up).await.is_ok());

        let found = ctx.repos.follow_ups.find(&follow_up.id).await.unwrap();
        assert!(found.eq(&follow_up));
        let found_many = ctx
            .repos
            .follow_ups
            .find_many(&[follow_up.id.clone()])
            .await
            .unwrap();
        assert_eq!(found_many.len(), 1);

        let deleted = ctx.repos.follow_ups.delete(&follow_up.id).await.unwrap();
        assert!(deleted.eq(&follow_up));
        assert!(ctx.repos.follow_ups.find(&follow_up.id).await.is_none());
    }

    #[tokio::test]
    async fn save_overwrites_fields() {
        let ctx = CrmContext::create_inmemory();
        let mut follow_up =
            generate_follow_up("Plan adjustment", NaiveDate::from_ymd(2021, 3, 5));
        ctx.repos.follow_ups.insert(&follow_up).await.unwrap();

        follow_up.priority = Priority::Urgent;
        follow_up.reminder_sent = true;
        ctx.repos.follow_ups.save(&follow_up).await.unwrap();

        let found = ctx.repos.follow_ups.find(&follow_up.id).await.unwrap();
        assert_eq!(found.priority, Priority::Urgent);
        assert!(found.reminder_sent);
    }

    #[tokio::test]
    async fn filters_by_status_priority_and_date_range() {
        let ctx = CrmContext::create_inmemory();

        let mut a = generate_follow_up("a", NaiveDate::from_ymd(2021, 3, 5));
        a.priority = Priority::High;
        let mut b = generate_follow_up("b", NaiveDate::from_ymd(2021, 3, 10));
        b.status = FollowUpStatus::Completed;
        let c = generate_follow_up("c", NaiveDate::from_ymd(2021, 4, 2));
        for f in &[&a, &b, &c] {
            ctx.repos.follow_ups.insert(f).await.unwrap();
        }

        let filter = FollowUpFilter {
            statuses: Some(vec![FollowUpStatus::Scheduled]),
            ..Default::default()
        };
        let found = ctx
            .repos
            .follow_ups
            .find_by_filter(&filter, &Default::default(), 0, None)
            .await
            .unwrap();
        assert_eq!(found.len(), 2);

        let filter = FollowUpFilter {
            priority: Some(Priority::High),
            ..Default::default()
        };
        assert_eq!(ctx.repos.follow_ups.count(&filter).await.unwrap(), 1);

        let filter = FollowUpFilter {
            scheduled_from: Some(NaiveDate::from_ymd(2021, 3, 6)),
            scheduled_until: Some(NaiveDate::from_ymd(2021, 4, 30)),
            ..Default::default()
        };
        let found = ctx
            .repos
            .follow_ups
            .find_by_filter(&filter, &Default::default(), 0, None)
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn search_matches_title_or_resolved_customers() {
        let ctx = CrmContext::create_inmemory();

        let by_title = generate_follow_up("Vitamin D reorder", NaiveDate::from_ymd(2021, 3, 5));
        let by_customer = generate_follow_up("Check in", NaiveDate::from_ymd(2021, 3, 6));
        let unrelated = generate_follow_up("Survey", NaiveDate::from_ymd(2021, 3, 7));
        for f in &[&by_title, &by_customer, &unrelated] {
            ctx.repos.follow_ups.insert(f).await.unwrap();
        }

        let filter = FollowUpFilter {
            search: Some(SearchFilter {
                text: "vitamin".into(),
                customer_ids: vec![by_customer.customer_id.clone()],
            }),
            ..Default::default()
        };
        let found = ctx
            .repos
            .follow_ups
            .find_by_filter(&filter, &Default::default(), 0, None)
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|f| f.id != unrelated.id));
    }

    #[tokio::test]
    async fn sorts_and_paginates() {
        let ctx = CrmContext::create_inmemory();

        let mut low = generate_follow_up("low", NaiveDate::from_ymd(2021, 3, 1));
        low.priority = Priority::Low;
        let mut urgent = generate_follow_up("urgent", NaiveDate::from_ymd(2021, 3, 2));
        urgent.priority = Priority::Urgent;
        let mut medium = generate_follow_up("medium", NaiveDate::from_ymd(2021, 3, 3));
        medium.priority = Priority::Medium;
        for f in &[&low, &urgent, &medium] {
            ctx.repos.follow_ups.insert(f).await.unwrap();
        }

        let sort = FollowUpSort {
            field: FollowUpSortField::Priority,
            direction: SortDirection::Desc,
        };
        let found = ctx
            .repos
            .follow_ups
            .find_by_filter(&Default::default(), &sort, 0, None)
            .await
            .unwrap();
        let titles = found.iter().map(|f| f.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["urgent", "medium", "low"]);

        let page = ctx
            .repos
            .follow_ups
            .find_by_filter(&Default::default(), &sort, 1, Some(1))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "medium");
    }
}
