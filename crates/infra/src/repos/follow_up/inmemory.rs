use super::IFollowUpRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::query_structs::{FollowUpFilter, FollowUpSort};
use vita_crm_domain::{FollowUp, ID};

pub struct InMemoryFollowUpRepo {
    follow_ups: std::sync::Mutex<Vec<FollowUp>>,
}

impl InMemoryFollowUpRepo {
    pub fn new() -> Self {
        Self {
            follow_ups: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IFollowUpRepo for InMemoryFollowUpRepo {
    async fn insert(&self, follow_up: &FollowUp) -> anyhow::Result<()> {
        insert(follow_up, &self.follow_ups);
        Ok(())
    }

    async fn save(&self, follow_up: &FollowUp) -> anyhow::Result<()> {
        save(follow_up, &self.follow_ups);
        Ok(())
    }

    async fn find(&self, follow_up_id: &ID) -> Option<FollowUp> {
        find(follow_up_id, &self.follow_ups)
    }

    async fn find_many(&self, follow_up_ids: &[ID]) -> anyhow::Result<Vec<FollowUp>> {
        let res = find_by(&self.follow_ups, |follow_up| {
            follow_up_ids.contains(&follow_up.id)
        });
        Ok(res)
    }

    async fn find_by_filter(
        &self,
        filter: &FollowUpFilter,
        sort: &FollowUpSort,
        skip: i64,
        limit: Option<i64>,
    ) -> anyhow::Result<Vec<FollowUp>> {
        let mut res = find_by(&self.follow_ups, |follow_up| filter.matches(follow_up));
        res.sort_by(|a, b| sort.compare(a, b));

        let res = res
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX))
            .collect();
        Ok(res)
    }

    async fn count(&self, filter: &FollowUpFilter) -> anyhow::Result<i64> {
        let res = find_by(&self.follow_ups, |follow_up| filter.matches(follow_up));
        Ok(res.len() as i64)
    }

    async fn delete(&self, follow_up_id: &ID) -> Option<FollowUp> {
        delete(follow_up_id, &self.follow_ups)
    }
}
