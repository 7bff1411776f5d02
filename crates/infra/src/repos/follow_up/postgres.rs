use super::IFollowUpRepo;
use crate::repos::shared::query_structs::{
    FollowUpFilter, FollowUpSort, FollowUpSortField, SortDirection,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use vita_crm_domain::{FollowUp, ID};

pub struct PostgresFollowUpRepo {
    pool: PgPool,
}

impl PostgresFollowUpRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct FollowUpRaw {
    follow_up_uid: Uuid,
    follow_up_code: String,
    customer_uid: Uuid,
    assigned_to_uid: Option<Uuid>,
    created_by_uid: Option<Uuid>,
    follow_up_type: String,
    priority: String,
    communication_method: String,
    scheduled_date: NaiveDate,
    scheduled_time: Option<NaiveTime>,
    next_follow_up_date: Option<NaiveDate>,
    next_follow_up_reason: Option<String>,
    status: String,
    completed_date: Option<DateTime<Utc>>,
    actual_duration: Option<i32>,
    outcome: Option<String>,
    customer_satisfaction: Option<i16>,
    customer_feedback: Option<String>,
    reminder_sent: bool,
    reminder_date: Option<DateTime<Utc>>,
    title: String,
    description: Option<String>,
    internal_notes: Option<String>,
    public_notes: Option<String>,
    tags: Vec<String>,
    health_status: serde_json::Value,
    product_usage: serde_json::Value,
    recommendations: Vec<String>,
    action_items: serde_json::Value,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl Into<FollowUp> for FollowUpRaw {
    fn into(self) -> FollowUp {
        FollowUp {
            id: self.follow_up_uid.into(),
            follow_up_code: self.follow_up_code,
            customer_id: self.customer_uid.into(),
            assigned_to_id: self.assigned_to_uid.map(|uid| uid.into()),
            created_by_id: self.created_by_uid.map(|uid| uid.into()),
            follow_up_type: self.follow_up_type.parse().unwrap(),
            priority: self.priority.parse().unwrap(),
            communication_method: self.communication_method.parse().unwrap(),
            scheduled_date: self.scheduled_date,
            scheduled_time: self.scheduled_time,
            next_follow_up_date: self.next_follow_up_date,
            next_follow_up_reason: self.next_follow_up_reason,
            status: self.status.parse().unwrap(),
            completed_date: self.completed_date,
            actual_duration: self.actual_duration,
            outcome: self.outcome.map(|outcome| outcome.parse().unwrap()),
            customer_satisfaction: self.customer_satisfaction,
            customer_feedback: self.customer_feedback,
            reminder_sent: self.reminder_sent,
            reminder_date: self.reminder_date,
            title: self.title,
            description: self.description,
            internal_notes: self.internal_notes,
            public_notes: self.public_notes,
            tags: self.tags,
            health_status: serde_json::from_value(self.health_status).unwrap(),
            product_usage: serde_json::from_value(self.product_usage).unwrap(),
            recommendations: self.recommendations,
            action_items: serde_json::from_value(self.action_items).unwrap(),
            created: self.created,
            updated: self.updated,
        }
    }
}

struct FilterBinds {
    ids: Option<Vec<Uuid>>,
    customer_ids: Option<Vec<Uuid>>,
    assigned_to_uid: Option<Uuid>,
    statuses: Option<Vec<String>>,
    priority: Option<String>,
    follow_up_type: Option<String>,
    scheduled_from: Option<NaiveDate>,
    scheduled_until: Option<NaiveDate>,
    search_text: Option<String>,
    search_customer_ids: Vec<Uuid>,
}

fn to_uuids(ids: &[ID]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.inner_ref()).collect()
}

impl FilterBinds {
    fn new(filter: &FollowUpFilter) -> Self {
        Self {
            ids: filter.ids.as_ref().map(|ids| to_uuids(ids)),
            customer_ids: filter.customer_ids.as_ref().map(|ids| to_uuids(ids)),
            assigned_to_uid: filter.assigned_to_id.as_ref().map(|id| *id.inner_ref()),
            statuses: filter.statuses.as_ref().map(|statuses| {
                statuses
                    .iter()
                    .map(|status| status.as_str().to_string())
                    .collect()
            }),
            priority: filter.priority.map(|priority| priority.as_str().to_string()),
            follow_up_type: filter
                .follow_up_type
                .map(|follow_up_type| follow_up_type.as_str().to_string()),
            scheduled_from: filter.scheduled_from,
            scheduled_until: filter.scheduled_until,
            search_text: filter.search.as_ref().map(|search| search.text.clone()),
            search_customer_ids: filter
                .search
                .as_ref()
                .map(|search| to_uuids(&search.customer_ids))
                .unwrap_or_default(),
        }
    }
}

const FILTER_WHERE_CLAUSE: &str = r#"
    ($1::uuid[] IS NULL OR follow_up_uid = ANY($1))
    AND ($2::uuid[] IS NULL OR customer_uid = ANY($2))
    AND ($3::uuid IS NULL OR assigned_to_uid = $3)
    AND ($4::text[] IS NULL OR status = ANY($4))
    AND ($5::text IS NULL OR priority = $5)
    AND ($6::text IS NULL OR follow_up_type = $6)
    AND ($7::date IS NULL OR scheduled_date >= $7)
    AND ($8::date IS NULL OR scheduled_date <= $8)
    AND ($9::text IS NULL OR title ILIKE '%' || $9 || '%' OR customer_uid = ANY($10::uuid[]))
"#;

fn order_by_clause(sort: &FollowUpSort) -> String {
    let field = match sort.field {
        FollowUpSortField::ScheduledDate => "scheduled_date",
        FollowUpSortField::Created => "created",
        FollowUpSortField::Priority => {
            "CASE priority WHEN 'urgent' THEN 3 WHEN 'high' THEN 2 WHEN 'medium' THEN 1 ELSE 0 END"
        }
        FollowUpSortField::Title => "title",
        FollowUpSortField::Status => "status",
    };
    let direction = match sort.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    format!("{} {}", field, direction)
}

#[async_trait::async_trait]
impl IFollowUpRepo for PostgresFollowUpRepo {
    async fn insert(&self, follow_up: &FollowUp) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO follow_ups(
                follow_up_uid,
                follow_up_code,
                customer_uid,
                assigned_to_uid,
                created_by_uid,
                follow_up_type,
                priority,
                communication_method,
                scheduled_date,
                scheduled_time,
                next_follow_up_date,
                next_follow_up_reason,
                status,
                completed_date,
                actual_duration,
                outcome,
                customer_satisfaction,
                customer_feedback,
                reminder_sent,
                reminder_date,
                title,
                description,
                internal_notes,
                public_notes,
                tags,
                health_status,
                product_usage,
                recommendations,
                action_items,
                created,
                updated
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                   $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31)
            "#,
        )
        .bind(follow_up.id.inner_ref())
        .bind(&follow_up.follow_up_code)
        .bind(follow_up.customer_id.inner_ref())
        .bind(follow_up.assigned_to_id.as_ref().map(|id| *id.inner_ref()))
        .bind(follow_up.created_by_id.as_ref().map(|id| *id.inner_ref()))
        .bind(follow_up.follow_up_type.as_str())
        .bind(follow_up.priority.as_str())
        .bind(follow_up.communication_method.as_str())
        .bind(follow_up.scheduled_date)
        .bind(follow_up.scheduled_time)
        .bind(follow_up.next_follow_up_date)
        .bind(&follow_up.next_follow_up_reason)
        .bind(follow_up.status.as_str())
        .bind(follow_up.completed_date)
        .bind(follow_up.actual_duration)
        .bind(follow_up.outcome.map(|outcome| outcome.as_str()))
        .bind(follow_up.customer_satisfaction)
        .bind(&follow_up.customer_feedback)
        .bind(follow_up.reminder_sent)
        .bind(follow_up.reminder_date)
        .bind(&follow_up.title)
        .bind(&follow_up.description)
        .bind(&follow_up.internal_notes)
        .bind(&follow_up.public_notes)
        .bind(&follow_up.tags)
        .bind(Json(&follow_up.health_status))
        .bind(Json(&follow_up.product_usage))
        .bind(&follow_up.recommendations)
        .bind(Json(&follow_up.action_items))
        .bind(follow_up.created)
        .bind(follow_up.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, follow_up: &FollowUp) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE follow_ups SET
                assigned_to_uid = $2,
                follow_up_type = $3,
                priority = $4,
                communication_method = $5,
                scheduled_date = $6,
                scheduled_time = $7,
                next_follow_up_date = $8,
                next_follow_up_reason = $9,
                status = $10,
                completed_date = $11,
                actual_duration = $12,
                outcome = $13,
                customer_satisfaction = $14,
                customer_feedback = $15,
                reminder_sent = $16,
                reminder_date = $17,
                title = $18,
                description = $19,
                internal_notes = $20,
                public_notes = $21,
                tags = $22,
                health_status = $23,
                product_usage = $24,
                recommendations = $25,
                action_items = $26,
                updated = $27
            WHERE follow_up_uid = $1
            "#,
        )
        .bind(follow_up.id.inner_ref())
        .bind(follow_up.assigned_to_id.as_ref().map(|id| *id.inner_ref()))
        .bind(follow_up.follow_up_type.as_str())
        .bind(follow_up.priority.as_str())
        .bind(follow_up.communication_method.as_str())
        .bind(follow_up.scheduled_date)
        .bind(follow_up.scheduled_time)
        .bind(follow_up.next_follow_up_date)
        .bind(&follow_up.next_follow_up_reason)
        .bind(follow_up.status.as_str())
        .bind(follow_up.completed_date)
        .bind(follow_up.actual_duration)
        .bind(follow_up.outcome.map(|outcome| outcome.as_str()))
        .bind(follow_up.customer_satisfaction)
        .bind(&follow_up.customer_feedback)
        .bind(follow_up.reminder_sent)
        .bind(follow_up.reminder_date)
        .bind(&follow_up.title)
        .bind(&follow_up.description)
        .bind(&follow_up.internal_notes)
        .bind(&follow_up.public_notes)
        .bind(&follow_up.tags)
        .bind(Json(&follow_up.health_status))
        .bind(Json(&follow_up.product_usage))
        .bind(&follow_up.recommendations)
        .bind(Json(&follow_up.action_items))
        .bind(follow_up.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, follow_up_id: &ID) -> Option<FollowUp> {
        sqlx::query_as::<_, FollowUpRaw>(
            r#"
            SELECT * FROM follow_ups
            WHERE follow_up_uid = $1
            "#,
        )
        .bind(follow_up_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|follow_up| follow_up.into())
    }

    async fn find_many(&self, follow_up_ids: &[ID]) -> anyhow::Result<Vec<FollowUp>> {
        let ids = to_uuids(follow_up_ids);
        let follow_ups = sqlx::query_as::<_, FollowUpRaw>(
            r#"
            SELECT * FROM follow_ups
            WHERE follow_up_uid = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(follow_ups
            .into_iter()
            .map(|follow_up| follow_up.into())
            .collect())
    }

    async fn find_by_filter(
        &self,
        filter: &FollowUpFilter,
        sort: &FollowUpSort,
        skip: i64,
        limit: Option<i64>,
    ) -> anyhow::Result<Vec<FollowUp>> {
        let binds = FilterBinds::new(filter);
        let sql = format!(
            "SELECT * FROM follow_ups WHERE {} ORDER BY {} LIMIT $11 OFFSET $12",
            FILTER_WHERE_CLAUSE,
            order_by_clause(sort)
        );
        let follow_ups = sqlx::query_as::<_, FollowUpRaw>(&sql)
            .bind(&binds.ids)
            .bind(&binds.customer_ids)
            .bind(binds.assigned_to_uid)
            .bind(&binds.statuses)
            .bind(&binds.priority)
            .bind(&binds.follow_up_type)
            .bind(binds.scheduled_from)
            .bind(binds.scheduled_until)
            .bind(&binds.search_text)
            .bind(&binds.search_customer_ids)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;
        Ok(follow_ups
            .into_iter()
            .map(|follow_up| follow_up.into())
            .collect())
    }

    async fn count(&self, filter: &FollowUpFilter) -> anyhow::Result<i64> {
        let binds = FilterBinds::new(filter);
        let sql = format!(
            "SELECT COUNT(*) FROM follow_ups WHERE {}",
            FILTER_WHERE_CLAUSE
        );
        let (count,) = sqlx::query_as::<_, (i64,)>(&sql)
            .bind(&binds.ids)
            .bind(&binds.customer_ids)
            .bind(binds.assigned_to_uid)
            .bind(&binds.statuses)
            .bind(&binds.priority)
            .bind(&binds.follow_up_type)
            .bind(binds.scheduled_from)
            .bind(binds.scheduled_until)
            .bind(&binds.search_text)
            .bind(&binds.search_customer_ids)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn delete(&self, follow_up_id: &ID) -> Option<FollowUp> {
        sqlx::query_as::<_, FollowUpRaw>(
            r#"
            DELETE FROM follow_ups
            WHERE follow_up_uid = $1
            RETURNING *
            "#,
        )
        .bind(follow_up_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|follow_up| follow_up.into())
    }
}
