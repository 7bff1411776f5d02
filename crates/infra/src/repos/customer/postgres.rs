use super::ICustomerRepo;
use chrono::{DateTime, Utc};
use sqlx::{types::Uuid, FromRow, PgPool};
use vita_crm_domain::{Customer, ID};

pub struct PostgresCustomerRepo {
    pool: PgPool,
}

impl PostgresCustomerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CustomerRaw {
    customer_uid: Uuid,
    full_name: String,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl Into<Customer> for CustomerRaw {
    fn into(self) -> Customer {
        Customer {
            id: self.customer_uid.into(),
            full_name: self.full_name,
            created: self.created,
            updated: self.updated,
        }
    }
}

#[async_trait::async_trait]
impl ICustomerRepo for PostgresCustomerRepo {
    async fn insert(&self, customer: &Customer) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO customers(customer_uid, full_name, created, updated)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(customer.id.inner_ref())
        .bind(&customer.full_name)
        .bind(customer.created)
        .bind(customer.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, customer_id: &ID) -> Option<Customer> {
        sqlx::query_as::<_, CustomerRaw>(
            r#"
            SELECT * FROM customers
            WHERE customer_uid = $1
            "#,
        )
        .bind(customer_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|customer| customer.into())
    }

    async fn search_by_name(&self, text: &str) -> anyhow::Result<Vec<Customer>> {
        let customers = sqlx::query_as::<_, CustomerRaw>(
            r#"
            SELECT * FROM customers
            WHERE full_name ILIKE '%' || $1 || '%'
            "#,
        )
        .bind(text)
        .fetch_all(&self.pool)
        .await?;
        Ok(customers.into_iter().map(|customer| customer.into()).collect())
    }

    async fn delete(&self, customer_id: &ID) -> Option<Customer> {
        sqlx::query_as::<_, CustomerRaw>(
            r#"
            DELETE FROM customers
            WHERE customer_uid = $1
            RETURNING *
            "#,
        )
        .bind(customer_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|customer| customer.into())
    }
}
