mod customer;
mod follow_up;
mod shared;

use customer::{InMemoryCustomerRepo, PostgresCustomerRepo};
pub use customer::ICustomerRepo;
use follow_up::{InMemoryFollowUpRepo, PostgresFollowUpRepo};
pub use follow_up::IFollowUpRepo;
pub use shared::query_structs::*;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[derive(Clone)]
pub struct Repos {
    pub follow_ups: Arc<dyn IFollowUpRepo>,
    pub customers: Arc<dyn ICustomerRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;

        Ok(Self {
            follow_ups: Arc::new(PostgresFollowUpRepo::new(pool.clone())),
            customers: Arc::new(PostgresCustomerRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            follow_ups: Arc::new(InMemoryFollowUpRepo::new()),
            customers: Arc::new(InMemoryCustomerRepo::new()),
        }
    }
}
