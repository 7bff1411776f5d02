mod inmemory;
mod postgres;

pub use inmemory::InMemoryCustomerRepo;
pub use postgres::PostgresCustomerRepo;
use vita_crm_domain::{Customer, ID};

/// Customer records are owned elsewhere in the CRM. Follow ups only consume
/// this narrow interface: existence checks on creation and name search.
#[async_trait::async_trait]
pub trait ICustomerRepo: Send + Sync {
    async fn insert(&self, customer: &Customer) -> anyhow::Result<()>;
    async fn find(&self, customer_id: &ID) -> Option<Customer>;
    /// Case insensitive substring match on the customer name
    async fn search_by_name(&self, text: &str) -> anyhow::Result<Vec<Customer>>;
    async fn delete(&self, customer_id: &ID) -> Option<Customer>;
}

#[cfg(test)]
mod tests {
    use crate::CrmContext;
    use chrono::{TimeZone, Utc};
    use vita_crm_domain::Entity;

    use super::*;

    #[tokio::test]
    async fn insert_find_and_search() {
        let ctx = CrmContext::create_inmemory();
        let now = Utc.ymd(2021, 3, 1).and_hms(8, 0, 0);
        let customer = Customer::new("Li Wei".into(), now);
        let other = Customer::new("Maria Santos".into(), now);
        ctx.repos.customers.insert(&customer).await.unwrap();
        ctx.repos.customers.insert(&other).await.unwrap();

        let found = ctx.repos.customers.find(&customer.id).await.unwrap();
        assert!(found.eq(&customer));

        let matches = ctx.repos.customers.search_by_name("li").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].full_name, "Li Wei");

        assert!(ctx.repos.customers.delete(&customer.id).await.is_some());
        assert!(ctx.repos.customers.find(&customer.id).await.is_none());
    }
}
