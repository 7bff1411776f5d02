use super::ICustomerRepo;
use crate::repos::shared::inmemory_repo::*;
use vita_crm_domain::{Customer, ID};

pub struct InMemoryCustomerRepo {
    customers: std::sync::Mutex<Vec<Customer>>,
}

impl InMemoryCustomerRepo {
    pub fn new() -> Self {
        Self {
            customers: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ICustomerRepo for InMemoryCustomerRepo {
    async fn insert(&self, customer: &Customer) -> anyhow::Result<()> {
        insert(customer, &self.customers);
        Ok(())
    }

    async fn find(&self, customer_id: &ID) -> Option<Customer> {
        find(customer_id, &self.customers)
    }

    async fn search_by_name(&self, text: &str) -> anyhow::Result<Vec<Customer>> {
        let text = text.to_lowercase();
        let res = find_by(&self.customers, |customer| {
            customer.full_name.to_lowercase().contains(&text)
        });
        Ok(res)
    }

    async fn delete(&self, customer_id: &ID) -> Option<Customer> {
        delete(customer_id, &self.customers)
    }
}
