use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Utc};

/// Minimal view of a customer record. Customer storage is owned by the rest
/// of the CRM; follow ups only need the name for search and the id for
/// ownership checks.
#[derive(Debug, Clone)]
pub struct Customer {
    pub id: ID,
    pub full_name: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Customer {
    pub fn new(full_name: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Default::default(),
            full_name,
            created: now,
            updated: now,
        }
    }
}

impl Entity for Customer {
    fn id(&self) -> &ID {
        &self.id
    }
}
