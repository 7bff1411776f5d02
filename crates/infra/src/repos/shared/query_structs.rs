use chrono::NaiveDate;
use std::cmp::Ordering;
use std::str::FromStr;
use vita_crm_domain::{FollowUp, FollowUpStatus, FollowUpType, InvalidEnumValue, Priority, ID};

/// Filter over stored follow ups. Every field is optional, unset fields do
/// not constrain the result. Overdue is a derived property and therefore
/// not part of the stored-record filter, callers apply it on the fetched
/// set with the policy functions.
#[derive(Debug, Clone, Default)]
pub struct FollowUpFilter {
    pub ids: Option<Vec<ID>>,
    pub customer_ids: Option<Vec<ID>>,
    pub assigned_to_id: Option<ID>,
    pub statuses: Option<Vec<FollowUpStatus>>,
    pub priority: Option<Priority>,
    pub follow_up_type: Option<FollowUpType>,
    pub scheduled_from: Option<NaiveDate>,
    pub scheduled_until: Option<NaiveDate>,
    pub search: Option<SearchFilter>,
}

/// Free text search over the title and the owning customer's name. The
/// name part is resolved to customer ids before the filter reaches a
/// repository, so both backends apply the same predicate.
#[derive(Debug, Clone)]
pub struct SearchFilter {
    pub text: String,
    pub customer_ids: Vec<ID>,
}

impl FollowUpFilter {
    pub fn matches(&self, follow_up: &FollowUp) -> bool {
        if let Some(ids) = &self.ids {
            if !ids.contains(&follow_up.id) {
                return false;
            }
        }
        if let Some(customer_ids) = &self.customer_ids {
            if !customer_ids.contains(&follow_up.customer_id) {
                return false;
            }
        }
        if let Some(assigned_to_id) = &self.assigned_to_id {
            if follow_up.assigned_to_id.as_ref() != Some(assigned_to_id) {
                return false;
            }
        }
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&follow_up.status) {
                return false;
            }
        }
        if let Some(priority) = &self.priority {
            if follow_up.priority != *priority {
                return false;
            }
        }
        if let Some(follow_up_type) = &self.follow_up_type {
            if follow_up.follow_up_type != *follow_up_type {
                return false;
            }
        }
        if let Some(from) = &self.scheduled_from {
            if follow_up.scheduled_date < *from {
                return false;
            }
        }
        if let Some(until) = &self.scheduled_until {
            if follow_up.scheduled_date > *until {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let title_match = follow_up
                .title
                .to_lowercase()
                .contains(&search.text.to_lowercase());
            let customer_match = search.customer_ids.contains(&follow_up.customer_id);
            if !title_match && !customer_match {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpSortField {
    ScheduledDate,
    Created,
    Priority,
    Title,
    Status,
}

impl FromStr for FollowUpSortField {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled_date" => Ok(Self::ScheduledDate),
            "created" => Ok(Self::Created),
            "priority" => Ok(Self::Priority),
            "title" => Ok(Self::Title),
            "status" => Ok(Self::Status),
            _ => Err(InvalidEnumValue::Unrecognized(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(InvalidEnumValue::Unrecognized(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FollowUpSort {
    pub field: FollowUpSortField,
    pub direction: SortDirection,
}

impl Default for FollowUpSort {
    fn default() -> Self {
        Self {
            field: FollowUpSortField::ScheduledDate,
            direction: SortDirection::Asc,
        }
    }
}

impl FollowUpSort {
    pub fn compare(&self, a: &FollowUp, b: &FollowUp) -> Ordering {
        let ordering = match self.field {
            FollowUpSortField::ScheduledDate => a.scheduled_date.cmp(&b.scheduled_date),
            FollowUpSortField::Created => a.created.cmp(&b.created),
            FollowUpSortField::Priority => a.priority.cmp(&b.priority),
            FollowUpSortField::Title => a.title.cmp(&b.title),
            FollowUpSortField::Status => a.status.as_str().cmp(b.status.as_str()),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}
