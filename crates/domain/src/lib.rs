mod customer;
mod follow_up;
mod reminder;
mod shared;

pub use customer::Customer;
pub use follow_up::{
    ActionItem, ActionItemStatus, CommunicationMethod, FollowUp, FollowUpOutcome, FollowUpStatus,
    FollowUpType, HealthStatusSnapshot, InvalidEnumValue, Priority, ProductUsageObservation,
};
pub use reminder::{reminder_bucket, ReminderBucket, ReminderWindows};
pub use shared::entity::{Entity, ID};
