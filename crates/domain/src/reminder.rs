use crate::follow_up::{FollowUp, InvalidEnumValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Time-relative category used to triage outstanding follow ups. A record
/// belongs to at most one bucket at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderBucket {
    Overdue,
    Today,
    Upcoming,
    NextWeek,
}

impl ReminderBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Today => "today",
            Self::Upcoming => "upcoming",
            Self::NextWeek => "next_week",
        }
    }
}

impl Display for ReminderBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReminderBucket {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overdue" => Ok(Self::Overdue),
            "today" => Ok(Self::Today),
            "upcoming" => Ok(Self::Upcoming),
            "next_week" => Ok(Self::NextWeek),
            _ => Err(InvalidEnumValue::Unrecognized(s.to_string())),
        }
    }
}

/// Day windows for the `upcoming` and `next_week` buckets. The exact widths
/// are deployment policy, not contract, so they come from configuration.
#[derive(Debug, Clone)]
pub struct ReminderWindows {
    /// `upcoming` covers 1..=upcoming_days days ahead
    pub upcoming_days: i64,
    /// `next_week` covers next_week_start..=next_week_end days ahead
    pub next_week_start: i64,
    pub next_week_end: i64,
}

impl Default for ReminderWindows {
    fn default() -> Self {
        Self {
            upcoming_days: 3,
            next_week_start: 7,
            next_week_end: 14,
        }
    }
}

/// Classifies a follow up into its reminder bucket at the given instant.
/// Terminal records are never bucketed. A `reminder_date` in the future
/// (a snooze that has not expired) suppresses membership in every bucket,
/// while [`FollowUp::is_overdue`] stays unaffected so plain list views
/// still show the record as overdue.
pub fn reminder_bucket(
    follow_up: &FollowUp,
    now: DateTime<Utc>,
    windows: &ReminderWindows,
) -> Option<ReminderBucket> {
    if follow_up.status.is_terminal() {
        return None;
    }
    if let Some(snoozed_until) = follow_up.reminder_date {
        if snoozed_until > now {
            return None;
        }
    }
    if follow_up.is_overdue(now) {
        return Some(ReminderBucket::Overdue);
    }

    let days_ahead = (follow_up.scheduled_date - now.naive_utc().date()).num_days();
    if days_ahead == 0 {
        Some(ReminderBucket::Today)
    } else if days_ahead > 0 && days_ahead <= windows.upcoming_days {
        Some(ReminderBucket::Upcoming)
    } else if days_ahead >= windows.next_week_start && days_ahead <= windows.next_week_end {
        Some(ReminderBucket::NextWeek)
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::follow_up::FollowUpStatus;
    use chrono::{Duration, NaiveTime, TimeZone};

    fn now() -> DateTime<Utc> {
        // Wed Mar 10 2021 09:00:00 UTC
        Utc.ymd(2021, 3, 10).and_hms(9, 0, 0)
    }

    fn follow_up_scheduled_in(days: i64) -> FollowUp {
        let date = now().naive_utc().date() + Duration::days(days);
        FollowUp::new(Default::default(), "Reorder check".into(), date, now())
    }

    #[test]
    fn classifies_by_distance_from_today() {
        let windows = ReminderWindows::default();
        let cases = vec![
            (-1, Some(ReminderBucket::Overdue)),
            (0, Some(ReminderBucket::Today)),
            (1, Some(ReminderBucket::Upcoming)),
            (3, Some(ReminderBucket::Upcoming)),
            (4, None),
            (6, None),
            (7, Some(ReminderBucket::NextWeek)),
            (14, Some(ReminderBucket::NextWeek)),
            (15, None),
        ];
        for (days, expected) in cases {
            let follow_up = follow_up_scheduled_in(days);
            assert_eq!(
                reminder_bucket(&follow_up, now(), &windows),
                expected,
                "scheduled {} days ahead",
                days
            );
        }
    }

    #[test]
    fn same_day_with_passed_time_is_overdue_not_today() {
        let windows = ReminderWindows::default();
        let mut follow_up = follow_up_scheduled_in(0);
        follow_up.scheduled_time = Some(NaiveTime::from_hms(8, 0, 0));
        assert_eq!(
            reminder_bucket(&follow_up, now(), &windows),
            Some(ReminderBucket::Overdue)
        );

        follow_up.scheduled_time = Some(NaiveTime::from_hms(15, 0, 0));
        assert_eq!(
            reminder_bucket(&follow_up, now(), &windows),
            Some(ReminderBucket::Today)
        );
    }

    #[test]
    fn terminal_records_are_not_bucketed() {
        let windows = ReminderWindows::default();
        for status in &[FollowUpStatus::Completed, FollowUpStatus::Cancelled] {
            let mut follow_up = follow_up_scheduled_in(-5);
            follow_up.set_status(*status, now());
            assert_eq!(reminder_bucket(&follow_up, now(), &windows), None);
        }
    }

    #[test]
    fn unexpired_snooze_suppresses_every_bucket() {
        let windows = ReminderWindows::default();
        let mut follow_up = follow_up_scheduled_in(-2);
        follow_up.reminder_date = Some(now() + Duration::hours(4));

        assert_eq!(reminder_bucket(&follow_up, now(), &windows), None);
        // The overdue predicate itself is unaffected by snoozing
        assert!(follow_up.is_overdue(now()));

        // Once the snooze expires the record surfaces again
        let after_expiry = now() + Duration::hours(5);
        assert_eq!(
            reminder_bucket(&follow_up, after_expiry, &windows),
            Some(ReminderBucket::Overdue)
        );
    }

    #[test]
    fn windows_are_configurable() {
        let windows = ReminderWindows {
            upcoming_days: 5,
            next_week_start: 6,
            next_week_end: 10,
        };
        assert_eq!(
            reminder_bucket(&follow_up_scheduled_in(5), now(), &windows),
            Some(ReminderBucket::Upcoming)
        );
        assert_eq!(
            reminder_bucket(&follow_up_scheduled_in(6), now(), &windows),
            Some(ReminderBucket::NextWeek)
        );
        assert_eq!(
            reminder_bucket(&follow_up_scheduled_in(11), now(), &windows),
            None
        );
    }

    #[test]
    fn a_record_is_never_in_more_than_one_bucket() {
        let windows = ReminderWindows::default();
        for days in -3..=16 {
            let follow_up = follow_up_scheduled_in(days);
            let buckets = [
                ReminderBucket::Overdue,
                ReminderBucket::Today,
                ReminderBucket::Upcoming,
                ReminderBucket::NextWeek,
            ];
            let memberships = buckets
                .iter()
                .filter(|b| reminder_bucket(&follow_up, now(), &windows) == Some(**b))
                .count();
            assert!(memberships <= 1);
        }
    }

    #[test]
    fn bucket_names_parse_roundtrip() {
        for bucket in &["overdue", "today", "upcoming", "next_week"] {
            assert_eq!(
                bucket.parse::<ReminderBucket>().unwrap().as_str(),
                *bucket
            );
        }
        assert!("tomorrow".parse::<ReminderBucket>().is_err());
    }
}
