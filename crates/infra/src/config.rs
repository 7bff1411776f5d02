use tracing::warn;
use vita_crm_domain::ReminderWindows;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Day windows for the `upcoming` and `next_week` reminder buckets.
    /// These widths are deployment policy, so they are read from the
    /// environment rather than hard coded in the bucket comparisons.
    pub reminder_windows: ReminderWindows,
    /// Maximum number of follow ups included per priority group in the
    /// reminder view preview. The full group size is always reported even
    /// when the preview is truncated.
    pub reminder_group_preview_limit: usize,
    /// Upper bound for the `limit` parameter of list queries. This is used
    /// to avoid having clients ask for arbitrarily large pages which will
    /// take a lot of time to serialize and is also not very useful to
    /// render anyways.
    pub max_query_limit: i64,
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let reminder_windows = ReminderWindows {
            upcoming_days: parse_day_count("REMINDER_UPCOMING_WINDOW_DAYS", 3),
            next_week_start: parse_day_count("REMINDER_NEXT_WEEK_WINDOW_START_DAYS", 7),
            next_week_end: parse_day_count("REMINDER_NEXT_WEEK_WINDOW_END_DAYS", 14),
        };

        Self {
            port,
            reminder_windows,
            reminder_group_preview_limit: 5,
            max_query_limit: 100,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_day_count(var: &str, default: i64) -> i64 {
    match std::env::var(var) {
        Ok(val) => match val.parse::<i64>() {
            Ok(days) if days >= 0 => days,
            _ => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    var, val, default
                );
                default
            }
        },
        Err(_) => default,
    }
}
