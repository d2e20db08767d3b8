use chrono::Duration;

/// Default streak length at which a word counts as mastered.
pub const DEFAULT_MASTERY_THRESHOLD: i32 = 3;

/// Default upper bound for a review interval, in days.
pub const DEFAULT_MAX_INTERVAL_DAYS: i64 = 365;

/// Default width of the "studied today" window, in hours.
pub const DEFAULT_TODAY_WINDOW_HOURS: i64 = 24;

/// Tunable constants of the scheduling policy.
///
/// The algorithm itself is fixed; only these thresholds may change between deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerPolicy {
    /// `consecutive_correct` at or above this value marks a word as mastered
    pub mastery_threshold: i32,
    /// Rolling window used for `today_studied` (not a calendar day)
    pub today_window: Duration,
    /// Ceiling for the exponential review interval
    pub max_interval_days: i64,
}

impl SchedulerPolicy {
    /// Build a policy from raw configuration values.
    ///
    /// Out-of-range values fall back to the smallest meaningful setting: a mastery
    /// threshold below 1 becomes 1, and window/interval values below 1 become 1.
    pub fn new(mastery_threshold: i32, today_window_hours: i64, max_interval_days: i64) -> Self {
        Self {
            mastery_threshold: mastery_threshold.max(1),
            today_window: Duration::hours(today_window_hours.max(1)),
            max_interval_days: max_interval_days.max(1),
        }
    }
}

impl Default for SchedulerPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MASTERY_THRESHOLD,
            DEFAULT_TODAY_WINDOW_HOURS,
            DEFAULT_MAX_INTERVAL_DAYS,
        )
    }
}
