//! Session freshness evaluation.

use chrono::{DateTime, TimeDelta, Utc};
use zero_common::{SessionResetPolicy, Zone};

use crate::boundary::daily_reset_boundary;

/// Outcome of a freshness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessResult {
    /// Whether the session continues (`true`) or should be reset.
    pub fresh: bool,
    /// Boundary used for the decision (daily mode only).
    pub daily_reset_at: Option<DateTime<Utc>>,
    /// `updated_at + idle_minutes` (idle mode only).
    pub idle_expires_at: Option<DateTime<Utc>>,
}

impl FreshnessResult {
    /// Whether the session should be reset.
    pub const fn is_stale(&self) -> bool {
        !self.fresh
    }
}

/// Decide whether a session last updated at `updated_at` is still fresh at `now`.
///
/// - `Never`: always fresh.
/// - `Daily`: fresh iff `updated_at` is at or after the most recent
///   `at_hour:00` boundary in `zone` that is not after `now`.
/// - `Idle`: fresh iff `now < updated_at + idle_minutes`; the expiry
///   instant itself is stale.
///
/// `at_hour` must be 0-23 and `idle_minutes` positive; other values give
/// meaningless but non-panicking results. The live clock is never read.
pub fn evaluate_freshness(
    updated_at: DateTime<Utc>,
    now: DateTime<Utc>,
    policy: &SessionResetPolicy,
    zone: Zone,
) -> FreshnessResult {
    let result = match *policy {
        SessionResetPolicy::Never => FreshnessResult {
            fresh: true,
            daily_reset_at: None,
            idle_expires_at: None,
        },
        SessionResetPolicy::Daily { at_hour } => {
            let boundary = daily_reset_boundary(now, zone, at_hour);
            FreshnessResult {
                fresh: updated_at >= boundary,
                daily_reset_at: Some(boundary),
                idle_expires_at: None,
            }
        }
        SessionResetPolicy::Idle { idle_minutes } => {
            let expires_at = idle_expiry(updated_at, idle_minutes);
            FreshnessResult {
                fresh: now < expires_at,
                daily_reset_at: None,
                idle_expires_at: Some(expires_at),
            }
        }
    };

    tracing::debug!(
        policy = %policy,
        updated_at = %updated_at,
        now = %now,
        fresh = result.fresh,
        "Evaluated session freshness"
    );
    result
}

/// `updated_at + idle_minutes`, saturating at the representable range.
fn idle_expiry(updated_at: DateTime<Utc>, idle_minutes: i64) -> DateTime<Utc> {
    let saturated = if idle_minutes >= 0 {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    };

    TimeDelta::try_minutes(idle_minutes)
        .and_then(|delta| updated_at.checked_add_signed(delta))
        .unwrap_or(saturated)
}
