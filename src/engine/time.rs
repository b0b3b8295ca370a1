//! Time management for UCI `go` clock parameters.
//!
//! Mirrors the teacher's own time-control abstraction: a `TimeConfig`
//! holding the tunable overhead/percentage knobs, and a `TimeControl` enum
//! describing the kind of clock the GUI gave us, each variant knowing how
//! to turn itself into a soft/hard millisecond budget.

use std::time::Duration;

/// Assume this many moves remain when the GUI doesn't send `movestogo`.
pub const DEFAULT_MOVES_TO_GO: u64 = 30;

/// Time threshold below which we enter "panic mode" (in ms).
const PANIC_THRESHOLD_MS: u64 = 5000;

/// Minimum moves-to-go estimate to avoid over-thinking.
const MIN_MOVES_TO_GO: u64 = 10;

/// Safety margin added to overhead for critical-time detection.
const CRITICAL_TIME_MARGIN_MS: u64 = 50;

/// Panic mode: fraction of remaining time to use.
const PANIC_TIME_FRACTION: f64 = 0.05;

/// Panic mode: minimum fraction divisor for target time.
const PANIC_MIN_FRACTION: u64 = 5;

/// Panic mode: hard time fraction divisor.
const PANIC_HARD_FRACTION: u64 = 3;

/// Time thresholds for moves-to-go estimation (in ms).
const LONG_TIME_CONTROL_MS: u64 = 300_000;
const MEDIUM_TIME_CONTROL_MS: u64 = 60_000;

/// Estimated moves for different time controls.
const LONG_MOVES_ESTIMATE: u64 = 40;
const MEDIUM_MOVES_ESTIMATE: u64 = 30;
const SHORT_MOVES_ESTIMATE: u64 = 25;

/// Tunable knobs for time-limit calculations.
#[derive(Debug, Clone, Copy)]
pub struct TimeConfig {
    /// Time to reserve for move overhead (communication latency, etc.)
    pub move_overhead_ms: u64,
    /// Percentage of remaining time to use as soft limit.
    pub soft_time_percent: u64,
    /// Percentage of remaining time to use as hard limit.
    pub hard_time_percent: u64,
    /// Default maximum nodes (0 = unlimited).
    pub default_max_nodes: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        TimeConfig {
            move_overhead_ms: 50,
            soft_time_percent: 70,
            hard_time_percent: 90,
            default_max_nodes: 0,
        }
    }
}

/// The clock state sent by a UCI `go` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeControl {
    /// No clock info at all - analyze under a generous default budget.
    #[default]
    Infinite,
    /// Fixed-depth search; time is not a factor.
    Depth,
    /// Fixed time per move (`movetime`).
    MoveTime { time_ms: u64 },
    /// Standard time control: remaining time, increment, moves to go.
    Incremental {
        time_left_ms: u64,
        inc_ms: u64,
        movestogo: Option<u64>,
    },
}

impl TimeControl {
    /// Build a fixed move-time control from milliseconds.
    #[must_use]
    pub fn move_time_ms(time_ms: u64) -> Self {
        TimeControl::MoveTime { time_ms }
    }

    /// `true` for controls that carry no real time budget.
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        matches!(self, TimeControl::Infinite | TimeControl::Depth)
    }

    /// Compute `(soft_ms, hard_ms)` for this control, or `(u64::MAX, u64::MAX)`
    /// for an unlimited one.
    #[must_use]
    pub fn compute_limits(&self, config: &TimeConfig) -> (u64, u64) {
        match self {
            TimeControl::Infinite | TimeControl::Depth => (u64::MAX, u64::MAX),
            TimeControl::MoveTime { time_ms } => {
                // Explicit movetime is used as-is; the GUI told us exactly
                // how long to think, so overhead isn't subtracted here.
                let capped = (*time_ms).max(1);
                (capped, capped)
            }
            TimeControl::Incremental { time_left_ms, inc_ms, movestogo } => {
                compute_incremental_limits(*time_left_ms, *inc_ms, *movestogo, config)
            }
        }
    }
}

/// Compute soft/hard limits for an incremental time control, with panic-mode
/// and critical-time handling for when the clock is running low.
#[allow(clippy::cast_precision_loss)]
fn compute_incremental_limits(
    time_left_ms: u64,
    inc_ms: u64,
    movestogo: Option<u64>,
    config: &TimeConfig,
) -> (u64, u64) {
    let safe_ms = time_left_ms.saturating_sub(config.move_overhead_ms);

    // Critical time: less than overhead plus a small safety margin.
    if time_left_ms <= config.move_overhead_ms.saturating_add(CRITICAL_TIME_MARGIN_MS) {
        let fallback = (time_left_ms / 2).max(1);
        return (fallback, fallback);
    }

    // Panic mode: scale down to a sliver of the remaining time.
    if safe_ms < PANIC_THRESHOLD_MS {
        let panic_factor = safe_ms as f64 / PANIC_THRESHOLD_MS as f64;
        let target = (safe_ms as f64 * PANIC_TIME_FRACTION * panic_factor) as u64 + inc_ms;
        let target = target.min(safe_ms / PANIC_MIN_FRACTION).max(1);
        let hard = (safe_ms / PANIC_HARD_FRACTION).max(target).max(1);
        return (target, hard);
    }

    let moves_to_go = movestogo
        .unwrap_or(if safe_ms > LONG_TIME_CONTROL_MS {
            LONG_MOVES_ESTIMATE
        } else if safe_ms > MEDIUM_TIME_CONTROL_MS {
            MEDIUM_MOVES_ESTIMATE
        } else {
            SHORT_MOVES_ESTIMATE
        })
        .max(MIN_MOVES_TO_GO);

    let base_time = safe_ms / moves_to_go + inc_ms;

    let soft_cap = safe_ms * config.soft_time_percent / 100;
    let hard_cap = safe_ms * config.hard_time_percent / 100;

    let soft_ms = base_time.min(soft_cap).max(1);
    let hard_ms = hard_cap.max(soft_ms).max(1);

    (soft_ms, hard_ms)
}

/// Soft and hard deadlines for one search, both measured from the moment
/// the `go` command was received.
#[derive(Debug, Clone, Copy)]
pub struct TimeLimits {
    pub soft: Duration,
    pub hard: Duration,
}

/// Compute `Duration`-based soft/hard budgets directly from UCI `go`
/// parameters - the adapter the UCI command loop actually calls.
#[must_use]
pub fn compute_time_limits(
    time_left: Duration,
    inc: Duration,
    movetime: Option<Duration>,
    movestogo: Option<u64>,
    config: &TimeConfig,
) -> TimeLimits {
    let tc = if let Some(mt) = movetime {
        TimeControl::move_time_ms(mt.as_millis() as u64)
    } else {
        TimeControl::Incremental {
            time_left_ms: time_left.as_millis() as u64,
            inc_ms: inc.as_millis() as u64,
            movestogo,
        }
    };

    let (soft_ms, hard_ms) = tc.compute_limits(config);
    TimeLimits {
        soft: Duration::from_millis(soft_ms),
        hard: Duration::from_millis(hard_ms),
    }
}
