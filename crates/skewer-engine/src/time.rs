//! Time management: convert clock parameters to search budgets.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use skewer_core::Color;

use crate::search::control::SearchControl;

/// Compute soft and hard budgets from remaining time and increment.
///
/// The soft budget assumes the game lasts about `moves_to_go` more moves
/// (default 30) and adds most of the increment; the hard budget allows a
/// single move to run long, capped at an eighth of the remaining clock.
pub fn compute_limits(
    remaining: Duration,
    increment: Duration,
    moves_to_go: Option<u32>,
) -> (Duration, Duration) {
    let remaining_ms = remaining.as_millis() as u64;
    if remaining_ms < 10 {
        let floor = Duration::from_millis(1);
        return (floor, floor);
    }

    // Reserve a little for protocol overhead.
    let usable = remaining_ms.saturating_sub(10).max(1);
    let mtg = moves_to_go.unwrap_or(30).max(1) as u64;
    let increment_ms = increment.as_millis() as u64;

    let soft = (usable / mtg + increment_ms * 3 / 4).clamp(1, usable);
    let hard = (usable / 8).max(soft).clamp(1, usable);

    (
        Duration::from_millis(soft),
        Duration::from_millis(hard),
    )
}

/// Build a [`SearchControl`] from `go` parameters and the side to move.
///
/// Priority: `infinite`, then `movetime`, then the side's clock; a bare
/// `go` (or `go depth N`) searches without a time budget. A `nodes`
/// limit composes with any of these.
#[allow(clippy::too_many_arguments)]
pub fn limits_from_go(
    wtime: Option<Duration>,
    btime: Option<Duration>,
    winc: Option<Duration>,
    binc: Option<Duration>,
    movestogo: Option<u32>,
    movetime: Option<Duration>,
    nodes: Option<u64>,
    infinite: bool,
    side: Color,
    stopped: Arc<AtomicBool>,
) -> SearchControl {
    let control = if infinite {
        SearchControl::new_infinite(stopped)
    } else if let Some(budget) = movetime {
        SearchControl::new_timed(stopped, budget, budget)
    } else {
        let (remaining, increment) = match side {
            Color::White => (wtime, winc),
            Color::Black => (btime, binc),
        };
        match remaining {
            Some(clock) => {
                let (soft, hard) =
                    compute_limits(clock, increment.unwrap_or(Duration::ZERO), movestogo);
                SearchControl::new_timed(stopped, soft, hard)
            }
            None => SearchControl::new_infinite(stopped),
        }
    };

    match nodes {
        Some(cap) => control.with_node_limit(cap),
        None => control,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    use skewer_core::Color;

    use super::{compute_limits, limits_from_go};

    #[test]
    fn five_minute_clock_spends_a_fraction() {
        let (soft, hard) = compute_limits(Duration::from_secs(300), Duration::ZERO, None);
        // usable/30 = ~10s soft, usable/8 = ~37.5s hard.
        assert!(soft.as_millis() > 8_000 && soft.as_millis() < 12_000, "soft={soft:?}");
        assert!(hard >= soft);
        assert!(hard.as_millis() < 40_000, "hard={hard:?}");
    }

    #[test]
    fn increment_raises_the_soft_budget() {
        let (without, _) = compute_limits(Duration::from_secs(300), Duration::ZERO, None);
        let (with, _) =
            compute_limits(Duration::from_secs(300), Duration::from_secs(2), None);
        assert!(with > without);
    }

    #[test]
    fn near_flag_fall_uses_a_minimal_budget() {
        let (soft, hard) = compute_limits(Duration::from_millis(5), Duration::ZERO, None);
        assert_eq!(soft, Duration::from_millis(1));
        assert_eq!(hard, Duration::from_millis(1));
    }

    #[test]
    fn explicit_movestogo_divides_the_clock() {
        let (soft, _) = compute_limits(Duration::from_secs(60), Duration::ZERO, Some(10));
        assert!(soft.as_millis() > 4_000 && soft.as_millis() < 8_000, "soft={soft:?}");
    }

    #[test]
    fn budget_never_exceeds_the_clock() {
        let (soft, hard) =
            compute_limits(Duration::from_millis(200), Duration::from_secs(10), None);
        assert!(soft.as_millis() <= 200);
        assert!(hard.as_millis() <= 200);
    }

    #[test]
    fn infinite_go_has_no_budget() {
        let control = limits_from_go(
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            true,
            Color::White,
            Arc::new(AtomicBool::new(false)),
        );
        assert!(!control.should_stop(1 << 16));
        assert!(!control.should_stop_iterating());
    }

    #[test]
    fn clock_for_the_side_to_move_is_used() {
        // Black is nearly out of time; White has plenty. Black to move
        // must get a millisecond-scale budget.
        let control = limits_from_go(
            Some(Duration::from_secs(300)),
            Some(Duration::from_millis(5)),
            None,
            None,
            None,
            None,
            None,
            false,
            Color::Black,
            Arc::new(AtomicBool::new(false)),
        );
        std::thread::sleep(Duration::from_millis(10));
        assert!(control.should_stop_iterating());
    }

    #[test]
    fn node_cap_composes_with_infinite() {
        let control = limits_from_go(
            None,
            None,
            None,
            None,
            None,
            None,
            Some(64),
            true,
            Color::White,
            Arc::new(AtomicBool::new(false)),
        );
        assert!(control.should_stop(64));
    }
}
