//! Search control: cooperative stop flag, time budget, node budget.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// How often (in visited nodes) the clock is consulted.
const CLOCK_CHECK_INTERVAL: u64 = 2048;

/// Decides when a search should stop.
///
/// The search polls [`should_stop`](SearchControl::should_stop) at every
/// node; the wall clock is only read every [`CLOCK_CHECK_INTERVAL`] nodes.
/// Once any budget fires, the shared stop flag latches so later polls
/// return immediately. Stopping is cooperative: the recursion unwinds and
/// the driver keeps the last completed iteration's result.
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Instant,
    soft_limit: Option<Duration>,
    hard_limit: Option<Duration>,
    node_limit: Option<u64>,
}

impl SearchControl {
    /// No time pressure; stops only via the external flag.
    pub fn new_infinite(stopped: Arc<AtomicBool>) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            soft_limit: None,
            hard_limit: None,
            node_limit: None,
        }
    }

    /// Timed search: `soft` gates new deepening iterations, `hard` aborts
    /// mid-iteration.
    pub fn new_timed(stopped: Arc<AtomicBool>, soft: Duration, hard: Duration) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            soft_limit: Some(soft),
            hard_limit: Some(hard),
            node_limit: None,
        }
    }

    /// Cap the number of visited nodes.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// Whether the search should abort now.
    ///
    /// Checked at every node with the current visit count; the clock is
    /// only read when `visited` crosses a check interval.
    pub fn should_stop(&self, visited: u64) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }

        if let Some(limit) = self.node_limit
            && visited >= limit
        {
            self.stopped.store(true, Ordering::Release);
            return true;
        }

        if visited % CLOCK_CHECK_INTERVAL != 0 {
            return false;
        }

        if let Some(hard) = self.hard_limit
            && self.elapsed() >= hard
        {
            self.stopped.store(true, Ordering::Release);
            return true;
        }

        false
    }

    /// Whether iterative deepening should skip starting another iteration.
    pub fn should_stop_iterating(&self) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        match self.soft_limit {
            Some(soft) => self.elapsed() >= soft,
            None => false,
        }
    }

    /// Wall time since the control was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// The shared stop flag.
    pub fn stop_flag(&self) -> &Arc<AtomicBool> {
        &self.stopped
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::SearchControl;

    #[test]
    fn infinite_never_stops_on_its_own() {
        let control = SearchControl::new_infinite(Arc::new(AtomicBool::new(false)));
        assert!(!control.should_stop(1));
        assert!(!control.should_stop(1 << 20));
        assert!(!control.should_stop_iterating());
    }

    #[test]
    fn external_flag_stops_immediately() {
        let stopped = Arc::new(AtomicBool::new(false));
        let control = SearchControl::new_infinite(Arc::clone(&stopped));
        stopped.store(true, Ordering::Release);
        assert!(control.should_stop(1));
        assert!(control.should_stop_iterating());
    }

    #[test]
    fn expired_hard_limit_latches_the_flag() {
        let control = SearchControl::new_timed(
            Arc::new(AtomicBool::new(false)),
            Duration::ZERO,
            Duration::ZERO,
        );
        // Off the check interval the clock is not consulted.
        assert!(!control.should_stop(1));
        // On the interval the expired budget fires and latches.
        assert!(control.should_stop(2048));
        assert!(control.should_stop(2049), "stop flag should latch");
    }

    #[test]
    fn soft_limit_gates_iterations_only() {
        let control = SearchControl::new_timed(
            Arc::new(AtomicBool::new(false)),
            Duration::ZERO,
            Duration::from_secs(3600),
        );
        assert!(control.should_stop_iterating());
        assert!(!control.should_stop(1), "hard budget not yet spent");
    }

    #[test]
    fn node_limit_stops_at_the_cap() {
        let control = SearchControl::new_infinite(Arc::new(AtomicBool::new(false)))
            .with_node_limit(100);
        assert!(!control.should_stop(99));
        assert!(control.should_stop(100));
        assert!(control.should_stop(5), "node cap should latch");
    }
}
