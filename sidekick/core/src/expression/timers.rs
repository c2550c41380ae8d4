//! Cancellable one-shot timers on a virtual clock

use std::time::Duration;

/// A single owned, cancellable scheduled callback
///
/// Arming always replaces the previous deadline, so a slot never has more
/// than one callback in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Duration>,
}

impl Timer {
    /// Schedule the timer `delay` after `now`, cancelling any pending fire
    pub fn arm(&mut self, now: Duration, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Cancel the pending fire, if any
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a fire is pending
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// When the pending fire is due
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}

/// Which scheduled callback fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerKind {
    Transition,
    FidgetEnd,
    FidgetStart,
    BlinkEnd,
    Blink,
    AutoReset,
}

impl TimerKind {
    /// Tie-break order for timers due at the same instant
    const ORDER: [TimerKind; 6] = [
        TimerKind::Transition,
        TimerKind::FidgetEnd,
        TimerKind::FidgetStart,
        TimerKind::BlinkEnd,
        TimerKind::Blink,
        TimerKind::AutoReset,
    ];
}

/// The expression controller's timers
#[derive(Debug, Clone, Default)]
pub(crate) struct Timers {
    pub transition: Timer,
    pub fidget_start: Timer,
    pub fidget_end: Timer,
    pub blink: Timer,
    pub blink_end: Timer,
    pub auto_reset: Timer,
}

impl Timers {
    pub fn slot(&self, kind: TimerKind) -> &Timer {
        match kind {
            TimerKind::Transition => &self.transition,
            TimerKind::FidgetStart => &self.fidget_start,
            TimerKind::FidgetEnd => &self.fidget_end,
            TimerKind::Blink => &self.blink,
            TimerKind::BlinkEnd => &self.blink_end,
            TimerKind::AutoReset => &self.auto_reset,
        }
    }

    pub fn slot_mut(&mut self, kind: TimerKind) -> &mut Timer {
        match kind {
            TimerKind::Transition => &mut self.transition,
            TimerKind::FidgetStart => &mut self.fidget_start,
            TimerKind::FidgetEnd => &mut self.fidget_end,
            TimerKind::Blink => &mut self.blink,
            TimerKind::BlinkEnd => &mut self.blink_end,
            TimerKind::AutoReset => &mut self.auto_reset,
        }
    }

    /// Earliest timer due at or before `until`, disarmed before returning
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerKind, Duration)> {
        let (kind, at) = TimerKind::ORDER
            .into_iter()
            .filter_map(|kind| self.slot(kind).deadline().map(|at| (kind, at)))
            .filter(|(_, at)| *at <= until)
            .min_by_key(|(_, at)| *at)?;
        self.slot_mut(kind).cancel();
        Some((kind, at))
    }

    pub fn cancel_all(&mut self) {
        for kind in TimerKind::ORDER {
            self.slot_mut(kind).cancel();
        }
    }

    pub fn any_armed(&self) -> bool {
        TimerKind::ORDER
            .into_iter()
            .any(|kind| self.slot(kind).is_armed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_rearm_replaces_deadline() {
        let mut timer = Timer::default();
        timer.arm(ms(0), ms(150));
        timer.arm(ms(100), ms(150));
        assert_eq!(timer.deadline(), Some(ms(250)));
        timer.cancel();
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_pop_due_takes_earliest_first() {
        let mut timers = Timers::default();
        timers.auto_reset.arm(ms(0), ms(2500));
        timers.blink.arm(ms(0), ms(3000));
        timers.transition.arm(ms(0), ms(150));

        assert_eq!(timers.pop_due(ms(5000)), Some((TimerKind::Transition, ms(150))));
        assert_eq!(timers.pop_due(ms(5000)), Some((TimerKind::AutoReset, ms(2500))));
        assert_eq!(timers.pop_due(ms(2999)), None);
        assert_eq!(timers.pop_due(ms(3000)), Some((TimerKind::Blink, ms(3000))));
        assert!(!timers.any_armed());
    }

    #[test]
    fn test_ties_break_in_declared_order() {
        let mut timers = Timers::default();
        timers.fidget_start.arm(ms(0), ms(10));
        timers.fidget_end.arm(ms(0), ms(10));
        assert_eq!(timers.pop_due(ms(10)).map(|(k, _)| k), Some(TimerKind::FidgetEnd));
        assert_eq!(timers.pop_due(ms(10)).map(|(k, _)| k), Some(TimerKind::FidgetStart));
    }

    #[test]
    fn test_cancel_all() {
        let mut timers = Timers::default();
        timers.blink.arm(ms(0), ms(1));
        timers.auto_reset.arm(ms(0), ms(1));
        timers.cancel_all();
        assert!(!timers.any_armed());
        assert_eq!(timers.pop_due(ms(100)), None);
    }
}
