use std::time::{Duration, Instant};

use crate::climate::pending::{PendingAction, PendingSignals};

/// Minimum quiet period between two frames.
pub const SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Decides which owed transmission, if any, may go out on a tick.
///
/// The scheduler never sleeps. It remembers when the last frame started and
/// refuses to hand out another action until the settle delay has passed, so
/// the surrounding loop keeps running while the receiver settles.
#[derive(Debug, Clone)]
pub struct TransmissionScheduler {
    settle_delay: Duration,
    last_transmission_at: Option<Instant>,
}

impl Default for TransmissionScheduler {
    fn default() -> Self {
        Self::new(SETTLE_DELAY)
    }
}

impl TransmissionScheduler {
    pub fn new(settle_delay: Duration) -> Self {
        TransmissionScheduler {
            settle_delay,
            last_transmission_at: None,
        }
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    pub fn last_transmission_at(&self) -> Option<Instant> {
        self.last_transmission_at
    }

    /// Earliest instant the next frame may start, `None` if no frame was sent yet.
    pub fn ready_at(&self) -> Option<Instant> {
        self.last_transmission_at.map(|at| at + self.settle_delay)
    }

    pub fn is_settling(&self, now: Instant) -> bool {
        matches!(self.ready_at(), Some(ready) if now < ready)
    }

    /// Takes the next action due at `now`.
    ///
    /// A short update owed while the appliance is off is dropped without
    /// sending, even during the settle window. At most one action is
    /// returned per call; the caller transmits it and then calls
    /// [`record_transmission`](Self::record_transmission).
    pub fn poll(
        &mut self,
        now: Instant,
        pending: &mut PendingSignals,
        powered: bool,
    ) -> Option<PendingAction> {
        if !powered && pending.clear(PendingAction::ShortUpdate) {
            debug!("ac is off, dropping short update");
        }

        if pending.is_empty() {
            return None;
        }

        if let Some(ready) = self.ready_at() {
            if now < ready {
                trace!(
                    "settling for another {:?}, holding {:?}",
                    ready - now,
                    pending.peek()
                );
                return None;
            }
        }

        pending.take()
    }

    pub fn record_transmission(&mut self, at: Instant) {
        self.last_transmission_at = Some(at);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn first_action_goes_out_immediately() {
        let mut scheduler = TransmissionScheduler::default();
        let mut pending = PendingSignals::new();
        pending.raise(PendingAction::PowerOn);
        let now = Instant::now();
        assert_eq!(
            scheduler.poll(now, &mut pending, false),
            Some(PendingAction::PowerOn)
        );
        assert!(pending.is_empty());
    }

    #[test]
    fn holds_actions_while_settling() {
        let mut scheduler = TransmissionScheduler::default();
        let mut pending = PendingSignals::new();
        let start = Instant::now();
        scheduler.record_transmission(start);

        pending.raise(PendingAction::ShortUpdate);
        assert!(scheduler.is_settling(start + Duration::from_millis(999)));
        assert_eq!(
            scheduler.poll(start + Duration::from_millis(999), &mut pending, true),
            None
        );
        assert!(pending.contains(PendingAction::ShortUpdate));

        assert_eq!(
            scheduler.poll(start + SETTLE_DELAY, &mut pending, true),
            Some(PendingAction::ShortUpdate)
        );
    }

    #[test]
    fn short_update_while_off_is_dropped_even_when_settling() {
        let mut scheduler = TransmissionScheduler::default();
        let mut pending = PendingSignals::new();
        let start = Instant::now();
        scheduler.record_transmission(start);

        pending.raise(PendingAction::ShortUpdate);
        assert_eq!(
            scheduler.poll(start + Duration::from_millis(100), &mut pending, false),
            None
        );
        assert!(pending.is_empty());
    }

    #[test]
    fn one_action_per_poll() {
        let mut scheduler = TransmissionScheduler::new(Duration::from_millis(0));
        let mut pending = PendingSignals::new();
        pending.raise(PendingAction::PowerOff);
        pending.raise(PendingAction::ShortUpdate);

        let now = Instant::now();
        assert_eq!(
            scheduler.poll(now, &mut pending, true),
            Some(PendingAction::ShortUpdate)
        );
        assert!(pending.contains(PendingAction::PowerOff));
    }

    #[test]
    fn ready_at_follows_last_transmission() {
        let mut scheduler = TransmissionScheduler::new(Duration::from_millis(250));
        assert_eq!(scheduler.ready_at(), None);
        let at = Instant::now();
        scheduler.record_transmission(at);
        assert_eq!(scheduler.ready_at(), Some(at + Duration::from_millis(250)));
        assert_eq!(scheduler.last_transmission_at(), Some(at));
    }
}
