use std::time::{Duration, Instant};

use crate::climate::encoder::CommandEncoder;
use crate::climate::pending::{PendingAction, PendingSignals};
use crate::climate::scheduler::{TransmissionScheduler, SETTLE_DELAY};
use crate::climate::state::ApplianceState;

pub mod encoder;
pub mod pending;
pub mod router;
pub mod scheduler;
pub mod state;

/// Interval at which the device loop is expected to call [`Climate::tick`].
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// The air conditioner as seen from the device loop.
///
/// Property writes go through [`Climate::write`], which only stages work.
/// [`Climate::tick`] is the single place frames are transmitted.
#[derive(Debug)]
pub struct Climate<E: CommandEncoder> {
    state: ApplianceState,
    pending: PendingSignals,
    scheduler: TransmissionScheduler,
    encoder: E,
}

impl<E: CommandEncoder> Climate<E> {
    pub fn new(encoder: E, initial: ApplianceState) -> Self {
        Self::with_settle_delay(encoder, initial, SETTLE_DELAY)
    }

    /// Stages `initial` into the encoder without owing any transmission.
    pub fn with_settle_delay(
        mut encoder: E,
        initial: ApplianceState,
        settle_delay: Duration,
    ) -> Self {
        encoder.set_mode(initial.mode);
        encoder.set_fan(initial.fan_speed);
        encoder.set_temp(initial.temperature);
        encoder.set_swing(initial.swing);
        if initial.power {
            encoder.on();
        } else {
            encoder.off();
        }
        info!("climate control starting with {}", initial);
        Climate {
            state: initial,
            pending: PendingSignals::new(),
            scheduler: TransmissionScheduler::new(settle_delay),
            encoder,
        }
    }

    pub fn state(&self) -> &ApplianceState {
        &self.state
    }

    pub fn pending(&self) -> &PendingSignals {
        &self.pending
    }

    pub fn scheduler(&self) -> &TransmissionScheduler {
        &self.scheduler
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn encoder_mut(&mut self) -> &mut E {
        &mut self.encoder
    }

    pub fn into_encoder(self) -> E {
        self.encoder
    }

    /// Runs one scheduler step and returns the action transmitted, if any.
    ///
    /// A failed transmission is logged and counts as sent; it is not retried.
    pub fn tick(&mut self, now: Instant) -> Option<PendingAction> {
        let action = self
            .scheduler
            .poll(now, &mut self.pending, self.state.power)?;

        let result = match action {
            PendingAction::ShortUpdate => self.encoder.send(),
            PendingAction::PowerOn => self.encoder.send_extended(),
            PendingAction::PowerOff => self.encoder.send_off(),
        };
        match result {
            Ok(()) => debug!("sent {}", action),
            Err(e) => error!("could not send {}: {}", action, e),
        }
        self.scheduler.record_transmission(now);
        Some(action)
    }
}
