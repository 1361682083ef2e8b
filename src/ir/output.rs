use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use num_traits::AsPrimitive;
use rppal::gpio::{Gpio, PwmPulse, PwmStep};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::spawn_blocking;

use crate::ir::types::IrSequence;
use crate::GpioError;
use core::iter;

pub const IR_OUTPUT_PIN: u8 = 13;

const WAIT_TIMEOUT: Duration = Duration::from_micros(100);

/// Puts encoded sequences on the air.
///
/// There is no feedback channel from the appliance, so `Ok` only means the
/// sequence was handed to the hardware.
pub trait IrTransmit {
    type Error: std::error::Error + Send + Sync + 'static;
    fn transmit(&mut self, sequence: IrSequence) -> std::result::Result<(), Self::Error>;
}

#[derive(Error, Debug)]
pub enum IrOutError {
    #[error(transparent)]
    Gpio(#[from] GpioError),
    #[error("Could not send message to ir thread")]
    Send,
}

pub type Result<T> = std::result::Result<T, IrOutError>;

#[derive(Debug)]
pub struct IrOut {
    carrier_period: Duration,
    sequence_sender: mpsc::Sender<IrSequence>,
    send_stop_sender: watch::Sender<bool>,
}

impl IrOut {
    pub fn start(pin: u8, carrier_hz: u32) -> Result<IrOut> {
        let out = Arc::new(Mutex::new(
            Gpio::new()
                .map_err(|_| GpioError::Initialization)?
                .get(pin)
                .map_err(|_| GpioError::Pin(pin))?
                .into_output(),
        ));
        let carrier_period = Duration::from_micros(1_000_000 / u64::from(carrier_hz.max(1)));
        let (send_stop_sender, send_stop_receiver) = watch::channel(false);
        let (sequence_sender, sequence_receiver) = mpsc::channel::<IrSequence>();
        info!("starting ir output on pin {} at {}Hz", pin, carrier_hz);
        spawn_blocking(move || loop {
            if *send_stop_receiver.borrow() {
                trace!("stopping ir sender thread");
                break;
            }

            match sequence_receiver.recv_timeout(WAIT_TIMEOUT) {
                Ok(seq) => match out.lock() {
                    Err(_) => {
                        error!("Could not get lock for ir output!");
                    }
                    Ok(mut o) => {
                        if let Err(e) =
                            o.set_pwm_sequence(Self::pwm_steps(seq, carrier_period), false)
                        {
                            error!("Could not set up pwm for ir output: {:?}", e);
                        }
                    }
                },
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    // nothing queued, loop to check for stop
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    info!("ir sequence sender disconnected before stop signal");
                    break;
                }
            }
        });
        Ok(IrOut {
            carrier_period,
            sequence_sender,
            send_stop_sender,
        })
    }

    pub fn default_pin(carrier_hz: u32) -> Result<Self> {
        Self::start(IR_OUTPUT_PIN, carrier_hz)
    }

    /// Marks become bursts of carrier pulses, spaces become plain waits.
    fn pwm_steps(seq: IrSequence, carrier_period: Duration) -> Vec<PwmStep> {
        let period = carrier_period.as_micros().max(1);
        seq.into_inner()
            .into_iter()
            .enumerate()
            .fold(Vec::new(), |mut acc, (i, pulse)| {
                if i % 2 == 0 {
                    let micros: u128 = pulse.as_();
                    acc.extend(
                        iter::repeat(PwmStep::Pulse(PwmPulse {
                            period: carrier_period,
                            pulse_width: carrier_period / 3,
                        }))
                        .take((micros / period).as_()),
                    );
                } else {
                    acc.push(PwmStep::Wait(Duration::from_micros(pulse.as_())));
                }
                acc
            })
    }

    pub fn carrier_period(&self) -> Duration {
        self.carrier_period
    }

    pub fn send(&self, seq: IrSequence) -> Result<()> {
        debug!(
            "sending sequence of {} pulses, {}us on air",
            seq.len(),
            seq.duration_micros()
        );
        trace!("sequence: {:?}", seq);
        self.sequence_sender
            .send(seq)
            .map_err(|_| IrOutError::Send)
    }

    pub fn stop(&mut self) -> Result<()> {
        self.send_stop_sender
            .send(true)
            .map_err(|_| IrOutError::Send)
    }
}

impl IrTransmit for IrOut {
    type Error = IrOutError;

    fn transmit(&mut self, sequence: IrSequence) -> Result<()> {
        self.send(sequence)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ir::types::IrPulse;

    #[test]
    fn marks_become_carrier_bursts() {
        let period = Duration::from_micros(26);
        let seq = IrSequence(vec![IrPulse(263), IrPulse(500), IrPulse(52)]);
        let steps = IrOut::pwm_steps(seq, period);

        assert_eq!(steps.len(), 10 + 1 + 2);
        assert!(steps[..10]
            .iter()
            .all(|s| matches!(s, PwmStep::Pulse(p) if p.period == period)));
        assert!(matches!(
            steps[10],
            PwmStep::Wait(d) if d == Duration::from_micros(500)
        ));
    }
}
