use std::str::FromStr;

use thiserror::Error;

use crate::climate::encoder::CommandEncoder;
use crate::climate::pending::PendingAction;
use crate::climate::state::{AcMode, FanSpeed, Temperature};
use crate::climate::Climate;

/// A property write, with its new value already applied by the property layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyChange {
    Power(bool),
    Mode(String),
    FanSpeed(String),
    Temperature(Temperature),
    Swing(bool),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("Unknown mode '{0}'")]
    UnknownMode(String),
    #[error("Unknown fan speed '{0}'")]
    UnknownFanSpeed(String),
}

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Accepted,
    Rejected(RejectReason),
}

impl WriteOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, WriteOutcome::Accepted)
    }
}

impl<E: CommandEncoder> Climate<E> {
    /// Applies a property write: updates the state, stages the encoder and
    /// raises exactly one pending action. Nothing is transmitted here.
    ///
    /// An unrecognised mode or fan speed changes nothing.
    pub fn write(&mut self, change: PropertyChange) -> WriteOutcome {
        match change {
            PropertyChange::Power(on) => self.power_changed(on),
            PropertyChange::Mode(mode) => match AcMode::from_str(&mode) {
                Ok(mode) => self.mode_changed(mode),
                Err(_) => return WriteOutcome::Rejected(RejectReason::UnknownMode(mode)),
            },
            PropertyChange::FanSpeed(fan) => match FanSpeed::from_str(&fan) {
                Ok(fan) => self.fan_changed(fan),
                Err(_) => return WriteOutcome::Rejected(RejectReason::UnknownFanSpeed(fan)),
            },
            PropertyChange::Temperature(temp) => self.temp_changed(temp),
            PropertyChange::Swing(swing) => self.swing_changed(swing),
        }
        WriteOutcome::Accepted
    }

    fn power_changed(&mut self, on: bool) {
        self.state.power = on;
        if on {
            debug!("switch ac on");
            self.encoder.on();
            self.pending.raise(PendingAction::PowerOn);
        } else {
            debug!("switch ac off");
            self.encoder.off();
            self.pending.raise(PendingAction::PowerOff);
        }
    }

    fn mode_changed(&mut self, mode: AcMode) {
        debug!("mode -> {}", mode);
        self.state.mode = mode;
        self.encoder.set_mode(mode);
        self.pending.raise(PendingAction::ShortUpdate);
    }

    fn fan_changed(&mut self, fan: FanSpeed) {
        debug!("fan speed -> {}", fan);
        self.state.fan_speed = fan;
        self.encoder.set_fan(fan);
        self.pending.raise(PendingAction::ShortUpdate);
    }

    fn temp_changed(&mut self, temp: Temperature) {
        debug!("temperature -> {}", temp);
        self.state.temperature = temp;
        self.encoder.set_temp(temp);
        self.pending.raise(PendingAction::ShortUpdate);
    }

    fn swing_changed(&mut self, swing: bool) {
        debug!("swing -> {}", swing);
        self.state.swing = swing;
        self.encoder.set_swing(swing);
        self.pending.raise(PendingAction::ShortUpdate);
    }
}
