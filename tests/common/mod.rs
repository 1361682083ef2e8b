//! Recording adapters for driving the climate device without an ir led.

#![allow(dead_code)]

use std::convert::Infallible;

use climate_control::climate::encoder::CommandEncoder;
use climate_control::climate::state::{AcMode, ApplianceState, FanSpeed, Temperature};
use climate_control::ir::output::IrTransmit;
use climate_control::ir::types::IrSequence;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Short,
    Extended,
    Off,
}

/// One transmitted frame, with the state staged at the moment it was sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Sent {
    pub kind: FrameKind,
    pub staged: ApplianceState,
}

#[derive(Error, Debug)]
#[error("ir led unplugged")]
pub struct Unplugged;

/// Stages into a plain [`ApplianceState`] and records every send.
#[derive(Debug, Default)]
pub struct RecordingEncoder {
    pub staged: ApplianceState,
    pub sent: Vec<Sent>,
    pub raw: Vec<Vec<u8>>,
    pub fail: bool,
}

impl RecordingEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        RecordingEncoder {
            fail: true,
            ..Self::default()
        }
    }

    pub fn kinds(&self) -> Vec<FrameKind> {
        self.sent.iter().map(|s| s.kind).collect()
    }

    fn record(&mut self, kind: FrameKind) -> Result<(), Unplugged> {
        self.sent.push(Sent {
            kind,
            staged: self.staged,
        });
        if self.fail {
            Err(Unplugged)
        } else {
            Ok(())
        }
    }
}

impl CommandEncoder for RecordingEncoder {
    type Error = Unplugged;

    fn set_mode(&mut self, mode: AcMode) {
        self.staged.mode = mode;
    }

    fn set_fan(&mut self, fan: FanSpeed) {
        self.staged.fan_speed = fan;
    }

    fn set_temp(&mut self, temp: Temperature) {
        self.staged.temperature = temp;
    }

    fn set_swing(&mut self, swing: bool) {
        self.staged.swing = swing;
    }

    fn on(&mut self) {
        self.staged.power = true;
    }

    fn off(&mut self) {
        self.staged.power = false;
    }

    fn send(&mut self) -> Result<(), Unplugged> {
        self.record(FrameKind::Short)
    }

    fn send_extended(&mut self) -> Result<(), Unplugged> {
        self.record(FrameKind::Extended)
    }

    fn send_off(&mut self) -> Result<(), Unplugged> {
        self.record(FrameKind::Off)
    }

    fn send_raw(&mut self, bytes: &[u8]) -> Result<(), Unplugged> {
        self.raw.push(bytes.to_vec());
        Ok(())
    }
}

/// Keeps every sequence handed to it.
#[derive(Debug, Default)]
pub struct RecordingOut {
    pub sequences: Vec<IrSequence>,
}

impl IrTransmit for RecordingOut {
    type Error = Infallible;

    fn transmit(&mut self, sequence: IrSequence) -> Result<(), Infallible> {
        self.sequences.push(sequence);
        Ok(())
    }
}

pub fn celsius(value: f32) -> Temperature {
    Temperature::clamped(value).unwrap()
}
