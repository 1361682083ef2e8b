use itertools::Itertools;
use num_traits::AsPrimitive;
use std::fmt::{Display, Formatter};
use thiserror::Error;

use crate::climate::state::{AcMode, FanSpeed, Temperature};

/// Duration of a single mark or space, in microseconds.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct IrPulse(pub u128);

impl IrPulse {
    pub fn into_inner(self) -> u128 {
        self.0
    }
}

impl AsPrimitive<u128> for IrPulse {
    fn as_(self) -> u128 {
        self.0
    }
}

impl AsPrimitive<u64> for IrPulse {
    fn as_(self) -> u64 {
        self.0.as_()
    }
}

impl AsPrimitive<f64> for IrPulse {
    fn as_(self) -> f64 {
        self.0.as_()
    }
}

/// Alternating marks and spaces, starting with a mark.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct IrSequence(pub Vec<IrPulse>);

impl IrSequence {
    pub fn into_inner(self) -> Vec<IrPulse> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total on-air time of the sequence.
    pub fn duration_micros(&self) -> u128 {
        self.0.iter().map(|p| p.0).sum()
    }
}

impl AsRef<[IrPulse]> for IrSequence {
    fn as_ref(&self) -> &[IrPulse] {
        &self.0
    }
}

/// A logical frame, before it is turned into pulses.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct IrPulseBytes(pub Vec<u8>);

impl AsRef<[u8]> for IrPulseBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for IrPulseBytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0.iter().map(|b| format!("0x{:02X}", b)).join(", ")
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrEncodeError {
    #[error("Cannot encode an empty frame")]
    EmptyFrame,
    #[error("Frame of {0} bytes does not split into whole sections")]
    PartialSection(usize),
}

pub trait IrFormat {
    const CARRIER_HZ: u32 = 38_000;
    fn encode<T: AsRef<[u8]>>(bytes: T) -> Result<IrSequence, IrEncodeError>;
}

// target

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrStatus {
    pub powered: bool,
    pub mode: Option<AcMode>,
    pub fan: Option<FanSpeed>,
    pub temperature: u8,
    pub swing: bool,
}

/// An appliance protocol: holds the staged state and builds frames from it.
///
/// Staging calls never perform I/O. Frames are rebuilt from the staged state
/// every time one is requested, so they always reflect the latest values.
pub trait IrTarget {
    type Format: IrFormat;
    /// Protocol-invariant power-off frame, independent of the staged state.
    const OFF_FRAME: &'static [u8];
    fn mode_set(&mut self, mode: AcMode);
    fn fan_set(&mut self, fan: FanSpeed);
    fn temp_set(&mut self, temp: Temperature);
    fn swing_set(&mut self, swing: bool);
    fn power_on(&mut self);
    fn power_off(&mut self);
    fn frame(&mut self) -> IrPulseBytes;
    fn extended_frame(&mut self) -> IrPulseBytes;
    fn status(&self) -> IrStatus;
}
