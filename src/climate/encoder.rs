use thiserror::Error;

use crate::climate::state::{AcMode, FanSpeed, Temperature};
use crate::ir::output::IrTransmit;
use crate::ir::types::{IrEncodeError, IrFormat, IrStatus, IrTarget};

/// Converts appliance state into frames and puts them on the air.
///
/// The staging calls only change what the next frame will contain. The three
/// send calls are the only ones that perform I/O.
pub trait CommandEncoder {
    type Error: std::error::Error + Send + Sync + 'static;

    fn set_mode(&mut self, mode: AcMode);
    fn set_fan(&mut self, fan: FanSpeed);
    fn set_temp(&mut self, temp: Temperature);
    fn set_swing(&mut self, swing: bool);
    fn on(&mut self);
    fn off(&mut self);

    /// Transmit the staged full state as one short frame.
    fn send(&mut self) -> Result<(), Self::Error>;
    /// Transmit the staged state as the richer power-on frame.
    fn send_extended(&mut self) -> Result<(), Self::Error>;
    /// Transmit the protocol's fixed power-off frame, ignoring the staged state.
    fn send_off(&mut self) -> Result<(), Self::Error>;
    /// Transmit arbitrary bytes, bypassing the staged state.
    fn send_raw(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

#[derive(Error, Debug)]
pub enum EncoderError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Encode(#[from] IrEncodeError),
    #[error("Could not transmit ir sequence")]
    Transmit(#[source] E),
}

/// [`CommandEncoder`] built from an appliance protocol and a transmitter.
#[derive(Debug)]
pub struct IrEncoder<T: IrTarget, O: IrTransmit> {
    target: T,
    out: O,
}

impl<T: IrTarget, O: IrTransmit> IrEncoder<T, O> {
    pub fn new(target: T, out: O) -> Self {
        IrEncoder { target, out }
    }

    pub fn status(&self) -> IrStatus {
        self.target.status()
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn transmitter(&self) -> &O {
        &self.out
    }

    pub fn transmitter_mut(&mut self) -> &mut O {
        &mut self.out
    }

    pub fn into_inner(self) -> (T, O) {
        (self.target, self.out)
    }
}

impl<T: IrTarget, O: IrTransmit> CommandEncoder for IrEncoder<T, O> {
    type Error = EncoderError<O::Error>;

    fn set_mode(&mut self, mode: AcMode) {
        self.target.mode_set(mode);
    }

    fn set_fan(&mut self, fan: FanSpeed) {
        self.target.fan_set(fan);
    }

    fn set_temp(&mut self, temp: Temperature) {
        self.target.temp_set(temp);
    }

    fn set_swing(&mut self, swing: bool) {
        self.target.swing_set(swing);
    }

    fn on(&mut self) {
        self.target.power_on();
    }

    fn off(&mut self) {
        self.target.power_off();
    }

    fn send(&mut self) -> Result<(), Self::Error> {
        let frame = self.target.frame();
        debug!("sending short frame: {}", frame);
        self.send_raw(frame.as_ref())
    }

    fn send_extended(&mut self) -> Result<(), Self::Error> {
        let frame = self.target.extended_frame();
        debug!("sending extended frame: {}", frame);
        self.send_raw(frame.as_ref())
    }

    fn send_off(&mut self) -> Result<(), Self::Error> {
        debug!("sending off frame");
        self.send_raw(T::OFF_FRAME)
    }

    fn send_raw(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        let sequence = T::Format::encode(bytes)?;
        self.out.transmit(sequence).map_err(EncoderError::Transmit)
    }
}
