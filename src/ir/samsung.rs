pub mod types;

use crate::climate::state::{AcMode, FanSpeed, Temperature};
use crate::ir::format::samsung::SECTION_LENGTH;
use crate::ir::format::Samsung as SamsungFormat;
use crate::ir::samsung::types::{
    apply_checksum, fan_code, fan_from_code, SamsungMode, SamsungSwing, EXTENDED_MIDDLE_SECTION,
    EXTENDED_STATE_LENGTH, FAN_OFFSET, MAX_TEMPERATURE, MIN_TEMPERATURE, MODE_FAN_BYTE,
    MODE_OFFSET, OFF_STATE, POWER_BYTES, POWER_MASK, RESET_STATE, STATE_LENGTH, SWING_BYTE,
    SWING_OFFSET, TEMP_BYTE, TEMP_OFFSET, THREE_BITS,
};
use crate::ir::types::{IrPulseBytes, IrStatus, IrTarget};

/// Samsung split-unit protocol, staged as the 14-byte short state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Samsung {
    state: [u8; STATE_LENGTH],
}

impl Default for Samsung {
    fn default() -> Self {
        Samsung { state: RESET_STATE }
    }
}

impl Samsung {
    fn set_bits(&mut self, byte: usize, offset: u8, mask: u8, value: u8) {
        self.state[byte] = (self.state[byte] & !(mask << offset)) | ((value & mask) << offset);
    }

    fn get_bits(&self, byte: usize, offset: u8, mask: u8) -> u8 {
        (self.state[byte] >> offset) & mask
    }

    fn is_powered(&self) -> bool {
        self.state[POWER_BYTES[0]] & POWER_MASK == POWER_MASK
    }

    fn checksummed(mut bytes: Vec<u8>) -> IrPulseBytes {
        bytes.chunks_mut(SECTION_LENGTH).for_each(apply_checksum);
        IrPulseBytes(bytes)
    }
}

impl IrTarget for Samsung {
    type Format = SamsungFormat;
    const OFF_FRAME: &'static [u8] = &OFF_STATE;

    fn mode_set(&mut self, mode: AcMode) {
        self.set_bits(
            MODE_FAN_BYTE,
            MODE_OFFSET,
            THREE_BITS,
            SamsungMode::from(mode).into(),
        );
    }

    fn fan_set(&mut self, fan: FanSpeed) {
        self.set_bits(MODE_FAN_BYTE, FAN_OFFSET, THREE_BITS, fan_code(fan));
    }

    /// The protocol only carries whole degrees, half steps are rounded down.
    fn temp_set(&mut self, temp: Temperature) {
        let degrees = temp
            .whole_degrees()
            .clamp(MIN_TEMPERATURE, MAX_TEMPERATURE);
        self.set_bits(TEMP_BYTE, TEMP_OFFSET, 0x0F, degrees - MIN_TEMPERATURE);
    }

    fn swing_set(&mut self, swing: bool) {
        let code = if swing {
            SamsungSwing::Move
        } else {
            SamsungSwing::Stop
        };
        self.set_bits(SWING_BYTE, SWING_OFFSET, THREE_BITS, code.into());
    }

    fn power_on(&mut self) {
        for byte in POWER_BYTES {
            self.state[byte] |= POWER_MASK;
        }
    }

    fn power_off(&mut self) {
        for byte in POWER_BYTES {
            self.state[byte] &= !POWER_MASK;
        }
    }

    fn frame(&mut self) -> IrPulseBytes {
        Self::checksummed(self.state.to_vec())
    }

    fn extended_frame(&mut self) -> IrPulseBytes {
        let mut extended = Vec::with_capacity(EXTENDED_STATE_LENGTH);
        extended.extend_from_slice(&self.state[..SECTION_LENGTH]);
        extended.extend_from_slice(&EXTENDED_MIDDLE_SECTION);
        extended.extend_from_slice(&self.state[SECTION_LENGTH..]);
        Self::checksummed(extended)
    }

    fn status(&self) -> IrStatus {
        IrStatus {
            powered: self.is_powered(),
            mode: SamsungMode::from_code(self.get_bits(MODE_FAN_BYTE, MODE_OFFSET, THREE_BITS))
                .and_then(SamsungMode::as_ac_mode),
            fan: fan_from_code(self.get_bits(MODE_FAN_BYTE, FAN_OFFSET, THREE_BITS)),
            temperature: self.get_bits(TEMP_BYTE, TEMP_OFFSET, 0x0F) + MIN_TEMPERATURE,
            swing: self.get_bits(SWING_BYTE, SWING_OFFSET, THREE_BITS)
                == u8::from(SamsungSwing::Move),
        }
    }
}

#[cfg(test)]
mod test {
    use super::types::{section_checksum, stored_checksum};
    use super::*;
    use std::convert::TryFrom;
    use strum::IntoEnumIterator;

    fn sections_valid(bytes: &[u8]) -> bool {
        bytes
            .chunks(SECTION_LENGTH)
            .all(|s| section_checksum(s) == stored_checksum(s))
    }

    #[test]
    fn off_frame_has_valid_checksums() {
        assert_eq!(Samsung::OFF_FRAME.len(), EXTENDED_STATE_LENGTH);
        assert!(sections_valid(Samsung::OFF_FRAME));
    }

    #[test]
    fn frames_are_checksummed() {
        let mut samsung = Samsung::default();
        samsung.temp_set(Temperature::try_from(22.0_f32).unwrap());
        samsung.fan_set(FanSpeed::Turbo);
        let frame = samsung.frame();
        assert_eq!(frame.0.len(), STATE_LENGTH);
        assert!(sections_valid(frame.as_ref()));

        let extended = samsung.extended_frame();
        assert_eq!(extended.0.len(), EXTENDED_STATE_LENGTH);
        assert!(sections_valid(extended.as_ref()));
        assert_eq!(extended.0[..SECTION_LENGTH], frame.0[..SECTION_LENGTH]);
        assert_eq!(extended.0[2 * SECTION_LENGTH..], frame.0[SECTION_LENGTH..]);
    }

    #[test]
    fn extended_power_on_matches_stock_remote() {
        // reset state is on/cool/low/16C with swing moving, as the stock remote powers on
        let mut samsung = Samsung::default();
        samsung.power_on();
        let extended = samsung.extended_frame();
        assert_eq!(extended.0[7..14], EXTENDED_MIDDLE_SECTION);
        assert_eq!(extended.0[6] & POWER_MASK, POWER_MASK);
        assert_eq!(extended.0[20] & POWER_MASK, POWER_MASK);
    }

    #[test]
    fn staged_fields_read_back() {
        let mut samsung = Samsung::default();
        for mode in AcMode::iter() {
            for fan in FanSpeed::iter() {
                samsung.mode_set(mode);
                samsung.fan_set(fan);
                let status = samsung.status();
                assert_eq!(status.mode, Some(mode));
                assert_eq!(status.fan, Some(fan));
            }
        }

        samsung.temp_set(Temperature::try_from(24.5_f32).unwrap());
        samsung.swing_set(true);
        samsung.power_off();
        let status = samsung.status();
        assert_eq!(status.temperature, 24);
        assert!(status.swing);
        assert!(!status.powered);

        samsung.swing_set(false);
        samsung.power_on();
        let status = samsung.status();
        assert!(!status.swing);
        assert!(status.powered);
    }

    #[test]
    fn temperatures_span_the_nibble() {
        let mut samsung = Samsung::default();
        let mut frames: Vec<_> = (18..=30)
            .map(|t| {
                samsung.temp_set(Temperature::try_from(t as f32).unwrap());
                assert_eq!(samsung.status().temperature, t);
                samsung.frame()
            })
            .collect();
        assert_eq!(frames.len(), 13);
        frames.dedup();
        assert_eq!(frames.len(), 13);
    }
}
