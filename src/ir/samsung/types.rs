use crate::climate::state::{AcMode, FanSpeed};

pub const STATE_LENGTH: usize = 14;
pub const EXTENDED_STATE_LENGTH: usize = 21;

pub const MIN_TEMPERATURE: u8 = 16;
pub const MAX_TEMPERATURE: u8 = 30;

/// Short state as the stock remote sends it after a reset: on, cool, low fan.
pub const RESET_STATE: [u8; STATE_LENGTH] = [
    0x02, 0x92, 0x0F, 0x00, 0x00, 0x00, 0xF0, 0x01, 0x02, 0xAE, 0x71, 0x00, 0x15, 0xF0,
];

/// Section inserted between the two short sections to form an extended frame.
pub const EXTENDED_MIDDLE_SECTION: [u8; 7] = [0x01, 0xD2, 0x0F, 0x00, 0x00, 0x00, 0x00];

pub const OFF_STATE: [u8; EXTENDED_STATE_LENGTH] = [
    0x02, 0xB2, 0x0F, 0x00, 0x00, 0x00, 0xC0, 0x01, 0xD2, 0x0F, 0x00, 0x00, 0x00, 0x00, 0x01,
    0x02, 0xFF, 0x71, 0x80, 0x11, 0xC0,
];

// byte offsets and masks within the short state
pub const POWER_BYTES: [usize; 2] = [6, 13];
pub const POWER_MASK: u8 = 0b0011_0000;
pub const SWING_BYTE: usize = 9;
pub const SWING_OFFSET: u8 = 4;
pub const TEMP_BYTE: usize = 11;
pub const TEMP_OFFSET: u8 = 4;
pub const MODE_FAN_BYTE: usize = 12;
pub const FAN_OFFSET: u8 = 1;
pub const MODE_OFFSET: u8 = 4;
pub const THREE_BITS: u8 = 0b111;

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum SamsungSwing {
    Move,
    Stop,
}

impl From<SamsungSwing> for u8 {
    fn from(s: SamsungSwing) -> Self {
        match s {
            SamsungSwing::Move => 0b010,
            SamsungSwing::Stop => 0b111,
        }
    }
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum SamsungMode {
    Auto,
    Cool,
    Dry,
    Fan,
    Heat,
}

impl From<SamsungMode> for u8 {
    fn from(m: SamsungMode) -> Self {
        match m {
            SamsungMode::Auto => 0,
            SamsungMode::Cool => 1,
            SamsungMode::Dry => 2,
            SamsungMode::Fan => 3,
            SamsungMode::Heat => 4,
        }
    }
}

impl SamsungMode {
    pub fn from_code(code: u8) -> Option<SamsungMode> {
        match code {
            0 => Some(SamsungMode::Auto),
            1 => Some(SamsungMode::Cool),
            2 => Some(SamsungMode::Dry),
            3 => Some(SamsungMode::Fan),
            4 => Some(SamsungMode::Heat),
            _ => None,
        }
    }

    pub fn as_ac_mode(self) -> Option<AcMode> {
        match self {
            SamsungMode::Auto => Some(AcMode::Auto),
            SamsungMode::Cool => Some(AcMode::Cool),
            SamsungMode::Fan => Some(AcMode::Fan),
            SamsungMode::Dry | SamsungMode::Heat => None,
        }
    }
}

impl From<AcMode> for SamsungMode {
    fn from(mode: AcMode) -> Self {
        match mode {
            AcMode::Auto => SamsungMode::Auto,
            AcMode::Cool => SamsungMode::Cool,
            AcMode::Fan => SamsungMode::Fan,
        }
    }
}

pub fn fan_code(fan: FanSpeed) -> u8 {
    match fan {
        FanSpeed::Auto => 0,
        FanSpeed::Low => 2,
        FanSpeed::Medium => 4,
        FanSpeed::High => 5,
        FanSpeed::Turbo => 7,
    }
}

pub fn fan_from_code(code: u8) -> Option<FanSpeed> {
    match code {
        0 => Some(FanSpeed::Auto),
        2 => Some(FanSpeed::Low),
        4 => Some(FanSpeed::Medium),
        5 => Some(FanSpeed::High),
        7 => Some(FanSpeed::Turbo),
        _ => None,
    }
}

/// Inverted bit count over one 7-byte section, skipping the checksum nibbles.
pub fn section_checksum(section: &[u8]) -> u8 {
    let sum = section[0].count_ones()
        + (section[1] & 0x0F).count_ones()
        + (section[2] >> 4).count_ones()
        + section[3..7].iter().map(|b| b.count_ones()).sum::<u32>();
    (sum as u8) ^ 0xFF
}

/// Checksum low nibble goes in the top of byte 1, high nibble in the bottom of byte 2.
pub fn apply_checksum(section: &mut [u8]) {
    let checksum = section_checksum(section);
    section[1] = (section[1] & 0x0F) | (checksum << 4);
    section[2] = (section[2] & 0xF0) | (checksum >> 4);
}

pub fn stored_checksum(section: &[u8]) -> u8 {
    (section[1] >> 4) | (section[2] << 4)
}
