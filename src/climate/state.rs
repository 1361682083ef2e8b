use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

#[derive(
    Debug,
    Clone,
    Copy,
    Ord,
    PartialOrd,
    Eq,
    PartialEq,
    Hash,
    EnumString,
    StrumDisplay,
    AsRefStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AcMode {
    Auto,
    Cool,
    Fan,
}

impl Default for AcMode {
    fn default() -> Self {
        AcMode::Cool
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Ord,
    PartialOrd,
    Eq,
    PartialEq,
    Hash,
    EnumString,
    StrumDisplay,
    AsRefStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FanSpeed {
    Auto,
    Low,
    Medium,
    High,
    Turbo,
}

impl Default for FanSpeed {
    fn default() -> Self {
        FanSpeed::Low
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidTemperature {
    #[error("Temperature {0} is outside {min}..={max}", min = Temperature::MIN, max = Temperature::MAX)]
    Range(f32),
    #[error("Temperature {0} is not a multiple of 0.5")]
    Step(f32),
    #[error("Temperature is not a number")]
    NotANumber,
}

/// Set point in half-degree steps, always within 18.0..=30.0 °C.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(into = "f32", try_from = "f32")]
pub struct Temperature(u8);

impl Temperature {
    pub const MIN: f32 = 18.0;
    pub const MAX: f32 = 30.0;
    pub const STEP: f32 = 0.5;

    /// Clamps to the accepted range and snaps to the nearest half degree.
    pub fn clamped(celsius: f32) -> Result<Self, InvalidTemperature> {
        if celsius.is_nan() {
            return Err(InvalidTemperature::NotANumber);
        }
        let halves = (celsius.clamp(Self::MIN, Self::MAX) / Self::STEP).round();
        Ok(Temperature(halves as u8))
    }

    pub fn celsius(self) -> f32 {
        f32::from(self.0) * Self::STEP
    }

    /// Whole degrees, rounding half steps down.
    pub fn whole_degrees(self) -> u8 {
        self.0 / 2
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Temperature(56)
    }
}

impl TryFrom<f32> for Temperature {
    type Error = InvalidTemperature;

    fn try_from(celsius: f32) -> Result<Self, Self::Error> {
        if celsius.is_nan() {
            return Err(InvalidTemperature::NotANumber);
        }
        if !(Self::MIN..=Self::MAX).contains(&celsius) {
            return Err(InvalidTemperature::Range(celsius));
        }
        let halves = celsius / Self::STEP;
        if halves.fract() != 0.0 {
            return Err(InvalidTemperature::Step(celsius));
        }
        Ok(Temperature(halves as u8))
    }
}

impl From<Temperature> for f32 {
    fn from(t: Temperature) -> Self {
        t.celsius()
    }
}

impl Display for Temperature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.celsius())
    }
}

/// The five user-controllable properties of the appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceState {
    #[serde(rename = "on")]
    pub power: bool,
    pub mode: AcMode,
    pub fan_speed: FanSpeed,
    #[serde(rename = "desiredTemperature")]
    pub temperature: Temperature,
    pub swing: bool,
}

impl Display for ApplianceState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ power: {}, mode: {}, fan: {}, temperature: {}, swing: {} }}",
            if self.power { "on" } else { "off" },
            self.mode,
            self.fan_speed,
            self.temperature,
            if self.swing { "on" } else { "off" }
        )
    }
}
