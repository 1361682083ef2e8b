use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::climate::router::PropertyChange;
use crate::climate::state::{ApplianceState, InvalidTemperature, Temperature};

pub const SETTINGS_FILE: &str = "climate-control.json";

/// Names the properties are exposed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum PropertyName {
    #[strum(to_string = "on", serialize = "power")]
    On,
    #[strum(to_string = "mode")]
    Mode,
    #[strum(to_string = "desiredTemperature", serialize = "temperature")]
    DesiredTemperature,
    #[strum(to_string = "fanSpeed")]
    FanSpeed,
    #[strum(to_string = "swing")]
    Swing,
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Unknown property '{0}'")]
    UnknownProperty(String),
    #[error("'{0}' is not a boolean")]
    InvalidBool(String),
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    #[error(transparent)]
    Temperature(#[from] InvalidTemperature),
    #[error("Could not access settings file")]
    Io(#[from] std::io::Error),
    #[error("Could not read or write settings")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Persisted property values.
///
/// Raw writes are parsed here into typed [`PropertyChange`]s; the climate
/// device decides whether to accept them and the accepted state is stored
/// back afterwards.
#[derive(Debug)]
pub struct Settings {
    path: Option<PathBuf>,
    state: ApplianceState,
}

impl Settings {
    pub fn in_memory() -> Settings {
        Settings {
            path: None,
            state: ApplianceState::default(),
        }
    }

    /// Reads stored values from `path`, falling back to defaults when the
    /// file does not exist yet.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Settings> {
        let path = path.as_ref().to_path_buf();
        let state = match fs::read_to_string(&path) {
            Ok(contents) => {
                let state = serde_json::from_str(&contents)?;
                info!("loaded settings from {}", path.display());
                state
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("no settings at {}, using defaults", path.display());
                ApplianceState::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Settings {
            path: Some(path),
            state,
        })
    }

    pub fn state(&self) -> &ApplianceState {
        &self.state
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Records the accepted state and persists it.
    pub fn store(&mut self, state: &ApplianceState) -> Result<()> {
        if self.state == *state {
            return Ok(());
        }
        self.state = *state;
        if let Some(path) = &self.path {
            trace!("writing settings to {}", path.display());
            fs::write(path, serde_json::to_string_pretty(&self.state)?)?;
        }
        Ok(())
    }

    /// Parses a raw property write.
    ///
    /// The temperature is clamped to its range and snapped to half degrees.
    /// Mode and fan speed strings pass through unchecked.
    pub fn parse(name: &str, value: &str) -> Result<PropertyChange> {
        let name = PropertyName::from_str(name)
            .map_err(|_| SettingsError::UnknownProperty(name.to_string()))?;
        let value = value.trim();
        Ok(match name {
            PropertyName::On => PropertyChange::Power(parse_bool(value)?),
            PropertyName::Mode => PropertyChange::Mode(value.to_string()),
            PropertyName::DesiredTemperature => {
                let celsius = value
                    .parse::<f32>()
                    .map_err(|_| SettingsError::InvalidNumber(value.to_string()))?;
                PropertyChange::Temperature(Temperature::clamped(celsius)?)
            }
            PropertyName::FanSpeed => PropertyChange::FanSpeed(value.to_string()),
            PropertyName::Swing => PropertyChange::Swing(parse_bool(value)?),
        })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        _ => Err(SettingsError::InvalidBool(value.to_string())),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::climate::state::{AcMode, FanSpeed};
    use std::convert::TryFrom;

    #[test]
    fn parses_property_writes() {
        assert_eq!(
            Settings::parse("on", "true").unwrap(),
            PropertyChange::Power(true)
        );
        assert_eq!(
            Settings::parse("power", "off").unwrap(),
            PropertyChange::Power(false)
        );
        assert_eq!(
            Settings::parse("mode", "heat").unwrap(),
            PropertyChange::Mode("heat".to_string())
        );
        assert_eq!(
            Settings::parse("fanSpeed", "turbo").unwrap(),
            PropertyChange::FanSpeed("turbo".to_string())
        );
        assert_eq!(
            Settings::parse("swing", "1").unwrap(),
            PropertyChange::Swing(true)
        );
    }

    #[test]
    fn temperature_is_clamped_before_routing() {
        assert_eq!(
            Settings::parse("desiredTemperature", "24.3").unwrap(),
            PropertyChange::Temperature(Temperature::try_from(24.5_f32).unwrap())
        );
        assert_eq!(
            Settings::parse("temperature", "35").unwrap(),
            PropertyChange::Temperature(Temperature::try_from(30.0_f32).unwrap())
        );
        assert!(matches!(
            Settings::parse("temperature", "warm"),
            Err(SettingsError::InvalidNumber(_))
        ));
        assert!(matches!(
            Settings::parse("temperature", "NaN"),
            Err(SettingsError::Temperature(InvalidTemperature::NotANumber))
        ));
    }

    #[test]
    fn rejects_unknown_names_and_bad_bools() {
        assert!(matches!(
            Settings::parse("humidity", "40"),
            Err(SettingsError::UnknownProperty(_))
        ));
        assert!(matches!(
            Settings::parse("swing", "maybe"),
            Err(SettingsError::InvalidBool(_))
        ));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path().join(SETTINGS_FILE)).unwrap();
        assert_eq!(*settings.state(), ApplianceState::default());
    }

    #[test]
    fn stored_state_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let mut settings = Settings::load(&path).unwrap();
        let state = ApplianceState {
            power: true,
            mode: AcMode::Fan,
            fan_speed: FanSpeed::High,
            temperature: Temperature::try_from(21.5_f32).unwrap(),
            swing: true,
        };
        settings.store(&state).unwrap();

        let reloaded = Settings::load(&path).unwrap();
        assert_eq!(*reloaded.state(), state);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Json(_))));
    }
}
