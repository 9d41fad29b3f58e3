//! This module contains the values exchanged with the PSU.

use strum_macros::{Display, EnumIter};

use crate::scaling::{DISPLAY_CURRENT, DISPLAY_VOLTAGE, SETTING_CURRENT, SETTING_VOLTAGE};

/// Represents the two possible power supply regulation modes.
#[derive(Debug, EnumIter, PartialEq, Eq, Clone, Copy)]
pub enum SupplyMode {
    /// Constant voltage regulation mode.
    ConstantVoltage,
    /// Constant current regulation mode.
    ConstantCurrent,
}

impl SupplyMode {
    /// Interpret the status digit at the end of a `GETD` response.
    ///
    /// `'0'` is constant voltage, any other digit is constant current.
    pub fn from_status_digit(digit: u8) -> Option<Self> {
        match digit {
            b'0' => Some(Self::ConstantVoltage),
            b'1'..=b'9' => Some(Self::ConstantCurrent),
            _ => None,
        }
    }
}

/// A physical quantity the PSU regulates. Used to describe range violations.
#[derive(Debug, Display, PartialEq, Eq, Clone, Copy)]
pub enum Quantity {
    #[strum(serialize = "voltage")]
    Voltage,
    #[strum(serialize = "current")]
    Current,
}

/// Used to be less ambiguous and whether something is on or off.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    /// Disabled.
    Off,
    /// Enabled.
    On,
}

impl From<State> for bool {
    fn from(value: State) -> Self {
        match value {
            State::Off => false,
            State::On => true,
        }
    }
}

impl From<bool> for State {
    fn from(value: bool) -> Self {
        match value {
            true => State::On,
            false => State::Off,
        }
    }
}

/// The measured output of the supply, as shown on its front panel.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct DisplayReading {
    /// Output voltage in volts.
    pub voltage: f32,
    /// Output current in amps.
    pub current: f32,
    /// Which regulation loop is active.
    pub mode: SupplyMode,
}

impl DisplayReading {
    /// Parse the data line of a `GETD` query, e.g. `081502500\r`.
    ///
    /// Layout: 4 digits of centivolts, 4 digits of centiamps, then the mode digit. Anything after the
    /// mode digit is ignored.
    pub fn from_response(line: &str) -> Option<Self> {
        let body = line.strip_suffix('\r').unwrap_or(line);
        let voltage = DISPLAY_VOLTAGE.decode_at(body, 0)?;
        let current = DISPLAY_CURRENT.decode_at(body, DISPLAY_VOLTAGE.width)?;
        let mode = body
            .as_bytes()
            .get(DISPLAY_VOLTAGE.width + DISPLAY_CURRENT.width)
            .copied()
            .and_then(SupplyMode::from_status_digit)?;
        Some(Self {
            voltage,
            current,
            mode,
        })
    }

    /// Output power in watts, computed from this single reading.
    pub fn power(&self) -> f32 {
        self.voltage * self.current
    }
}

/// The configured voltage and current ceilings.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct LimitSettings {
    /// Voltage limit in volts.
    pub voltage_limit: f32,
    /// Current limit in amps.
    pub current_limit: f32,
}

impl LimitSettings {
    /// Parse the data line of a `GETS` query, e.g. `120050\r`.
    ///
    /// Layout: 3 digits of decivolts followed by 3 digits of deciamps.
    pub fn from_response(line: &str) -> Option<Self> {
        let body = line.strip_suffix('\r').unwrap_or(line);
        let voltage_limit = SETTING_VOLTAGE.decode_at(body, 0)?;
        let current_limit = SETTING_CURRENT.decode_at(body, SETTING_VOLTAGE.width)?;
        Some(Self {
            voltage_limit,
            current_limit,
        })
    }
}
