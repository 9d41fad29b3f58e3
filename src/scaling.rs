//! Scaling factors and field widths of the 1900B protocol.
//!
//! All numbers on the wire are fixed width, zero padded decimal integers. The display query reports
//! hundredths of a unit in 4 digit fields, while the limit settings use tenths of a unit in 3 digit fields.

use crate::types::Quantity;

/// A fixed width decimal field on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Number of digits, at most 4.
    pub width: usize,
    /// Raw counts per unit (e.g. 100 means the raw value is in hundredths).
    pub scale: u16,
}

/// Output voltage in the `GETD` response, centivolts.
pub const DISPLAY_VOLTAGE: Field = Field::new(4, 100);
/// Output current in the `GETD` response, centiamps.
pub const DISPLAY_CURRENT: Field = Field::new(4, 100);
/// Voltage limit in `GETS` and `VOLT`, decivolts.
pub const SETTING_VOLTAGE: Field = Field::new(3, 10);
/// Current limit in `GETS` and `CURR`, deciamps.
pub const SETTING_CURRENT: Field = Field::new(3, 10);

impl Field {
    pub const fn new(width: usize, scale: u16) -> Self {
        Self { width, scale }
    }

    /// Largest raw value which fits in this field.
    pub const fn max_raw(&self) -> u16 {
        let mut max: u16 = 1;
        let mut i = 0;
        while i < self.width {
            max *= 10;
            i += 1;
        }
        max - 1
    }

    /// Decode exactly `width` ASCII digits into a value in units.
    pub fn decode(&self, digits: &str) -> Option<f32> {
        if digits.len() != self.width || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let raw: u16 = digits.parse().ok()?;
        Some(raw as f32 / self.scale as f32)
    }

    /// Decode the field starting at byte `offset` of `line`.
    pub fn decode_at(&self, line: &str, offset: usize) -> Option<f32> {
        self.decode(line.get(offset..offset + self.width)?)
    }

    /// Convert a value in units to the raw count, rounding to the nearest step.
    ///
    /// Halves round up, so 12.25A is sent as `123` deciamps.
    ///
    /// Returns `None` for negative or NaN values and for values too large for the field.
    pub fn encode(&self, value: f32) -> Option<u16> {
        if value.is_nan() || value < 0.0 {
            return None;
        }
        let scaled = value * self.scale as f32 + 0.5;
        if scaled >= self.max_raw() as f32 + 1.0 {
            return None;
        }
        Some(scaled as u16)
    }
}

/// The range a limit setting accepts, together with its wire field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit {
    pub quantity: Quantity,
    pub min: f32,
    pub max: f32,
    pub field: Field,
}

/// Accepted voltage limits, in volts.
pub const VOLTAGE_LIMIT: Limit = Limit {
    quantity: Quantity::Voltage,
    min: 0.8,
    max: 16.2,
    field: SETTING_VOLTAGE,
};

/// Accepted current limits, in amps.
pub const CURRENT_LIMIT: Limit = Limit {
    quantity: Quantity::Current,
    min: 0.0,
    max: 63.0,
    field: SETTING_CURRENT,
};

impl Limit {
    /// Whether `value` lies within `[min, max]`. NaN never does.
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Validate `value` and convert it to the raw count sent to the PSU.
    pub fn encode(&self, value: f32) -> Option<u16> {
        if !self.contains(value) {
            return None;
        }
        self.field.encode(value)
    }
}
