//! This module defines the ASCII command set of the 1900B PSUs.

use core::fmt;

use strum_macros::{AsRefStr, Display, EnumIter};

use crate::scaling::{SETTING_CURRENT, SETTING_VOLTAGE};
use crate::types::State;

/// Every command line ends with a single carriage return.
pub const TERMINATOR: u8 = b'\r';

/// The line the PSU sends to finish every transaction.
pub const ACK_LINE: &str = "OK\r";

/// Upper bound on the length of a command line, excluding the terminator.
pub const COMMAND_CAPACITY: usize = 16;

/// The four letter prefix of each command.
#[derive(Debug, Display, AsRefStr, EnumIter, PartialEq, Eq, Clone, Copy)]
pub enum Mnemonic {
    /// __Query__ - Measured output voltage, current and regulation mode.
    #[strum(serialize = "GETD")]
    GetDisplay,
    /// __Query__ - Configured voltage and current limits.
    #[strum(serialize = "GETS")]
    GetSettings,
    /// __Action__ - Voltage limit in decivolts.
    #[strum(serialize = "VOLT")]
    SetVoltage,
    /// __Action__ - Current limit in deciamps.
    #[strum(serialize = "CURR")]
    SetCurrent,
    /// __Action__ - Output switch.
    /// * `0` - Output on.
    /// * `1` - Output off.
    #[strum(serialize = "SOUT")]
    SetOutput,
}

/// A single, fully parameterised command.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Command {
    GetDisplay,
    GetSettings,
    /// Raw decivolt count, already validated.
    SetVoltageLimit(u16),
    /// Raw deciamp count, already validated.
    SetCurrentLimit(u16),
    SetOutput(State),
}

impl Command {
    pub fn mnemonic(&self) -> Mnemonic {
        match self {
            Command::GetDisplay => Mnemonic::GetDisplay,
            Command::GetSettings => Mnemonic::GetSettings,
            Command::SetVoltageLimit(_) => Mnemonic::SetVoltage,
            Command::SetCurrentLimit(_) => Mnemonic::SetCurrent,
            Command::SetOutput(_) => Mnemonic::SetOutput,
        }
    }

    /// Query commands are answered with a data line before the acknowledgement.
    pub fn expects_data(&self) -> bool {
        matches!(self, Command::GetDisplay | Command::GetSettings)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.mnemonic();
        match *self {
            Command::GetDisplay | Command::GetSettings => write!(f, "{mnemonic}"),
            Command::SetVoltageLimit(raw) => {
                write!(f, "{mnemonic}{raw:0width$}", width = SETTING_VOLTAGE.width)
            }
            Command::SetCurrentLimit(raw) => {
                write!(f, "{mnemonic}{raw:0width$}", width = SETTING_CURRENT.width)
            }
            // The PSU uses 0 for "on".
            Command::SetOutput(State::On) => write!(f, "{mnemonic}0"),
            Command::SetOutput(State::Off) => write!(f, "{mnemonic}1"),
        }
    }
}
