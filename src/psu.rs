use core::fmt::Write as _;

use embedded_io::ReadExactError;
use log::{debug, warn};

use crate::{
    command::{ACK_LINE, COMMAND_CAPACITY, Command, Mnemonic, TERMINATOR},
    error::{Error, Result},
    scaling::{CURRENT_LIMIT, Limit, VOLTAGE_LIMIT},
    types::{DisplayReading, LimitSettings, State},
};

/// A single response line, including its trailing `\r`.
pub type ResponseLine<const L: usize> = heapless::String<L>;

/// You can create a Bk1900b using any interface which implements [embedded_io::Read] & [embedded_io::Write].
///
/// For its methods, we generally use the nomenclature that "set" means to write a configuration and "get" means
/// to read back a configuration value. Where as "read" means to get a measured value.
///
/// `L` bounds the length of a single response line. The PSU never sends more than a handful of bytes per
/// line, so the default is plenty.
///
/// Each method performs complete request/response transactions and blocks until they finish. The driver is
/// not safe for concurrent use without external serialization: interleaved commands corrupt the line framing.
pub struct Bk1900b<S: embedded_io::Read + embedded_io::Write, const L: usize = 32> {
    interface: S,
    /// Number of transactions which ended without a proper `OK\r`.
    ack_warnings: u32,
}

impl<S: embedded_io::Read + embedded_io::Write, const L: usize> Bk1900b<S, L> {
    /// Create a new Bk1900b instance which takes ownership of the given interface.
    pub fn new(interface: S) -> Self {
        Self {
            interface,
            ack_warnings: 0,
        }
    }

    /// Give back the underlying interface.
    pub fn release(self) -> S {
        self.interface
    }

    /// How many transactions so far were not finished with an `OK\r` line.
    pub fn acknowledgement_warnings(&self) -> u32 {
        self.ack_warnings
    }

    /// Return the measured output voltage, current and regulation mode.
    pub fn get_display(&mut self) -> Result<DisplayReading, S::Error> {
        let line = self.query(Command::GetDisplay)?;
        DisplayReading::from_response(&line).ok_or(Error::Format {
            command: Mnemonic::GetDisplay,
        })
    }

    /// Return the configured voltage and current limits.
    pub fn get_settings(&mut self) -> Result<LimitSettings, S::Error> {
        let line = self.query(Command::GetSettings)?;
        LimitSettings::from_response(&line).ok_or(Error::Format {
            command: Mnemonic::GetSettings,
        })
    }

    /// Set the voltage limit. Value supplied in volts, accepted range is 0.8V to 16.2V.
    ///
    /// The PSU works in steps of 0.1V, the value is rounded to the nearest step.
    pub fn set_voltage_limit(&mut self, volts: f32) -> Result<(), S::Error> {
        let raw = Self::encode_limit(&VOLTAGE_LIMIT, volts)?;
        self.execute(Command::SetVoltageLimit(raw))?;
        Ok(())
    }

    /// Set the current limit. Value supplied in amps, accepted range is 0A to 63A.
    ///
    /// The PSU works in steps of 0.1A, the value is rounded to the nearest step.
    pub fn set_current_limit(&mut self, amps: f32) -> Result<(), S::Error> {
        let raw = Self::encode_limit(&CURRENT_LIMIT, amps)?;
        self.execute(Command::SetCurrentLimit(raw))?;
        Ok(())
    }

    /// Enable/disable the output.
    pub fn enable_output(&mut self, state: impl Into<State>) -> Result<(), S::Error> {
        self.execute(Command::SetOutput(state.into()))?;
        Ok(())
    }

    /// Return the measured output voltage in volts.
    pub fn read_voltage(&mut self) -> Result<f32, S::Error> {
        Ok(self.get_display()?.voltage)
    }

    /// Same as [Self::set_voltage_limit].
    pub fn set_voltage(&mut self, volts: f32) -> Result<(), S::Error> {
        self.set_voltage_limit(volts)
    }

    /// Return the measured output current in amps.
    pub fn read_current(&mut self) -> Result<f32, S::Error> {
        Ok(self.get_display()?.current)
    }

    /// Same as [Self::set_current_limit].
    pub fn set_current(&mut self, amps: f32) -> Result<(), S::Error> {
        self.set_current_limit(amps)
    }

    /// Return the output power in watts.
    ///
    /// __Note:__ Voltage and current come from two separate display queries, so they may be sampled at slightly
    /// different instants. Use [DisplayReading::power] on a single [Self::get_display] result if that matters.
    pub fn read_power(&mut self) -> Result<f32, S::Error> {
        let voltage = self.read_voltage()?;
        let current = self.read_current()?;
        Ok(voltage * current)
    }

    /// Get the configured voltage limit in volts.
    pub fn get_voltage_limit(&mut self) -> Result<f32, S::Error> {
        Ok(self.get_settings()?.voltage_limit)
    }

    /// Get the configured current limit in amps.
    pub fn get_current_limit(&mut self) -> Result<f32, S::Error> {
        Ok(self.get_settings()?.current_limit)
    }

    /// Send a raw command line and wait for the transaction to finish.
    ///
    /// `command` must not contain the `\r` terminator, it is appended here. With `expect_response` the first
    /// line received is returned as the data response; a bare `OK\r` in its place is an error. The final
    /// acknowledgement line is only checked for a warning.
    pub fn send_command(
        &mut self,
        command: &str,
        expect_response: bool,
    ) -> Result<Option<ResponseLine<L>>, S::Error> {
        if command.bytes().any(|b| b == TERMINATOR) {
            return Err(Error::InvalidCommand);
        }
        let mut command_text: heapless::String<COMMAND_CAPACITY> = heapless::String::new();
        command_text
            .push_str(command)
            .map_err(|_| Error::InvalidCommand)?;

        self.interface
            .write_all(command.as_bytes())
            .map_err(Error::SerialError)?;
        self.interface
            .write_all(&[TERMINATOR])
            .map_err(Error::SerialError)?;
        self.interface.flush().map_err(Error::SerialError)?;
        debug!("Sent command {command}");

        let mut response = None;
        if expect_response {
            let line = match self.read_response_line() {
                Ok(line) => line,
                // The bad line was consumed whole, finish the transaction so the next one starts in step.
                Err(err @ (Error::Decode(_) | Error::LineTooLong)) => {
                    self.read_acknowledgement(command)?;
                    return Err(err);
                }
                Err(err) => return Err(err),
            };
            if line.as_str() == ACK_LINE {
                return Err(Error::Protocol {
                    command: command_text,
                });
            }
            response = Some(line);
        }

        self.read_acknowledgement(command)?;
        Ok(response)
    }

    /// Read one line from the PSU, up to and including the `\r` terminator.
    ///
    /// A line longer than `L` bytes is still read up to its terminator and discarded before
    /// [Error::LineTooLong] is returned.
    pub fn read_response_line(&mut self) -> Result<ResponseLine<L>, S::Error> {
        let mut buff: heapless::Vec<u8, L> = heapless::Vec::new();
        let mut overflowed = false;
        loop {
            let byte = self.read_byte()?;
            if !overflowed && buff.push(byte).is_err() {
                overflowed = true;
            }
            if byte == TERMINATOR {
                break;
            }
        }
        if overflowed {
            debug!("Discarded response line longer than {} bytes", L);
            return Err(Error::LineTooLong);
        }

        let line = heapless::String::from_utf8(buff).map_err(Error::Decode)?;
        debug!("Received line {:?}", line.as_str());
        Ok(line)
    }

    /// Read the line closing a transaction. Anything but `OK\r` is only a warning.
    fn read_acknowledgement(&mut self, command: &str) -> Result<(), S::Error> {
        match self.read_response_line() {
            Ok(ack) if ack.as_str() == ACK_LINE => return Ok(()),
            Ok(ack) => warn!(
                "Command {command} did not return 'OK', got {:?}",
                ack.as_str()
            ),
            Err(Error::Decode(_) | Error::LineTooLong) => {
                warn!("Command {command} did not return 'OK', got an unreadable line")
            }
            Err(err) => return Err(err),
        }
        self.ack_warnings = self.ack_warnings.saturating_add(1);
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, S::Error> {
        let mut byte = [0u8; 1];
        self.interface
            .read_exact(&mut byte)
            .map_err(|err| match err {
                ReadExactError::UnexpectedEof => Error::UnexpectedEof,
                ReadExactError::Other(e) => Error::SerialError(e),
            })?;
        Ok(byte[0])
    }

    /// Run a typed command.
    fn execute(&mut self, command: Command) -> Result<Option<ResponseLine<L>>, S::Error> {
        let mut text: heapless::String<COMMAND_CAPACITY> = heapless::String::new();
        write!(text, "{command}").map_err(|_| Error::InvalidCommand)?;
        self.send_command(&text, command.expects_data())
    }

    /// Run a query command and return its data line.
    fn query(&mut self, command: Command) -> Result<ResponseLine<L>, S::Error> {
        self.execute(command)?.ok_or(Error::Format {
            command: command.mnemonic(),
        })
    }

    fn encode_limit(limit: &Limit, value: f32) -> Result<u16, S::Error> {
        limit.encode(value).ok_or(Error::OutOfRange {
            quantity: limit.quantity,
            min: limit.min,
            max: limit.max,
        })
    }
}
