//! Our error types for the 1900B PSUs.

use thiserror::Error;

use crate::command::{COMMAND_CAPACITY, Mnemonic};
use crate::types::Quantity;

pub type Result<T, I> = core::result::Result<T, Error<I>>;

/// Custom error type for BK Precision 1900B PSU communications.
#[derive(Error, Debug)]
pub enum Error<I: embedded_io::Error> {
    #[error("Serial communication error")]
    SerialError(I),
    #[error("Serial interface reached end of stream before a full line was received")]
    UnexpectedEof,
    #[error("Response line exceeded the line buffer capacity")]
    LineTooLong,
    #[error("Response is not valid UTF-8: {0}")]
    Decode(core::str::Utf8Error),
    #[error("Command '{command}' did not return an expected data response")]
    Protocol {
        command: heapless::String<COMMAND_CAPACITY>,
    },
    #[error("Malformed response to '{command}'")]
    Format { command: Mnemonic },
    #[error("Supported {quantity} range is {min} to {max}")]
    OutOfRange { quantity: Quantity, min: f32, max: f32 },
    #[error("Command must be a single line of at most {} bytes", COMMAND_CAPACITY)]
    InvalidCommand,
}
