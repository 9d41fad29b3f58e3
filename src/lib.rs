//! This crate provides an interface for communicating with and controlling the BK Precision 1900B series of
//! switching bench power supplies over their serial port.
//!
//! It supports `no-std` environments by use of the `no-std` feature flag.
//!
//! PSU models which this should work with:
//! * 1900B (1-16V, 0-60A)
//! * 1901B
//! * 1902B
//!
//! The supply speaks a small ASCII protocol. Every command is a single line terminated by a carriage return,
//! and every transaction is finished by the supply with an `OK\r` acknowledgement line. Query commands
//! (`GETD`, `GETS`) send one data line before the acknowledgement.
//!
//! The serial port used for PSU comms should be configured like so:
//! * Default baud rate: 9600
//! * Data bits: 8
//! * Stop bits: 1
//! * Parity: None
//!
//! The driver itself has no timeouts. If the supply stops answering, a read blocks for as long as the
//! underlying interface blocks, so configure a read timeout on the port.

#![cfg_attr(all(feature = "no-std", not(test)), no_std)]

pub mod command;
pub mod error;
pub mod monitor;
pub mod psu;
pub mod scaling;
pub mod types;

#[cfg(test)]
mod mock_serial;
