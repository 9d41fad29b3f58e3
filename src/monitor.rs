//! A small helper for a live status line, polling the PSU display on a fixed cadence.
//!
//! This holds no global state. The caller owns a [Monitor], supplies the current time and prints whatever
//! [Monitor::render] returns. The line ends in `\r` so each print overwrites the previous one.

use core::fmt::Write as _;

use fugit::{MillisDurationU64, TimerInstantU64};

use crate::{
    error::Result,
    psu::Bk1900b,
    types::{DisplayReading, SupplyMode},
};

/// Millisecond timestamps fed to the monitor.
pub type Instant = TimerInstantU64<1000>;

/// A rendered status line.
pub type StatusLine = heapless::String<96>;

const SPINNER_FRAMES: [char; 4] = ['-', '\\', '|', '/'];
const ACTIVE: char = '\u{2022}';
const INACTIVE: char = '\u{25E6}';

/// Rotating busy indicator, shows that the line is still being refreshed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Spinner {
    index: usize,
}

impl Spinner {
    pub fn current(&self) -> char {
        SPINNER_FRAMES[self.index]
    }

    pub fn advance(&mut self) {
        self.index = (self.index + 1) % SPINNER_FRAMES.len();
    }
}

/// Polling state for the status line loop.
#[derive(Debug, Clone)]
pub struct Monitor {
    interval: MillisDurationU64,
    last_poll: Option<Instant>,
    spinner: Spinner,
}

impl Default for Monitor {
    /// Poll four times a second.
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

impl Monitor {
    pub const DEFAULT_INTERVAL: MillisDurationU64 = MillisDurationU64::millis(250);

    pub fn new(interval: MillisDurationU64) -> Self {
        Self {
            interval,
            last_poll: None,
            spinner: Spinner::default(),
        }
    }

    /// Whether at least one interval has passed since the last poll.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_poll {
            None => true,
            Some(last) => now
                .checked_duration_since(last)
                .is_some_and(|elapsed| elapsed >= self.interval),
        }
    }

    /// Query the display if a poll is due, otherwise do nothing.
    pub fn poll<S: embedded_io::Read + embedded_io::Write, const L: usize>(
        &mut self,
        psu: &mut Bk1900b<S, L>,
        now: Instant,
    ) -> Result<Option<DisplayReading>, S::Error> {
        if !self.is_due(now) {
            return Ok(None);
        }
        self.last_poll = Some(now);
        psu.get_display().map(Some)
    }

    /// Format `reading` as a status line and advance the busy indicator.
    pub fn render(
        &mut self,
        reading: &DisplayReading,
    ) -> core::result::Result<StatusLine, core::fmt::Error> {
        let (cv, cc) = match reading.mode {
            SupplyMode::ConstantVoltage => (ACTIVE, INACTIVE),
            SupplyMode::ConstantCurrent => (INACTIVE, ACTIVE),
        };
        let mut line = StatusLine::new();
        write!(
            line,
            "{} Voltage: {:5.2}V Current: {:5.2}A CV:{cv} CC:{cc}\r",
            self.spinner.current(),
            reading.voltage,
            reading.current,
        )?;
        self.spinner.advance();
        Ok(line)
    }
}
