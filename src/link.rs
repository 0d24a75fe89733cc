//! Half-duplex RS-485 link.
//!
//! Implements the byte-level primitives the AMT21 protocol needs on top of a
//! UART, a transmit-enable line and a delay source:
//!
//! 1. Discard stale bytes left in the receive path
//! 2. Assert transmit-enable, write the command, wait for the UART to drain,
//!    release transmit-enable
//! 3. Poll for the fixed-size response until it completes or the timeout
//!    elapses
//!
//! This module is crate-private. Consumers interact with [`Amt21`] in
//! `amt21.rs` instead.
//!
//! [`Amt21`]: crate::Amt21

use core::convert::Infallible;

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_io::{Read, ReadReady, Write};

use crate::commands::{MAX_DRAIN_BYTES, POLL_INTERVAL_US};
use crate::error::Amt21Error;

/// Stand-in transmit-enable pin for transceivers that switch direction in
/// hardware (auto-direction RS-485 modules, UARTs with a built-in DE output).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTxEnable;

impl ErrorType for NoTxEnable {
    type Error = Infallible;
}

impl OutputPin for NoTxEnable {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Request/response state of the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum LinkState {
    /// No outstanding request.
    Idle,
    /// A command was sent and the link is inside the exchange.
    AwaitingResponse,
}

/// Owns the UART, the transmit-enable pin and the delay source.
pub(crate) struct Rs485Link<S, DE, D> {
    serial: S,
    tx_enable: DE,
    delay: D,
    state: LinkState,
}

impl<S, DE, D> Rs485Link<S, DE, D>
where
    S: Read + Write + ReadReady,
    DE: OutputPin,
    D: DelayNs,
{
    pub fn new(serial: S, tx_enable: DE, delay: D) -> Self {
        Self {
            serial,
            tx_enable,
            delay,
            state: LinkState::Idle,
        }
    }

    pub fn release(self) -> (S, DE, D) {
        (self.serial, self.tx_enable, self.delay)
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    // -----------------------------------------------------------------------
    // Exchanges
    // -----------------------------------------------------------------------

    /// Put the transceiver into receive mode and empty the receive path.
    pub fn reset_line(&mut self) -> Result<(), Amt21Error<S::Error>> {
        self.state = LinkState::Idle;
        self.release_bus()?;
        self.drain()?;
        Ok(())
    }

    /// Send a command and read a fixed-size response into `response`.
    ///
    /// The link returns to [`LinkState::Idle`] whatever the outcome.
    pub fn request(
        &mut self,
        command: &[u8],
        response: &mut [u8],
        timeout: Duration,
    ) -> Result<(), Amt21Error<S::Error>> {
        self.drain()?;
        self.state = LinkState::AwaitingResponse;

        let result = self
            .send(command)
            .and_then(|()| self.receive(response, timeout));

        self.state = LinkState::Idle;
        result
    }

    /// Send a command that has no response.
    pub fn command(&mut self, command: &[u8]) -> Result<(), Amt21Error<S::Error>> {
        self.state = LinkState::AwaitingResponse;
        let result = self.send(command);
        self.state = LinkState::Idle;
        result
    }

    /// Block for `duration` using the delay source.
    pub fn settle(&mut self, duration: Duration) {
        let us = u32::try_from(duration.as_micros()).unwrap_or(u32::MAX);
        if us > 0 {
            self.delay.delay_us(us);
        }
    }

    // -----------------------------------------------------------------------
    // Primitives
    // -----------------------------------------------------------------------

    /// Read and discard whatever is already waiting in the receiver.
    ///
    /// Returns the number of bytes discarded. Stops after
    /// [`MAX_DRAIN_BYTES`] so a babbling bus cannot stall the caller.
    fn drain(&mut self) -> Result<usize, Amt21Error<S::Error>> {
        let mut scratch = [0u8; 8];
        let mut discarded = 0;

        while discarded < MAX_DRAIN_BYTES && self.serial.read_ready()? {
            let n = self.serial.read(&mut scratch)?;
            if n == 0 {
                break;
            }
            discarded += n;
        }

        #[cfg(feature = "defmt")]
        if discarded > 0 {
            defmt::debug!("AMT21: discarded {} stale byte(s)", discarded);
        }

        Ok(discarded)
    }

    /// Drive the bus for the duration of one command.
    ///
    /// Transmit-enable is released even when the write fails, so a UART
    /// error never leaves the transceiver holding the bus.
    fn send(&mut self, bytes: &[u8]) -> Result<(), Amt21Error<S::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("AMT21 tx: {=[u8]:#x}", bytes);

        self.tx_enable
            .set_high()
            .map_err(|_| Amt21Error::TxEnable)?;

        // `flush` blocks until the last stop bit has left the shifter, so the
        // turnaround below cannot clip the final byte.
        let written = self
            .serial
            .write_all(bytes)
            .and_then(|()| self.serial.flush())
            .map_err(Amt21Error::Serial);

        let released = self.release_bus();
        written.and(released)
    }

    /// Poll until `buf` is full or `timeout` has elapsed.
    fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<(), Amt21Error<S::Error>> {
        let budget_us = timeout.as_micros();
        let mut waited_us: u64 = 0;
        let mut filled = 0;

        while filled < buf.len() {
            if self.serial.read_ready()? {
                let n = self.serial.read(&mut buf[filled..])?;
                if n > 0 {
                    filled += n;
                    continue;
                }
            }

            if waited_us >= budget_us {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "AMT21: response timeout ({} of {} bytes)",
                    filled,
                    buf.len()
                );
                return Err(Amt21Error::Timeout { received: filled });
            }

            self.delay.delay_us(POLL_INTERVAL_US);
            waited_us += u64::from(POLL_INTERVAL_US);
        }

        Ok(())
    }

    fn release_bus(&mut self) -> Result<(), Amt21Error<S::Error>> {
        self.tx_enable.set_low().map_err(|_| Amt21Error::TxEnable)
    }
}
