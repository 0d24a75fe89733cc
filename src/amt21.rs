//! High-level interface for CUI AMT21 series absolute encoders.
//!
//! [`Amt21`] wraps the crate-private RS-485 link with command encoding,
//! check-bit validation and position/turn decoding. The encoder variant is a
//! type parameter: [`SingleTurn`] parts expose
//! [`set_zero_position`](Amt21::set_zero_position), [`MultiTurn`] parts
//! expose [`get_turns`](Amt21::get_turns). Calling the wrong one does not
//! compile.

use core::marker::PhantomData;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_io::{Read, ReadReady, Write};

use crate::checksum;
use crate::commands::{EXT_RESET, EXT_SET_ZERO, RESPONSE_LEN};
use crate::config::Config;
use crate::error::Amt21Error;
use crate::link::{LinkState, Rs485Link};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::SingleTurn {}
    impl Sealed for super::MultiTurn {}
}

/// Encoder variant marker.
pub trait Variant: sealed::Sealed {
    /// Whether the part keeps a turn counter.
    const MULTI_TURN: bool;
}

/// Marker for single-turn parts (zero-set supported, no turn counter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleTurn;

/// Marker for multi-turn parts (turn counter, no zero-set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiTurn;

impl Variant for SingleTurn {
    const MULTI_TURN: bool = false;
}

impl Variant for MultiTurn {
    const MULTI_TURN: bool = true;
}

/// Blocking driver for one AMT21 encoder on an RS-485 link.
///
/// Takes ownership of the UART, the transmit-enable (DE) pin and a delay
/// source. Every operation sends one command and, for reads, blocks until
/// the 2-byte reply arrives or the configured response timeout elapses.
/// Nothing is retried: on error the caller decides whether to reissue.
///
/// # Example
///
/// ```no_run
/// use amt21_driver::{Amt21, Config};
///
/// # fn example<S, P, D>(uart: S, de_pin: P, delay: D)
/// # where
/// #     S: embedded_io::Read + embedded_io::Write + embedded_io::ReadReady,
/// #     P: embedded_hal::digital::OutputPin,
/// #     D: embedded_hal::delay::DelayNs,
/// # {
/// let mut encoder = Amt21::single_turn(uart, de_pin, delay, Config::default());
/// encoder.init().ok();
///
/// match encoder.get_position() {
///     Ok(position) => { /* 0..=4095 */ }
///     Err(_) => { /* checksum mismatch or timeout */ }
/// }
/// # }
/// ```
pub struct Amt21<S, DE, D, V> {
    link: Rs485Link<S, DE, D>,
    config: Config,
    _variant: PhantomData<V>,
}

/// Driver for a single-turn AMT21 part.
pub type Amt21SingleTurn<S, DE, D> = Amt21<S, DE, D, SingleTurn>;

/// Driver for a multi-turn AMT21 part.
pub type Amt21MultiTurn<S, DE, D> = Amt21<S, DE, D, MultiTurn>;

impl<S, DE, D, V> Amt21<S, DE, D, V>
where
    S: Read + Write + ReadReady,
    DE: OutputPin,
    D: DelayNs,
    V: Variant,
{
    fn with_parts(serial: S, tx_enable: DE, delay: D, config: Config) -> Self {
        Self {
            link: Rs485Link::new(serial, tx_enable, delay),
            config,
            _variant: PhantomData,
        }
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    /// Prepare the link for the first request.
    ///
    /// Drives transmit-enable low (receive mode) and discards anything
    /// already sitting in the receive path. The encoder itself is not
    /// contacted.
    ///
    /// # Errors
    /// Only propagates HAL failures: [`Amt21Error::TxEnable`] or
    /// [`Amt21Error::Serial`].
    pub fn init(&mut self) -> Result<(), Amt21Error<S::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "AMT21: init node {=u8:#x}, {} bits, multi-turn = {}",
            self.config.node_address.get(),
            self.config.resolution.bits(),
            V::MULTI_TURN
        );

        self.link.reset_line()
    }

    // -----------------------------------------------------------------------
    // Read operations
    // -----------------------------------------------------------------------

    /// Read the absolute position within one revolution.
    ///
    /// The result is always within `[0, ticks_per_turn() - 1]`.
    ///
    /// # Errors
    /// * [`Amt21Error::InvalidChecksum`] if the check bits do not match
    /// * [`Amt21Error::Timeout`] if fewer than 2 bytes arrive in time
    /// * [`Amt21Error::Serial`] / [`Amt21Error::TxEnable`] on HAL failure
    pub fn get_position(&mut self) -> Result<u16, Amt21Error<S::Error>> {
        let word = self.read_word(self.config.node_address.read_position())?;
        Ok(self
            .config
            .position_layout
            .decode(checksum::payload(word), self.config.resolution))
    }

    // -----------------------------------------------------------------------
    // Write operations
    // -----------------------------------------------------------------------

    /// Reboot the encoder.
    ///
    /// No reply is read. After sending, blocks for
    /// [`Config::reset_settle`] while the encoder restarts.
    pub fn reset(&mut self) -> Result<(), Amt21Error<S::Error>> {
        self.extended_command(EXT_RESET)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Positions per revolution for the configured resolution.
    pub fn ticks_per_turn(&self) -> u16 {
        self.config.resolution.ticks_per_turn()
    }

    /// The configuration this driver was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `true` when no request is outstanding.
    pub fn is_idle(&self) -> bool {
        self.link.state() == LinkState::Idle
    }

    /// Consume the driver and hand back the UART, DE pin and delay.
    pub fn release(self) -> (S, DE, D) {
        self.link.release()
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Send a one-byte read command and return the validated response word.
    fn read_word(&mut self, command: u8) -> Result<u16, Amt21Error<S::Error>> {
        let mut buf = [0u8; RESPONSE_LEN];
        self.link
            .request(&[command], &mut buf, self.config.response_timeout)?;

        // The encoder sends the low byte first.
        let word = u16::from_le_bytes(buf);
        if checksum::verify(word) {
            Ok(word)
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("AMT21: checksum mismatch in {=u16:#x}", word);
            Err(Amt21Error::InvalidChecksum { raw: word })
        }
    }

    fn extended_command(&mut self, code: u8) -> Result<(), Amt21Error<S::Error>> {
        self.link
            .command(&[self.config.node_address.extended(), code])?;
        self.link.settle(self.config.reset_settle);
        Ok(())
    }
}

impl<S, DE, D> Amt21<S, DE, D, SingleTurn>
where
    S: Read + Write + ReadReady,
    DE: OutputPin,
    D: DelayNs,
{
    /// Create a driver for a single-turn part. No I/O is performed; call
    /// [`init()`](Self::init) before the first request.
    pub fn single_turn(serial: S, tx_enable: DE, delay: D, config: Config) -> Self {
        Self::with_parts(serial, tx_enable, delay, config)
    }

    /// Make the current shaft angle the new zero position.
    ///
    /// No reply is read. The encoder restarts to apply the new offset, so
    /// this blocks for [`Config::reset_settle`] after sending.
    pub fn set_zero_position(&mut self) -> Result<(), Amt21Error<S::Error>> {
        self.extended_command(EXT_SET_ZERO)
    }
}

impl<S, DE, D> Amt21<S, DE, D, MultiTurn>
where
    S: Read + Write + ReadReady,
    DE: OutputPin,
    D: DelayNs,
{
    /// Create a driver for a multi-turn part. No I/O is performed; call
    /// [`init()`](Self::init) before the first request.
    pub fn multi_turn(serial: S, tx_enable: DE, delay: D, config: Config) -> Self {
        Self::with_parts(serial, tx_enable, delay, config)
    }

    /// Read the signed turn counter.
    ///
    /// The counter is a 14-bit two's-complement value protected by the same
    /// check bits as the position, so it ranges over `[-8192, 8191]`.
    ///
    /// # Errors
    /// Same as [`get_position()`](Self::get_position).
    pub fn get_turns(&mut self) -> Result<i16, Amt21Error<S::Error>> {
        let word = self.read_word(self.config.node_address.read_turns())?;
        Ok(checksum::sign_extend_turns(word))
    }

    /// Read turns and position and combine them into a single tick count:
    /// `turns * ticks_per_turn + position`.
    ///
    /// The two values come from separate requests, so a shaft crossing zero
    /// between them can skew the result by one revolution.
    pub fn get_absolute_position(&mut self) -> Result<i32, Amt21Error<S::Error>> {
        let turns = self.get_turns()?;
        let position = self.get_position()?;
        Ok(i32::from(turns) * i32::from(self.ticks_per_turn()) + i32::from(position))
    }
}
