//! Error types for the AMT21 driver.

use core::fmt;

/// Errors that can occur while talking to the encoder.
///
/// Every error ends the request that produced it. The driver never retries
/// on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amt21Error<E> {
    /// Underlying serial channel error.
    Serial(E),

    /// The RS-485 transmit-enable line could not be driven.
    TxEnable,

    /// The response did not arrive completely within the response timeout.
    Timeout {
        /// Bytes received before giving up.
        received: usize,
    },

    /// The check bits of a response word did not match its payload.
    InvalidChecksum {
        /// The raw response word as received.
        raw: u16,
    },
}

// Allow ergonomic `?` propagation from raw serial errors.
impl<E> From<E> for Amt21Error<E> {
    fn from(error: E) -> Self {
        Amt21Error::Serial(error)
    }
}

impl<E: fmt::Debug> fmt::Display for Amt21Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Amt21Error::Serial(e) => write!(f, "serial error: {:?}", e),
            Amt21Error::TxEnable => write!(f, "failed to drive RS-485 transmit enable"),
            Amt21Error::Timeout { received } => {
                write!(f, "response timeout after {} byte(s)", received)
            }
            Amt21Error::InvalidChecksum { raw } => {
                write!(f, "checksum mismatch in response {:#06x}", raw)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Amt21Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Amt21Error::Serial(e) => defmt::write!(f, "Serial error: {}", e),
            Amt21Error::TxEnable => defmt::write!(f, "Transmit enable failed"),
            Amt21Error::Timeout { received } => {
                defmt::write!(f, "Response timeout after {} byte(s)", received)
            }
            Amt21Error::InvalidChecksum { raw } => {
                defmt::write!(f, "Checksum mismatch in {=u16:#x}", *raw)
            }
        }
    }
}
