//! Blocking driver for CUI AMT21 series absolute rotary encoders.
//!
//! The AMT21 talks RS-485. This crate drives it through any UART that
//! implements the blocking [`embedded-io`] traits, plus an [`embedded-hal`]
//! output pin for the transceiver's driver-enable line and a delay source
//! for timeouts.
//!
//! # Architecture
//!
//! The crate is split into two layers:
//!
//! - **`link`** (crate-private): half-duplex RS-485 primitives. Drains stale
//!   bytes, toggles transmit-enable around each command and receives
//!   fixed-size replies with a timeout.
//! - **[`Amt21`]** (public): command encoding, check-bit validation and
//!   position/turn decoding.
//!
//! # Quick start
//!
//! ```ignore
//! use amt21_driver::{Amt21, Config, Resolution};
//!
//! let config = Config::default().with_resolution(Resolution::Bits14);
//! let mut encoder = Amt21::single_turn(uart, de_pin, delay, config);
//! encoder.init()?;
//!
//! let position = encoder.get_position()?;
//! ```
//!
//! # Features
//!
//! - **`defmt`**: `defmt::Format` implementations on public types and
//!   driver-level trace/warn logging.
//!
//! [`embedded-io`]: embedded_io
//! [`embedded-hal`]: embedded_hal

#![cfg_attr(not(test), no_std)]

pub use amt21::{Amt21, Amt21MultiTurn, Amt21SingleTurn, MultiTurn, SingleTurn, Variant};
pub use config::{Config, NodeAddress, PositionLayout, Resolution};
pub use error::Amt21Error;
pub use link::NoTxEnable;

mod amt21;
pub mod checksum;
pub mod commands;
mod config;
mod error;
mod link;

#[cfg(test)]
mod mock;
