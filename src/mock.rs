//! Host-side test doubles for the serial channel, the transmit-enable pin and
//! the delay source.
//!
//! [`MockSerial`] models an encoder on the far end of the bus. Bytes queued
//! with [`MockSerial::queue_response`] only become readable after the driver
//! has written a command. Bytes pushed with [`MockSerial::push_stale`] are
//! readable immediately, like leftovers from an earlier exchange.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_io::{ErrorKind, ErrorType, Read, ReadReady, Write};

pub struct MockSerial {
    rx: VecDeque<u8>,
    responses: VecDeque<Vec<u8>>,
    tx: Vec<u8>,
    bytes_read: usize,
    tx_enable: Rc<Cell<bool>>,
    written_while_enabled: bool,
    flushed_while_enabled: bool,
    fail_writes: bool,
}

impl MockSerial {
    pub fn new() -> Self {
        Self {
            rx: VecDeque::new(),
            responses: VecDeque::new(),
            tx: Vec::new(),
            bytes_read: 0,
            tx_enable: Rc::new(Cell::new(false)),
            written_while_enabled: true,
            flushed_while_enabled: true,
            fail_writes: false,
        }
    }

    pub fn with_response(bytes: &[u8]) -> Self {
        let mut serial = Self::new();
        serial.queue_response(bytes);
        serial
    }

    /// Queue the reply to the next command written.
    pub fn queue_response(&mut self, bytes: &[u8]) {
        self.responses.push_back(bytes.to_vec());
    }

    /// Make bytes readable right away.
    pub fn push_stale(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub fn fail_writes(&mut self) {
        self.fail_writes = true;
    }

    /// A pin wired to this channel's transceiver.
    pub fn tx_enable_pin(&self) -> MockPin {
        MockPin {
            level: Rc::clone(&self.tx_enable),
            fail: false,
        }
    }

    pub fn written(&self) -> &[u8] {
        &self.tx
    }

    /// Bytes handed out by `read`, stale or not.
    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    /// Bytes still waiting in the receiver.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    pub fn written_while_enabled(&self) -> bool {
        self.written_while_enabled
    }

    pub fn flushed_while_enabled(&self) -> bool {
        self.flushed_while_enabled
    }
}

impl ErrorType for MockSerial {
    type Error = ErrorKind;
}

impl Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut n = 0;
        while n < buf.len() {
            match self.rx.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        self.bytes_read += n;
        Ok(n)
    }
}

impl ReadReady for MockSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.rx.is_empty())
    }
}

impl Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.fail_writes {
            return Err(ErrorKind::Other);
        }
        self.written_while_enabled &= self.tx_enable.get();
        self.tx.extend_from_slice(buf);
        if let Some(response) = self.responses.pop_front() {
            self.rx.extend(response);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushed_while_enabled &= self.tx_enable.get();
        Ok(())
    }
}

/// Transmit-enable pin sharing its level with a [`MockSerial`].
pub struct MockPin {
    level: Rc<Cell<bool>>,
    fail: bool,
}

impl MockPin {
    /// A pin whose every operation fails.
    pub fn broken() -> Self {
        Self {
            level: Rc::new(Cell::new(false)),
            fail: true,
        }
    }

    pub fn is_high(&self) -> bool {
        self.level.get()
    }
}

impl digital::ErrorType for MockPin {
    type Error = digital::ErrorKind;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(digital::ErrorKind::Other);
        }
        self.level.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(digital::ErrorKind::Other);
        }
        self.level.set(true);
        Ok(())
    }
}

/// Delay that returns immediately and records how long it was asked to wait.
#[derive(Default)]
pub struct MockDelay {
    total_ns: u64,
}

impl MockDelay {
    pub fn total_ns(&self) -> u64 {
        self.total_ns
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
