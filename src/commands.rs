//! AMT21 command constants.
//!
//! Every request starts with a single command byte formed by OR-ing an
//! opcode into the two low bits of the encoder's node address:
//! `[NODE_ADDRESS | OPCODE]`.
//!
//! Extended commands are two bytes long: the extended-command byte followed
//! by the command code, `[NODE_ADDRESS | OPCODE_EXTENDED, EXT_*]`.

// ---------------------------------------------------------------------------
// Opcodes (low two bits of the command byte)
// ---------------------------------------------------------------------------

/// Read the absolute position. The encoder answers with 2 bytes.
pub const OPCODE_READ_POSITION: u8 = 0x00;

/// Read the turn counter (multi-turn parts only). The encoder answers with
/// 2 bytes.
pub const OPCODE_READ_TURNS: u8 = 0x01;

/// Extended command prefix. The following byte selects the command.
pub const OPCODE_EXTENDED: u8 = 0x02;

/// Bits of the command byte reserved for the opcode.
pub const OPCODE_MASK: u8 = 0x03;

// ---------------------------------------------------------------------------
// Extended command codes
// ---------------------------------------------------------------------------

/// Reboot the encoder. No response.
pub const EXT_RESET: u8 = 0x75;

/// Store the current position as zero (single-turn parts only). No response.
pub const EXT_SET_ZERO: u8 = 0x5E;

// ---------------------------------------------------------------------------
// Protocol constants
// ---------------------------------------------------------------------------

/// Default RS-485 node address of an AMT21 encoder.
pub const DEFAULT_NODE_ADDRESS: u8 = 0x54;

/// Number of bytes in every read response.
pub const RESPONSE_LEN: usize = 2;

/// Interval between two receiver polls while waiting for a response.
pub const POLL_INTERVAL_US: u32 = 1;

/// Upper bound on stale bytes discarded before a request.
pub const MAX_DRAIN_BYTES: usize = 64;
