//! Construction-time configuration for an AMT21 encoder.

use embassy_time::Duration;

use crate::checksum::PAYLOAD_MASK;
use crate::commands::{
    DEFAULT_NODE_ADDRESS, OPCODE_EXTENDED, OPCODE_MASK, OPCODE_READ_POSITION, OPCODE_READ_TURNS,
};

/// RS-485 node address of an encoder.
///
/// The two low bits of the address byte carry the opcode, so only addresses
/// with both low bits clear are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeAddress(u8);

impl NodeAddress {
    /// Factory default address (`0x54`).
    pub const DEFAULT: Self = Self(DEFAULT_NODE_ADDRESS);

    /// Returns `None` if either of the two low (opcode) bits is set.
    pub const fn new(address: u8) -> Option<Self> {
        if address & OPCODE_MASK == 0 {
            Some(Self(address))
        } else {
            None
        }
    }

    /// The raw address byte.
    pub const fn get(self) -> u8 {
        self.0
    }

    pub(crate) const fn read_position(self) -> u8 {
        self.0 | OPCODE_READ_POSITION
    }

    pub(crate) const fn read_turns(self) -> u8 {
        self.0 | OPCODE_READ_TURNS
    }

    pub(crate) const fn extended(self) -> u8 {
        self.0 | OPCODE_EXTENDED
    }
}

impl Default for NodeAddress {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Number of bits per revolution, as given by the encoder part number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// 4096 positions per revolution.
    #[default]
    Bits12,
    /// 16384 positions per revolution.
    Bits14,
}

impl Resolution {
    /// Number of significant position bits.
    pub const fn bits(self) -> u32 {
        match self {
            Resolution::Bits12 => 12,
            Resolution::Bits14 => 14,
        }
    }

    /// Positions per full revolution.
    pub const fn ticks_per_turn(self) -> u16 {
        1 << self.bits()
    }

    /// Largest position value this resolution can report.
    pub const fn max_position(self) -> u16 {
        self.ticks_per_turn() - 1
    }
}

/// Where a reduced-resolution position sits inside the 14-bit payload.
///
/// For 14-bit parts both layouts are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PositionLayout {
    /// Position occupies the low `resolution` bits; upper payload bits are
    /// masked off.
    #[default]
    LowBits,
    /// Position is left-aligned in the payload and the unused low bits are
    /// shifted out. CUI documents this layout for 12-bit AMT21 parts.
    HighBits,
}

impl PositionLayout {
    /// Reduce a 14-bit payload to a position in `[0, 2^resolution - 1]`.
    pub const fn decode(self, payload: u16, resolution: Resolution) -> u16 {
        let payload = payload & PAYLOAD_MASK;
        match self {
            PositionLayout::LowBits => payload & resolution.max_position(),
            PositionLayout::HighBits => payload >> (14 - resolution.bits()),
        }
    }
}

/// Driver configuration, fixed at construction.
///
/// # Example
///
/// ```
/// use amt21_driver::{Config, NodeAddress, Resolution};
///
/// let config = Config::default()
///     .with_resolution(Resolution::Bits14)
///     .with_node_address(NodeAddress::new(0x58).unwrap());
/// assert_eq!(config.resolution.ticks_per_turn(), 16384);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Bus address of the encoder.
    pub node_address: NodeAddress,
    /// Bits per revolution.
    pub resolution: Resolution,
    /// Placement of the position inside the payload.
    pub position_layout: PositionLayout,
    /// How long to wait for a complete response before giving up.
    pub response_timeout: Duration,
    /// Time the encoder needs to come back after a reset or zero-set.
    pub reset_settle: Duration,
}

impl Config {
    /// Default response timeout.
    pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_millis(1);

    /// Default wait after reset or zero-set.
    pub const DEFAULT_RESET_SETTLE: Duration = Duration::from_millis(250);

    /// Configuration for `node_address` and `resolution` with default timing and layout.
    pub const fn new(node_address: NodeAddress, resolution: Resolution) -> Self {
        Self {
            node_address,
            resolution,
            position_layout: PositionLayout::LowBits,
            response_timeout: Self::DEFAULT_RESPONSE_TIMEOUT,
            reset_settle: Self::DEFAULT_RESET_SETTLE,
        }
    }

    /// Replace the node address.
    pub const fn with_node_address(mut self, node_address: NodeAddress) -> Self {
        self.node_address = node_address;
        self
    }

    /// Replace the resolution.
    pub const fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Replace the position layout.
    pub const fn with_position_layout(mut self, layout: PositionLayout) -> Self {
        self.position_layout = layout;
        self
    }

    /// Replace the response timeout.
    pub const fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Replace the wait after reset or zero-set. Zero disables the wait.
    pub const fn with_reset_settle(mut self, settle: Duration) -> Self {
        self.reset_settle = settle;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(NodeAddress::DEFAULT, Resolution::Bits12)
    }
}
