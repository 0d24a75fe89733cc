//! Check-bit handling for AMT21 response words.
//!
//! Every 16-bit response word carries two check bits above a 14-bit payload:
//!
//! ```text
//!  15   14   13 ............................. 0
//! [K1] [K0] [b13 b12 b11 ... b2 b1 b0         ]
//! ```
//!
//! `K1` gives odd parity over the odd payload bits (b13, b11, ..., b1) and `K0`
//! gives odd parity over the even payload bits (b12, b10, ..., b0). Each
//! payload bit belongs to exactly one group, so flipping any single payload
//! bit breaks exactly one of the two checks.

/// Mask of the 14 payload bits.
pub const PAYLOAD_MASK: u16 = 0x3FFF;

/// Mask of the two check bits.
pub const CHECK_MASK: u16 = 0xC000;

/// Payload bits covered by `K1` (b13, b11, ..., b1).
const ODD_BITS: u16 = 0x2AAA;

/// Payload bits covered by `K0` (b12, b10, ..., b0).
const EVEN_BITS: u16 = 0x1555;

/// Compute the two check bits for a payload, already shifted into bits 15
/// and 14. Bits of `payload` above bit 13 are ignored.
#[inline]
pub const fn parity_bits(payload: u16) -> u16 {
    let payload = payload & PAYLOAD_MASK;
    let k1 = ((payload & ODD_BITS).count_ones() & 1) ^ 1;
    let k0 = ((payload & EVEN_BITS).count_ones() & 1) ^ 1;
    ((k1 as u16) << 15) | ((k0 as u16) << 14)
}

/// Build a complete response word from a payload, as the encoder would.
#[inline]
pub const fn with_checksum(payload: u16) -> u16 {
    (payload & PAYLOAD_MASK) | parity_bits(payload)
}

/// Returns `true` when the check bits of `word` match its payload.
#[inline]
pub const fn verify(word: u16) -> bool {
    word & CHECK_MASK == parity_bits(word)
}

/// Strip the check bits from a response word.
#[inline]
pub const fn payload(word: u16) -> u16 {
    word & PAYLOAD_MASK
}

/// Interpret the payload of a turn-counter word as a 14-bit two's-complement
/// value.
///
/// The check bits are discarded first, so any word whose payload is all ones
/// (including the raw value `0xFFFF`) decodes to `-1`.
#[inline]
pub const fn sign_extend_turns(word: u16) -> i16 {
    ((payload(word) << 2) as i16) >> 2
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Known vectors ───────────────────────────────────────────────

    #[test]
    fn zero_payload_sets_both_check_bits() {
        // Both groups have zero ones, so odd parity needs both bits set.
        assert_eq!(parity_bits(0), 0xC000);
        assert!(verify(0xC000));
        assert!(!verify(0x0000));
    }

    #[test]
    fn all_ones_payload_clears_both_check_bits() {
        // Seven ones in each group already give odd parity.
        assert_eq!(with_checksum(0x3FFF), 0x3FFF);
        assert!(!verify(0xFFFF));
    }

    #[test]
    fn known_payload_0abc() {
        // 0x0ABC = 0b00_1010_1011_1100
        // odd bits set:  b11, b9, b7, b5, b3 -> 5 ones -> K1 = 0
        // even bits set: b4, b2              -> 2 ones -> K0 = 1
        assert_eq!(parity_bits(0x0ABC), 0x4000);
        assert_eq!(with_checksum(0x0ABC), 0x4ABC);
    }

    #[test]
    fn parity_ignores_bits_above_payload() {
        assert_eq!(parity_bits(0xC123), parity_bits(0x0123));
    }

    // ── Properties over the whole payload space ─────────────────────

    #[test]
    fn checksummed_payload_always_decodes_to_itself() {
        for p in 0..=PAYLOAD_MASK {
            let word = with_checksum(p);
            assert!(verify(word), "payload {:#06x} rejected", p);
            assert_eq!(payload(word), p);
        }
    }

    #[test]
    fn single_payload_bit_flip_is_detected() {
        for p in 0..=PAYLOAD_MASK {
            let word = with_checksum(p);
            for bit in 0..14 {
                let corrupted = word ^ (1 << bit);
                assert!(
                    !verify(corrupted),
                    "flip of bit {} in payload {:#06x} went undetected",
                    bit,
                    p
                );
            }
        }
    }

    #[test]
    fn single_check_bit_flip_is_detected() {
        for p in 0..=PAYLOAD_MASK {
            let word = with_checksum(p);
            assert!(!verify(word ^ 0x8000));
            assert!(!verify(word ^ 0x4000));
        }
    }

    // ── Turn sign extension ─────────────────────────────────────────

    #[test]
    fn sign_extend_negative_one() {
        assert_eq!(sign_extend_turns(0xFFFF), -1);
        assert_eq!(sign_extend_turns(0x3FFF), -1);
    }

    #[test]
    fn sign_extend_range_limits() {
        assert_eq!(sign_extend_turns(0x1FFF), 8191);
        assert_eq!(sign_extend_turns(0x2000), -8192);
        assert_eq!(sign_extend_turns(with_checksum(0x0005)), 5);
    }
}
