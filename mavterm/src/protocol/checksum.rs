//! MAVLink frame checksum.
//!
//! MAVLink uses the X.25 CRC (polynomial `0x1021` processed in reflected form, initial value
//! `0xFFFF`, no final XOR), known in the CRC catalogue as `CRC-16/MCRF4XX`. The checksum covers
//! every header byte after the start marker, the payload, and one message-specific
//! [`CrcExtra`] byte that is never transmitted.

use std::fmt::{Debug, Formatter};

use crc::{Crc, Digest, CRC_16_MCRF4XX};

use crate::protocol::{Checksum, CrcExtra};

static MAVLINK_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_MCRF4XX);

/// Running MAVLink checksum.
///
/// The accumulator is a plain value: every operation consumes it and returns the updated one, so
/// there is no state beyond what the caller holds.
///
/// ```rust
/// use mavterm::protocol::RunningChecksum;
///
/// let checksum = RunningChecksum::seed()
///     .extend(b"123456789")
///     .finalize();
///
/// assert_eq!(checksum, 0x6F91);
/// ```
#[derive(Clone)]
pub struct RunningChecksum {
    digest: Digest<'static, u16>,
}

impl RunningChecksum {
    /// Creates an accumulator in its initial state.
    pub fn seed() -> Self {
        Self {
            digest: MAVLINK_CRC.digest(),
        }
    }

    /// Folds a single byte into the checksum.
    #[inline]
    pub fn update(mut self, byte: u8) -> Self {
        self.digest.update(&[byte]);
        self
    }

    /// Folds a sequence of bytes into the checksum.
    #[inline]
    pub fn extend(mut self, bytes: &[u8]) -> Self {
        self.digest.update(bytes);
        self
    }

    /// Folds the message-specific [`CrcExtra`] byte into the checksum.
    ///
    /// This should be the last byte accumulated before [`RunningChecksum::finalize`].
    #[inline]
    pub fn extra(self, crc_extra: CrcExtra) -> Self {
        self.update(crc_extra)
    }

    /// Returns the checksum value accumulated so far.
    pub fn finalize(self) -> Checksum {
        self.digest.finalize()
    }

    /// Peeks at the current value without consuming the accumulator.
    pub fn value(&self) -> Checksum {
        self.clone().finalize()
    }
}

impl Default for RunningChecksum {
    fn default() -> Self {
        Self::seed()
    }
}

impl Debug for RunningChecksum {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunningChecksum")
            .field("value", &format_args!("{:#06x}", self.value()))
            .finish()
    }
}

/// Calculates a frame checksum over `header` (without the start marker), `payload` and
/// `crc_extra` in one go.
pub fn frame_checksum(header: &[u8], payload: &[u8], crc_extra: CrcExtra) -> Checksum {
    RunningChecksum::seed()
        .extend(header)
        .extend(payload)
        .extra(crc_extra)
        .finalize()
}

#[cfg(test)]
mod checksum_tests {
    use super::*;

    #[test]
    fn seed_is_initial_value() {
        assert_eq!(RunningChecksum::seed().finalize(), 0xFFFF);
    }

    #[test]
    fn catalogue_check_value() {
        let checksum = b"123456789"
            .iter()
            .fold(RunningChecksum::seed(), |acc, &byte| acc.update(byte));

        assert_eq!(checksum.finalize(), 0x6F91);
    }

    #[test]
    fn byte_by_byte_matches_bulk() {
        let bytes = [9u8, 0, 1, 1, 0, 1, 2, 3, 4];
        let bulk = RunningChecksum::seed().extend(&bytes).extra(50).finalize();
        let single = bytes
            .iter()
            .fold(RunningChecksum::seed(), |acc, &byte| acc.update(byte))
            .extra(50)
            .finalize();

        assert_eq!(bulk, single);
    }

    #[test]
    fn crc_extra_changes_checksum() {
        let header = [0u8, 0, 1, 1, 0];
        assert_ne!(
            frame_checksum(&header, &[], 50),
            frame_checksum(&header, &[], 51)
        );
    }

    #[test]
    fn value_does_not_consume() {
        let acc = RunningChecksum::seed().update(0x42);
        let peeked = acc.value();
        assert_eq!(peeked, acc.finalize());
    }
}
