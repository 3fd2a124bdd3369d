//! Content fingerprints.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// CRC-32 (IEEE) of a raw configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub u32);

impl Fingerprint {
    pub fn of(content: &[u8]) -> Self {
        Self(crc32fast::hash(content))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for Fingerprint {
    fn from(crc: u32) -> Self {
        Self(crc)
    }
}

impl From<Fingerprint> for u32 {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Lock-free `Option<Fingerprint>`.
///
/// The upper half flags presence so a document whose CRC is zero is still
/// distinguishable from "never ingested".
#[derive(Debug, Default)]
pub(crate) struct FingerprintCell(AtomicU64);

const PRESENT: u64 = 1 << 32;

impl FingerprintCell {
    pub fn load(&self) -> Option<Fingerprint> {
        let raw = self.0.load(Ordering::Acquire);
        (raw & PRESENT != 0).then(|| Fingerprint(raw as u32))
    }

    pub fn store(&self, fp: Fingerprint) {
        self.0.store(PRESENT | u64::from(fp.0), Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_crc32_ieee() {
        // Standard check value for CRC-32/ISO-HDLC.
        assert_eq!(Fingerprint::of(b"123456789").value(), 0xCBF4_3926);
        assert_ne!(Fingerprint::of(b"k: 1"), Fingerprint::of(b"k: 2"));
        assert_eq!(Fingerprint(0xCBF4_3926).to_string(), "cbf43926");
    }

    #[test]
    fn test_cell_distinguishes_zero_from_empty() {
        let cell = FingerprintCell::default();
        assert_eq!(cell.load(), None);

        cell.store(Fingerprint(0));
        assert_eq!(cell.load(), Some(Fingerprint(0)));

        cell.store(Fingerprint(u32::MAX));
        assert_eq!(cell.load(), Some(Fingerprint(u32::MAX)));
    }
}
