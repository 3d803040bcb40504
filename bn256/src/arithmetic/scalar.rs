//! Scalar recoding for point multiplication.
//!
//! The core needs no scalar-field arithmetic, only the fixed-width window
//! decomposition consumed by the constant-time ladder, so scalars are plain
//! 256-bit big-endian integers.

use crate::{Error, Result};
use core::fmt::{self, Debug};
use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq};

/// A 256-bit multiplication scalar, big-endian.
///
/// Scalars are *not* reduced modulo the group order; `[k]P` is defined for
/// any k ≥ 0.
#[derive(Clone, Copy, Default, Eq, PartialEq)]
pub struct Scalar([u8; 32]);

impl Scalar {
    /// The scalar 0.
    pub const ZERO: Self = Self([0; 32]);

    /// The group order n of G1 and G2.
    pub const ORDER: Self = Self([
        0xb6, 0x40, 0x00, 0x00, 0x02, 0xa3, 0xa6, 0xf1, 0xd6, 0x03, 0xab, 0x4f, 0xf5, 0x8e,
        0xc7, 0x44, 0x49, 0xf2, 0x93, 0x4b, 0x18, 0xea, 0x8b, 0xee, 0xe5, 0x6e, 0xe1, 0x9c,
        0xd6, 0x9e, 0xcf, 0x25,
    ]);

    /// Creates a scalar from its 32-byte big-endian encoding.
    pub const fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Creates a scalar from a big-endian byte slice of at most 32 bytes.
    /// The empty slice is rejected with [`Error::InvalidScalar`]; longer
    /// inputs with [`Error::MalformedInput`].
    pub fn from_be_slice(slice: &[u8]) -> Result<Self> {
        if slice.is_empty() {
            return Err(Error::InvalidScalar);
        }
        if slice.len() > 32 {
            return Err(Error::MalformedInput);
        }
        let mut bytes = [0u8; 32];
        bytes[32 - slice.len()..].copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Creates a scalar from a machine integer.
    pub const fn from_u64(k: u64) -> Self {
        let mut bytes = [0u8; 32];
        let be = k.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[24 + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Returns the 32-byte big-endian encoding.
    pub const fn to_be_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Determine if this scalar is zero.
    pub fn is_zero(&self) -> Choice {
        self.0.ct_eq(&[0u8; 32])
    }

    /// Returns a uniformly random 256-bit scalar.
    pub fn random(rng: &mut (impl CryptoRng + RngCore)) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// The 64 4-bit windows of the scalar, most significant first.
    pub(crate) fn nibbles(&self) -> impl Iterator<Item = u8> + '_ {
        (0..64).map(move |i| {
            let byte = self.0[i / 2];
            if i % 2 == 0 {
                byte >> 4
            } else {
                byte & 0xf
            }
        })
    }
}

impl Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar(0x")?;
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

impl From<u64> for Scalar {
    fn from(k: u64) -> Self {
        Self::from_u64(k)
    }
}
