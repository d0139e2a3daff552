use super::{check_key_len, check_modulus, IndexScheme};
use crate::Result;

use std::fmt;

/// An index on a single unsigned byte, ordered naturally.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct IndexUint8(pub u8);

impl IndexUint8 {
    pub const KEY_LEN: usize = 1;

    #[inline]
    pub fn to_bytes(&self) -> [u8; Self::KEY_LEN] {
        [self.0]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_key_len(IndexScheme::Uint8, bytes)?;

        Ok(Self(bytes[0]))
    }

    /// Returns an integer in `[0, n)`.
    pub fn hash(&self, n: usize) -> Result<usize> {
        check_modulus(n)?;

        Ok(self.0 as usize % n)
    }

    pub fn min(&self, other: &Self) -> (Self, bool) {
        if other.0 < self.0 {
            (*other, true)
        } else {
            (*self, false)
        }
    }

    pub fn max(&self, other: &Self) -> (Self, bool) {
        if other.0 > self.0 {
            (*other, true)
        } else {
            (*self, false)
        }
    }
}

impl fmt::Display for IndexUint8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
