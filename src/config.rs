//! Configuration types for the encryption scheme.
//!
//! This module provides the curve selector and the tuning knobs for the
//! baby-step/giant-step decryption tables. There is no process-wide state:
//! a validated [`SheConfig`] is turned into an explicit
//! [`Params`](crate::she::Params) context object that is passed to every
//! constructor that needs it.
//!
//! # Example
//!
//! ```rust
//! use bgn_she::{CurveId, SheConfig};
//!
//! // BLS12-381, decodable range ±(1 << 10) with no giant-step retries
//! let config = SheConfig::new(CurveId::Bls12_381, 1 << 10);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{BackendError, Error};

/// Supported pairing-friendly elliptic curves.
///
/// - **BLS12-381**: a 381-bit curve providing ~128 bits of security.
/// - **BN254**: a 254-bit curve providing ~100 bits of security; faster and
///   with smaller encodings.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CurveId {
    /// BN254 curve (~100-bit security)
    Bn254,
    /// BLS12-381 curve (~128-bit security, recommended)
    Bls12_381,
}

impl CurveId {
    /// Validates that the backend for this curve is compiled in.
    ///
    /// Backend support is controlled via Cargo features: `bls12_381`
    /// (default) and `bn254`.
    pub fn ensure_supported(&self) -> Result<(), BackendError> {
        match self {
            CurveId::Bls12_381 => {
                if cfg!(feature = "bls12_381") {
                    Ok(())
                } else {
                    Err(BackendError::UnsupportedFeature(
                        "compile with the `bls12_381` feature to use BLS12-381",
                    ))
                }
            }
            CurveId::Bn254 => {
                if cfg!(feature = "bn254") {
                    Ok(())
                } else {
                    Err(BackendError::UnsupportedFeature(
                        "compile with the `bn254` feature to use BN254",
                    ))
                }
            }
        }
    }
}

/// Scheme parameters: curve selection plus the two DLP tuning knobs.
///
/// `hash_size` is the number of baby steps kept per table and `try_num` the
/// number of giant-step retries during decryption. Together they bound the
/// decodable plaintext magnitude at `hash_size * (try_num + 1)`.
///
/// # Example
///
/// ```rust
/// use bgn_she::{CurveId, SheConfig};
///
/// let config = SheConfig::new(CurveId::Bls12_381, 1 << 12).with_try_num(16);
/// config.validate().expect("valid configuration");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SheConfig {
    /// The pairing-friendly curve to use.
    pub curve: CurveId,
    /// Number of baby steps per decryption table. Must be non-zero.
    pub hash_size: u32,
    /// Number of giant-step retries during decryption (0 disables the
    /// escape loop).
    pub try_num: u32,
}

impl SheConfig {
    /// Creates a configuration with the given curve and table size and no
    /// giant-step retries.
    pub fn new(curve: CurveId, hash_size: u32) -> Self {
        Self {
            curve,
            hash_size,
            try_num: 0,
        }
    }

    /// Sets the number of giant-step retries.
    pub fn with_try_num(mut self, try_num: u32) -> Self {
        self.try_num = try_num;
        self
    }

    /// Validates the configuration.
    ///
    /// Rejects a zero `hash_size` and curves whose backend feature is not
    /// compiled in.
    pub fn validate(&self) -> Result<(), Error> {
        self.curve.ensure_supported().map_err(Error::Backend)?;
        if self.hash_size == 0 {
            return Err(Error::RangeZero);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "bls12_381")]
    #[test]
    fn zero_hash_size_is_rejected() {
        let config = SheConfig::new(CurveId::Bls12_381, 0);
        assert!(matches!(config.validate(), Err(Error::RangeZero)));
    }

    #[cfg(all(feature = "bn254", not(feature = "bls12_381")))]
    #[test]
    fn zero_hash_size_is_rejected() {
        let config = SheConfig::new(CurveId::Bn254, 0);
        assert!(matches!(config.validate(), Err(Error::RangeZero)));
    }

    #[cfg(feature = "bls12_381")]
    #[test]
    fn default_curve_is_supported() {
        let config = SheConfig::new(CurveId::Bls12_381, 16);
        assert!(config.validate().is_ok());
    }
}
