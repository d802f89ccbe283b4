//! # bgn-she: somewhat-homomorphic BGN encryption on prime-order pairing groups
//!
//! This crate implements a Boneh–Goh–Nissim-style somewhat-homomorphic
//! encryption scheme, lifted from composite-order to prime-order pairing
//! groups via the Freeman transform. A ciphertext encrypts a small signed
//! integer; over ciphertexts the scheme supports
//!
//! - unlimited additions of level-1 ciphertexts (in G1, G2 or the pairing
//!   target GT),
//! - **exactly one** multiplication of a G1 ciphertext by a G2 ciphertext,
//!   yielding a level-2 ciphertext in GT,
//! - unlimited additions of level-2 ciphertexts,
//! - plaintext scaling, re-randomization, and non-interactive
//!   zero-knowledge proofs that a ciphertext encrypts a bit.
//!
//! Decryption reduces a ciphertext to a multiple of a secret generator and
//! recovers the integer by baby-step/giant-step discrete log against a
//! precomputed table; the decodable range is configurable.
//!
//! ## Architecture
//!
//! - **[`backend`]**: the trait bundle `(Fr, G1, G2, GT, e)` the scheme is
//!   parametric over, with arkworks backends for BLS12-381 and BN254 behind
//!   feature flags. The pairing is consumed in split form (Miller loop plus
//!   final exponentiation) so level-2 ciphertexts can defer the expensive
//!   half.
//! - **[`she`]**: the scheme itself — key material, encryption, the
//!   homomorphic operations, conversion/re-randomization, decryption, and
//!   the Fiat–Shamir proofs.
//! - **[`dlp`]**: the BSGS tables that make decryption tractable.
//! - **[`config`]**: curve selection and table tuning, validated into an
//!   explicit [`Params`] context object (no process-wide globals).
//! - **[`errors`]**: backend- and scheme-level error types.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! # #[cfg(feature = "bls12_381")]
//! # fn main() -> Result<(), bgn_she::Error> {
//! use bgn_she::{Bls12_381Backend, CurveId, Params, SecretKey, SheConfig};
//! use rand::thread_rng;
//!
//! let config = SheConfig::new(CurveId::Bls12_381, 1 << 12).with_try_num(16);
//! let params = Params::<Bls12_381Backend>::setup(&config)?;
//!
//! let mut rng = thread_rng();
//! let mut sk = SecretKey::generate(&params, &mut rng)?;
//! sk.set_decode_range(params.hash_size, params.try_num)?;
//! let pk = sk.public_key(&params);
//!
//! // One multiplication, then additions.
//! let c1 = pk.encrypt_g1(12, &mut rng);
//! let c2 = pk.encrypt_g2(-9, &mut rng);
//! let product = c1.mul(&c2);
//! let doubled = product.add(&product)?;
//! assert_eq!(sk.decrypt_gt(&doubled)?, 2 * 12 * -9);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "bls12_381"))]
//! # fn main() {}
//! ```
//!
//! ## Feature flags
//!
//! - **`bls12_381`** (default): arkworks BLS12-381 backend
//! - **`bn254`**: arkworks BN254 backend
//!
//! ## Security notes
//!
//! - The scheme is semantically secure under the decisional subgroup
//!   assumptions of the Freeman transform; it is **not** CCA secure.
//! - Conversion into the target group is deterministic; re-randomize the
//!   result when unlinkability matters.
//! - All randomness is injected through [`rand_core::RngCore`] handles;
//!   use a CSPRNG in production.

pub mod backend;
mod codec;
pub mod config;
pub mod dlp;
pub mod errors;
pub mod she;

pub use config::{CurveId, SheConfig};
pub use errors::{BackendError, Error};
pub use she::{
    CipherText, CipherTextG1, CipherTextG2, CipherTextGT, Params, PrecomputedPublicKey, PublicKey,
    SecretKey, ZkpBin, ZkpEq,
};

#[cfg(feature = "bls12_381")]
pub use backend::Bls12_381Backend;
#[cfg(feature = "bn254")]
pub use backend::Bn254Backend;
