//! Backend trait abstractions for the pairing groups.
//!
//! This module defines the trait bundle `(Fr, G1, G2, GT, e)` the scheme is
//! parametric over, so that multiple curve backends can provide a unified
//! interface. The scheme never touches curve internals directly; everything
//! it needs is expressed here.
//!
//! # Architecture
//!
//! - **[`FieldElement`]**: scalar field operations (random sampling,
//!   inversion, fixed-width little-endian encoding)
//! - **[`GroupPoint`]**: the additive source groups G1/G2 (group law, scalar
//!   multiplication, canonical fingerprint and parity for the BSGS tables,
//!   compressed serialization)
//! - **[`TargetElement`]**: the multiplicative pairing target GT, represented
//!   as an extension-field element so that values both before and after the
//!   final exponentiation can be carried
//! - **[`PairingBackend`]**: umbrella trait tying the groups together with
//!   the split pairing (`miller_loop` / `final_exp`), the prepared-G2
//!   Miller-loop cache, and deterministic hash-to-curve
//!
//! # Available backends
//!
//! - **[`Bls12_381Backend`]** (feature `bls12_381`, default): BLS12-381 via
//!   arkworks
//! - **[`Bn254Backend`]** (feature `bn254`): BN254 via arkworks
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "bls12_381")]
//! # {
//! use bgn_she::backend::{Bls12_381Backend, FieldElement, GroupPoint, PairingBackend};
//! use rand::thread_rng;
//!
//! type Fr = <Bls12_381Backend as PairingBackend>::Scalar;
//!
//! let mut rng = thread_rng();
//! let scalar = Fr::random(&mut rng);
//!
//! let p = Bls12_381Backend::hash_to_g1(b"0");
//! let q = Bls12_381Backend::hash_to_g2(b"0");
//! let gt = Bls12_381Backend::pairing(&p.mul_scalar(&scalar), &q).unwrap();
//! # let _ = gt;
//! # }
//! ```

use core::fmt::Debug;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

#[cfg(any(feature = "bls12_381", feature = "bn254"))]
use ark_ec::AffineRepr;
#[cfg(any(feature = "bls12_381", feature = "bn254"))]
use ark_ff::{BigInteger, PrimeField};
use rand_core::RngCore;
#[cfg(any(feature = "bls12_381", feature = "bn254"))]
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::config::CurveId;
use crate::errors::BackendError;

/// Scalar field (Fr) abstraction.
///
/// The full operator set is required so the scheme can write field
/// arithmetic naturally; encoding is a fixed-width canonical little-endian
/// byte string of [`SERIALIZED_LEN`](FieldElement::SERIALIZED_LEN) bytes.
pub trait FieldElement:
    Clone
    + Copy
    + PartialEq
    + Eq
    + Debug
    + Send
    + Sync
    + Zeroize
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
{
    /// Canonical encoding width in bytes.
    const SERIALIZED_LEN: usize;

    /// Returns the additive identity.
    fn zero() -> Self;

    /// Returns the multiplicative identity.
    fn one() -> Self;

    /// Checks for the additive identity.
    fn is_zero(&self) -> bool;

    /// Samples a uniform field element from the provided RNG.
    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self;

    /// Embeds a signed machine integer, reducing modulo the group order.
    fn from_i64(value: i64) -> Self;

    /// Reduces an arbitrary little-endian byte string modulo the group
    /// order. Used for hash-derived scalars.
    fn from_le_bytes_mod_order(bytes: &[u8]) -> Self;

    /// Computes the multiplicative inverse, `None` for zero.
    fn invert(&self) -> Option<Self>;

    /// Canonical little-endian encoding, exactly `SERIALIZED_LEN` bytes.
    fn to_bytes_le(&self) -> Vec<u8>;

    /// Decodes a canonical encoding, rejecting non-reduced values.
    fn from_bytes_le(bytes: &[u8]) -> Result<Self, BackendError>;
}

/// Source group (G1 or G2) abstraction.
///
/// Beyond the group law, the BSGS decryption tables need a reproducible
/// 32-bit [`fingerprint`](GroupPoint::fingerprint) of the canonical affine
/// x-coordinate, the [`parity`](GroupPoint::parity) of the canonical y
/// representative (to disambiguate a point from its negation), and affine-x
/// equality as the candidate filter.
pub trait GroupPoint<F: FieldElement>:
    Clone + Copy + PartialEq + Eq + Debug + Send + Sync + 'static
{
    /// Compressed encoding width in bytes.
    const SERIALIZED_LEN: usize;

    /// Returns the point at infinity.
    fn identity() -> Self;

    /// Checks for the point at infinity.
    fn is_identity(&self) -> bool;

    /// Point addition.
    fn add(&self, other: &Self) -> Self;

    /// Point subtraction.
    fn sub(&self, other: &Self) -> Self;

    /// Additive inverse.
    fn negate(&self) -> Self;

    /// Scalar multiplication.
    fn mul_scalar(&self, scalar: &F) -> Self;

    /// Scalar multiplication by a signed machine integer.
    fn mul_i64(&self, value: i64) -> Self {
        self.mul_scalar(&F::from_i64(value))
    }

    /// Low 32 bits of the low word of the canonical affine x-coordinate;
    /// 0 for the identity.
    fn fingerprint(&self) -> u32;

    /// Lowest bit of the canonical affine y-coordinate representative.
    fn parity(&self) -> bool;

    /// Equality of canonical affine x-coordinates (holds for `P` and `-P`).
    fn x_equals(&self, other: &Self) -> bool;

    /// Compressed encoding, exactly `SERIALIZED_LEN` bytes.
    fn to_bytes(&self) -> Vec<u8>;

    /// Decodes a compressed encoding, validating curve and subgroup
    /// membership.
    fn from_bytes(bytes: &[u8]) -> Result<Self, BackendError>;
}

/// Pairing target group (GT) abstraction.
///
/// Elements are extension-field values of the pairing target. Both raw
/// Miller-loop outputs (pre-final-exponentiation) and canonical subgroup
/// elements (post-final-exponentiation) are carried by this type; the
/// distinction is tracked by the ciphertext layer, not here.
pub trait TargetElement<F: FieldElement>:
    Clone + Copy + PartialEq + Eq + Debug + Send + Sync + 'static
{
    /// Encoding width in bytes.
    const SERIALIZED_LEN: usize;

    /// Returns the multiplicative identity.
    fn one() -> Self;

    /// Checks for the multiplicative identity.
    fn is_one(&self) -> bool;

    /// Multiplication in the extension field.
    fn mul(&self, other: &Self) -> Self;

    /// Unitary inversion (conjugation). Exact inverse for elements of the
    /// cyclotomic subgroup; for raw Miller-loop outputs it agrees with the
    /// inverse up to the final exponentiation.
    fn unitary_inverse(&self) -> Self;

    /// Exponentiation by a scalar.
    fn pow_scalar(&self, scalar: &F) -> Self;

    /// Exponentiation by a signed machine integer (reduced modulo the group
    /// order).
    fn pow_i64(&self, value: i64) -> Self {
        self.pow_scalar(&F::from_i64(value))
    }

    /// Low 32 bits of the low word of the first base-prime-field
    /// coefficient of the canonical representation.
    fn fingerprint(&self) -> u32;

    /// Lowest bit of the designated subfield coefficient: the first
    /// base-prime coefficient of the second degree-6 half. Serialized
    /// tables are only portable between implementations that pick the same
    /// coefficient.
    fn parity(&self) -> bool;

    /// Equality of the first degree-6 halves (holds for `x` and its unitary
    /// inverse); the BSGS candidate filter.
    fn half_equals(&self, other: &Self) -> bool;

    /// Encoding, exactly `SERIALIZED_LEN` bytes.
    fn to_bytes(&self) -> Vec<u8>;

    /// Decodes an encoding, rejecting non-canonical field coefficients.
    fn from_bytes(bytes: &[u8]) -> Result<Self, BackendError>;
}

/// Umbrella trait tying the groups together with the pairing.
///
/// The pairing is exposed in split form, `e = final_exp ∘ miller_loop`, so
/// that level-2 ciphertexts can defer the final exponentiation. A
/// [`PreparedG2`](PairingBackend::PreparedG2) value caches the G2 half of
/// the Miller loop for operands that are paired repeatedly.
pub trait PairingBackend: Clone + Copy + Debug + Default + Send + Sync + Sized + 'static {
    /// Scalar field type (Fr).
    type Scalar: FieldElement;
    /// First source group (G1).
    type G1: GroupPoint<Self::Scalar>;
    /// Second source group (G2).
    type G2: GroupPoint<Self::Scalar>;
    /// Pairing target group (GT), pre- or post-final-exponentiation.
    type Target: TargetElement<Self::Scalar>;
    /// Precomputed G2 Miller-loop half.
    type PreparedG2: Clone + Debug + Send + Sync + 'static;

    /// The curve this backend implements.
    const CURVE: CurveId;

    /// Deterministically hashes a byte string to a G1 point of prime order.
    fn hash_to_g1(msg: &[u8]) -> Self::G1;

    /// Deterministically hashes a byte string to a G2 point of prime order.
    fn hash_to_g2(msg: &[u8]) -> Self::G2;

    /// Precomputes the G2 half of the Miller loop.
    fn prepare_g2(point: &Self::G2) -> Self::PreparedG2;

    /// Miller loop only; the output is not yet in the r-order subgroup.
    fn miller_loop(a: &Self::G1, b: &Self::G2) -> Self::Target;

    /// Miller loop against a precomputed G2 half.
    fn miller_loop_prepared(a: &Self::G1, b: &Self::PreparedG2) -> Self::Target;

    /// Final exponentiation, mapping a Miller-loop output into the r-order
    /// subgroup.
    fn final_exp(value: &Self::Target) -> Result<Self::Target, BackendError>;

    /// The full pairing `e(a, b)`.
    fn pairing(a: &Self::G1, b: &Self::G2) -> Result<Self::Target, BackendError> {
        Self::final_exp(&Self::miller_loop(a, b))
    }
}

/// Uniform field sampling from raw RNG bytes.
#[cfg(any(feature = "bls12_381", feature = "bn254"))]
pub(crate) fn sample_field<F: PrimeField, R: RngCore + ?Sized>(rng: &mut R) -> F {
    let byte_len = F::MODULUS_BIT_SIZE.div_ceil(8) as usize;
    let mut bytes = vec![0u8; byte_len];
    rng.fill_bytes(&mut bytes);
    F::from_le_bytes_mod_order(&bytes)
}

/// Hashes bytes to a curve point by try-and-increment over SHA-256 digests,
/// then clears the cofactor. Deterministic; used only on public inputs
/// (generator derivation).
#[cfg(any(feature = "bls12_381", feature = "bn254"))]
pub(crate) fn hash_to_curve_point<A: AffineRepr>(msg: &[u8]) -> A::Group {
    let mut digest = Sha256::digest(msg);
    let mut point = A::from_random_bytes(&digest);
    let mut attempt = 1u64;
    while point.is_none() {
        let mut hasher = Sha256::new();
        hasher.update(msg);
        hasher.update(b"-attempt-");
        hasher.update(attempt.to_le_bytes());
        digest = hasher.finalize();
        point = A::from_random_bytes(&digest);
        attempt += 1;
    }
    point
        .expect("try-and-increment loop exits only with a point")
        .mul_by_cofactor_to_group()
}

/// Low 32 bits of the low word of a prime-field element's canonical
/// representative.
#[cfg(any(feature = "bls12_381", feature = "bn254"))]
pub(crate) fn low_word_fingerprint<F: PrimeField>(value: &F) -> u32 {
    value.into_bigint().as_ref()[0] as u32
}

/// Lowest bit of a prime-field element's canonical representative.
#[cfg(any(feature = "bls12_381", feature = "bn254"))]
pub(crate) fn low_bit_parity<F: PrimeField>(value: &F) -> bool {
    value.into_bigint().is_odd()
}

#[cfg(feature = "bls12_381")]
mod bls12_381;
#[cfg(feature = "bn254")]
mod bn254;

#[cfg(feature = "bls12_381")]
pub use bls12_381::{Bls12_381Backend, BlsG1, BlsG2, BlsGt};
#[cfg(feature = "bn254")]
pub use bn254::{Bn254Backend, BnG1, BnG2, BnGt};
