use ark_bn254::{Bn254, Fq12, Fr as BnFr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::pairing::{MillerLoopOutput, Pairing};
use ark_ec::{CurveGroup, PrimeGroup};
use ark_ff::{Field, One, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand_core::RngCore;

use crate::backend::{
    hash_to_curve_point, low_bit_parity, low_word_fingerprint, sample_field, FieldElement,
    GroupPoint, PairingBackend, TargetElement,
};
use crate::config::CurveId;
use crate::errors::BackendError;

impl FieldElement for BnFr {
    const SERIALIZED_LEN: usize = 32;

    fn zero() -> Self {
        Zero::zero()
    }

    fn one() -> Self {
        One::one()
    }

    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }

    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        sample_field(rng)
    }

    fn from_i64(value: i64) -> Self {
        BnFr::from(value)
    }

    fn from_le_bytes_mod_order(bytes: &[u8]) -> Self {
        <BnFr as PrimeField>::from_le_bytes_mod_order(bytes)
    }

    fn invert(&self) -> Option<Self> {
        self.inverse()
    }

    fn to_bytes_le(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SERIALIZED_LEN);
        self.serialize_compressed(&mut bytes)
            .expect("scalar serialization");
        bytes
    }

    fn from_bytes_le(bytes: &[u8]) -> Result<Self, BackendError> {
        if bytes.len() != Self::SERIALIZED_LEN {
            return Err(BackendError::Serialization("scalar length mismatch"));
        }
        Self::deserialize_compressed(bytes)
            .map_err(|_| BackendError::Serialization("invalid scalar bytes"))
    }
}

/// G1 point for the BN254 backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BnG1(pub G1Projective);

/// G2 point for the BN254 backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BnG2(pub G2Projective);

/// Pairing target element for the BN254 backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BnGt(pub Fq12);

impl GroupPoint<BnFr> for BnG1 {
    const SERIALIZED_LEN: usize = 32;

    fn identity() -> Self {
        BnG1(G1Projective::zero())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        let mut tmp = self.0;
        tmp += other.0;
        BnG1(tmp)
    }

    fn sub(&self, other: &Self) -> Self {
        let mut tmp = self.0;
        tmp -= other.0;
        BnG1(tmp)
    }

    fn negate(&self) -> Self {
        BnG1(-self.0)
    }

    fn mul_scalar(&self, scalar: &BnFr) -> Self {
        BnG1(self.0.mul_bigint(scalar.into_bigint()))
    }

    fn fingerprint(&self) -> u32 {
        let affine = self.0.into_affine();
        if affine.infinity {
            return 0;
        }
        low_word_fingerprint(&affine.x)
    }

    fn parity(&self) -> bool {
        let affine = self.0.into_affine();
        !affine.infinity && low_bit_parity(&affine.y)
    }

    fn x_equals(&self, other: &Self) -> bool {
        let lhs = self.0.into_affine();
        let rhs = other.0.into_affine();
        lhs.infinity == rhs.infinity && (lhs.infinity || lhs.x == rhs.x)
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SERIALIZED_LEN);
        self.0
            .into_affine()
            .serialize_compressed(&mut bytes)
            .expect("point serialization");
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, BackendError> {
        if bytes.len() != Self::SERIALIZED_LEN {
            return Err(BackendError::Serialization("G1 length mismatch"));
        }
        G1Affine::deserialize_compressed(bytes)
            .map(|affine| BnG1(affine.into()))
            .map_err(|_| BackendError::InvalidPoint)
    }
}

impl GroupPoint<BnFr> for BnG2 {
    const SERIALIZED_LEN: usize = 64;

    fn identity() -> Self {
        BnG2(G2Projective::zero())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        let mut tmp = self.0;
        tmp += other.0;
        BnG2(tmp)
    }

    fn sub(&self, other: &Self) -> Self {
        let mut tmp = self.0;
        tmp -= other.0;
        BnG2(tmp)
    }

    fn negate(&self) -> Self {
        BnG2(-self.0)
    }

    fn mul_scalar(&self, scalar: &BnFr) -> Self {
        BnG2(self.0.mul_bigint(scalar.into_bigint()))
    }

    fn fingerprint(&self) -> u32 {
        let affine = self.0.into_affine();
        if affine.infinity {
            return 0;
        }
        low_word_fingerprint(&affine.x.c0)
    }

    fn parity(&self) -> bool {
        let affine = self.0.into_affine();
        !affine.infinity && low_bit_parity(&affine.y.c0)
    }

    fn x_equals(&self, other: &Self) -> bool {
        let lhs = self.0.into_affine();
        let rhs = other.0.into_affine();
        lhs.infinity == rhs.infinity && (lhs.infinity || lhs.x == rhs.x)
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SERIALIZED_LEN);
        self.0
            .into_affine()
            .serialize_compressed(&mut bytes)
            .expect("point serialization");
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, BackendError> {
        if bytes.len() != Self::SERIALIZED_LEN {
            return Err(BackendError::Serialization("G2 length mismatch"));
        }
        G2Affine::deserialize_compressed(bytes)
            .map(|affine| BnG2(affine.into()))
            .map_err(|_| BackendError::InvalidPoint)
    }
}

impl TargetElement<BnFr> for BnGt {
    const SERIALIZED_LEN: usize = 384;

    fn one() -> Self {
        BnGt(Fq12::one())
    }

    fn is_one(&self) -> bool {
        self.0.is_one()
    }

    fn mul(&self, other: &Self) -> Self {
        BnGt(self.0 * other.0)
    }

    fn unitary_inverse(&self) -> Self {
        let mut value = self.0;
        value.conjugate_in_place();
        BnGt(value)
    }

    fn pow_scalar(&self, scalar: &BnFr) -> Self {
        BnGt(self.0.pow(scalar.into_bigint()))
    }

    fn fingerprint(&self) -> u32 {
        low_word_fingerprint(&self.0.c0.c0.c0)
    }

    fn parity(&self) -> bool {
        low_bit_parity(&self.0.c1.c0.c0)
    }

    fn half_equals(&self, other: &Self) -> bool {
        self.0.c0 == other.0.c0
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SERIALIZED_LEN);
        self.0
            .serialize_compressed(&mut bytes)
            .expect("target serialization");
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, BackendError> {
        if bytes.len() != Self::SERIALIZED_LEN {
            return Err(BackendError::Serialization("GT length mismatch"));
        }
        Fq12::deserialize_compressed(bytes)
            .map(BnGt)
            .map_err(|_| BackendError::Serialization("invalid GT bytes"))
    }
}

/// BN254 backend on arkworks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bn254Backend;

impl PairingBackend for Bn254Backend {
    type Scalar = BnFr;
    type G1 = BnG1;
    type G2 = BnG2;
    type Target = BnGt;
    type PreparedG2 = <Bn254 as Pairing>::G2Prepared;

    const CURVE: CurveId = CurveId::Bn254;

    fn hash_to_g1(msg: &[u8]) -> Self::G1 {
        BnG1(hash_to_curve_point::<G1Affine>(msg))
    }

    fn hash_to_g2(msg: &[u8]) -> Self::G2 {
        BnG2(hash_to_curve_point::<G2Affine>(msg))
    }

    fn prepare_g2(point: &Self::G2) -> Self::PreparedG2 {
        Self::PreparedG2::from(point.0)
    }

    fn miller_loop(a: &Self::G1, b: &Self::G2) -> Self::Target {
        BnGt(Bn254::miller_loop(a.0, b.0).0)
    }

    fn miller_loop_prepared(a: &Self::G1, b: &Self::PreparedG2) -> Self::Target {
        BnGt(Bn254::miller_loop(a.0, b.clone()).0)
    }

    fn final_exp(value: &Self::Target) -> Result<Self::Target, BackendError> {
        Bn254::final_exponentiation(MillerLoopOutput(value.0))
            .map(|out| BnGt(out.0))
            .ok_or(BackendError::Math("final exponentiation of zero"))
    }
}
