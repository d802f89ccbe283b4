use ark_bls12_381::{Bls12_381, Fq12, Fr as BlsFr, G1Affine, G1Projective, G2Affine, G2Projective};
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

impl FieldElement for BlsFr {
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
        BlsFr::from(value)
    }

    fn from_le_bytes_mod_order(bytes: &[u8]) -> Self {
        <BlsFr as PrimeField>::from_le_bytes_mod_order(bytes)
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

/// G1 point for the BLS12-381 backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlsG1(pub G1Projective);

/// G2 point for the BLS12-381 backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlsG2(pub G2Projective);

/// Pairing target element for the BLS12-381 backend, carried as a raw Fq12
/// value so both Miller-loop outputs and subgroup elements fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlsGt(pub Fq12);

impl GroupPoint<BlsFr> for BlsG1 {
    const SERIALIZED_LEN: usize = 48;

    fn identity() -> Self {
        BlsG1(G1Projective::zero())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        let mut tmp = self.0;
        tmp += other.0;
        BlsG1(tmp)
    }

    fn sub(&self, other: &Self) -> Self {
        let mut tmp = self.0;
        tmp -= other.0;
        BlsG1(tmp)
    }

    fn negate(&self) -> Self {
        BlsG1(-self.0)
    }

    fn mul_scalar(&self, scalar: &BlsFr) -> Self {
        BlsG1(self.0.mul_bigint(scalar.into_bigint()))
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
            .map(|affine| BlsG1(affine.into()))
            .map_err(|_| BackendError::InvalidPoint)
    }
}

impl GroupPoint<BlsFr> for BlsG2 {
    const SERIALIZED_LEN: usize = 96;

    fn identity() -> Self {
        BlsG2(G2Projective::zero())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        let mut tmp = self.0;
        tmp += other.0;
        BlsG2(tmp)
    }

    fn sub(&self, other: &Self) -> Self {
        let mut tmp = self.0;
        tmp -= other.0;
        BlsG2(tmp)
    }

    fn negate(&self) -> Self {
        BlsG2(-self.0)
    }

    fn mul_scalar(&self, scalar: &BlsFr) -> Self {
        BlsG2(self.0.mul_bigint(scalar.into_bigint()))
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
            .map(|affine| BlsG2(affine.into()))
            .map_err(|_| BackendError::InvalidPoint)
    }
}

impl TargetElement<BlsFr> for BlsGt {
    const SERIALIZED_LEN: usize = 576;

    fn one() -> Self {
        BlsGt(Fq12::one())
    }

    fn is_one(&self) -> bool {
        self.0.is_one()
    }

    fn mul(&self, other: &Self) -> Self {
        BlsGt(self.0 * other.0)
    }

    fn unitary_inverse(&self) -> Self {
        let mut value = self.0;
        value.conjugate_in_place();
        BlsGt(value)
    }

    fn pow_scalar(&self, scalar: &BlsFr) -> Self {
        BlsGt(self.0.pow(scalar.into_bigint()))
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
            .map(BlsGt)
            .map_err(|_| BackendError::Serialization("invalid GT bytes"))
    }
}

/// BLS12-381 backend on arkworks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bls12_381Backend;

impl PairingBackend for Bls12_381Backend {
    type Scalar = BlsFr;
    type G1 = BlsG1;
    type G2 = BlsG2;
    type Target = BlsGt;
    type PreparedG2 = <Bls12_381 as Pairing>::G2Prepared;

    const CURVE: CurveId = CurveId::Bls12_381;

    fn hash_to_g1(msg: &[u8]) -> Self::G1 {
        BlsG1(hash_to_curve_point::<G1Affine>(msg))
    }

    fn hash_to_g2(msg: &[u8]) -> Self::G2 {
        BlsG2(hash_to_curve_point::<G2Affine>(msg))
    }

    fn prepare_g2(point: &Self::G2) -> Self::PreparedG2 {
        Self::PreparedG2::from(point.0)
    }

    fn miller_loop(a: &Self::G1, b: &Self::G2) -> Self::Target {
        BlsGt(Bls12_381::miller_loop(a.0, b.0).0)
    }

    fn miller_loop_prepared(a: &Self::G1, b: &Self::PreparedG2) -> Self::Target {
        BlsGt(Bls12_381::miller_loop(a.0, b.clone()).0)
    }

    fn final_exp(value: &Self::Target) -> Result<Self::Target, BackendError> {
        Bls12_381::final_exponentiation(MillerLoopOutput(value.0))
            .map(|out| BlsGt(out.0))
            .ok_or(BackendError::Math("final exponentiation of zero"))
    }
}
