//! Non-interactive zero-knowledge proofs over ciphertexts.
//!
//! [`ZkpBin`] proves that a level-1 ciphertext encrypts a bit, via the
//! standard OR-composition of two Schnorr proofs: one for the language
//! `C = (r·P, r·xP)` (the plaintext is 0) and one for
//! `C - (yP, zP) = (r·P, r·xP)` (the plaintext is 1). The Fiat–Shamir
//! challenge is SHA-256 over the statement bases, the ciphertext and the
//! four commitments, reduced into the scalar field; the proof is the four
//! scalars `(c0, s0, c1, s1)` with `c0 + c1` equal to the challenge.
//!
//! [`ZkpEq`] proves that a G1 ciphertext and a G2 ciphertext encrypt the
//! same plaintext: a single Schnorr proof over the witnesses
//! `(m, r1, r2)` across the four encryption equations.
//!
//! Verification is deterministic; a rejected proof is an ordinary `false`,
//! not an error.

use rand_core::RngCore;
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::backend::{FieldElement, GroupPoint, PairingBackend};
use crate::errors::Error;
use crate::she::ciphertext::{CipherTextG1, CipherTextG2};
use crate::she::keys::{enc_components_with_rand, PrecomputedPublicKey, PublicKey};

const ZKP_BIN_DOMAIN: &[u8] = b"bgn-she/zkp-bin/v1";
const ZKP_EQ_DOMAIN: &[u8] = b"bgn-she/zkp-eq/v1";

/// Proof that a level-1 ciphertext encrypts 0 or 1.
///
/// Layout: `d = (c0, s0, c1, s1)`, the per-branch challenges and responses
/// of the OR composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZkpBin<B: PairingBackend> {
    pub(crate) d: [B::Scalar; 4],
}

/// Proof that a G1 and a G2 ciphertext encrypt the same plaintext.
///
/// Layout: `d = (c, sm, s1, s2)`: the challenge and the responses for the
/// plaintext and the two encryption randomizers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZkpEq<B: PairingBackend> {
    pub(crate) d: [B::Scalar; 4],
}

/// Fiat–Shamir challenge over a sequence of same-group points.
fn bit_challenge<B, G>(points: [&G; 10]) -> B::Scalar
where
    B: PairingBackend,
    G: GroupPoint<B::Scalar>,
{
    let mut hasher = Sha256::new();
    hasher.update(ZKP_BIN_DOMAIN);
    for point in points {
        hasher.update(point.to_bytes());
    }
    B::Scalar::from_le_bytes_mod_order(&hasher.finalize())
}

/// OR-composed Schnorr proof for `m ∈ {0, 1}` with witness `r`.
fn prove_bit<B, G, R>(
    base: &G,
    x: &G,
    y: &G,
    z: &G,
    s: &G,
    t: &G,
    m_is_one: bool,
    r: &B::Scalar,
    rng: &mut R,
) -> ZkpBin<B>
where
    B: PairingBackend,
    G: GroupPoint<B::Scalar>,
    R: RngCore + ?Sized,
{
    // Statement 0 targets (S, T); statement 1 targets (S - yP, T - zP).
    let s1_pt = s.sub(y);
    let t1_pt = t.sub(z);

    let blind = B::Scalar::random(rng);
    let c_other = B::Scalar::random(rng);
    let s_other = B::Scalar::random(rng);

    let (a0, b0, a1, b1) = if m_is_one {
        // Simulate branch 0, prove branch 1.
        let a0 = base.mul_scalar(&s_other).sub(&s.mul_scalar(&c_other));
        let b0 = x.mul_scalar(&s_other).sub(&t.mul_scalar(&c_other));
        let a1 = base.mul_scalar(&blind);
        let b1 = x.mul_scalar(&blind);
        (a0, b0, a1, b1)
    } else {
        // Prove branch 0, simulate branch 1.
        let a0 = base.mul_scalar(&blind);
        let b0 = x.mul_scalar(&blind);
        let a1 = base.mul_scalar(&s_other).sub(&s1_pt.mul_scalar(&c_other));
        let b1 = x.mul_scalar(&s_other).sub(&t1_pt.mul_scalar(&c_other));
        (a0, b0, a1, b1)
    };

    let c = bit_challenge::<B, G>([base, x, y, z, s, t, &a0, &b0, &a1, &b1]);
    let c_true = c - c_other;
    let s_true = blind + c_true * *r;

    let d = if m_is_one {
        [c_other, s_other, c_true, s_true]
    } else {
        [c_true, s_true, c_other, s_other]
    };
    ZkpBin { d }
}

/// Deterministic verification of an OR-composed bit proof.
fn verify_bit<B, G>(base: &G, x: &G, y: &G, z: &G, s: &G, t: &G, proof: &ZkpBin<B>) -> bool
where
    B: PairingBackend,
    G: GroupPoint<B::Scalar>,
{
    let [c0, s0, c1, s1] = proof.d;
    let s1_pt = s.sub(y);
    let t1_pt = t.sub(z);

    let a0 = base.mul_scalar(&s0).sub(&s.mul_scalar(&c0));
    let b0 = x.mul_scalar(&s0).sub(&t.mul_scalar(&c0));
    let a1 = base.mul_scalar(&s1).sub(&s1_pt.mul_scalar(&c1));
    let b1 = x.mul_scalar(&s1).sub(&t1_pt.mul_scalar(&c1));

    let c = bit_challenge::<B, G>([base, x, y, z, s, t, &a0, &b0, &a1, &b1]);
    c0 + c1 == c
}

impl<B: PairingBackend> PublicKey<B> {
    /// Encrypts a bit in G1 together with a proof that `m ∈ {0, 1}`.
    ///
    /// Fails with [`Error::OutOfRange`] for any other plaintext.
    #[instrument(level = "trace", skip_all)]
    pub fn encrypt_g1_with_zkp_bin<R: RngCore + ?Sized>(
        &self,
        m: i64,
        rng: &mut R,
    ) -> Result<(CipherTextG1<B>, ZkpBin<B>), Error> {
        if m != 0 && m != 1 {
            return Err(Error::OutOfRange("bit proofs require m in {0, 1}"));
        }
        let (s, t, r) =
            enc_components_with_rand::<B, _, _>(&self.p, &self.xp, &self.yp, &self.zp, m, rng);
        let proof = prove_bit::<B, _, _>(
            &self.p, &self.xp, &self.yp, &self.zp, &s, &t, m == 1, &r, rng,
        );
        Ok((CipherTextG1 { s, t }, proof))
    }

    /// Encrypts a bit in G2 together with a proof that `m ∈ {0, 1}`.
    #[instrument(level = "trace", skip_all)]
    pub fn encrypt_g2_with_zkp_bin<R: RngCore + ?Sized>(
        &self,
        m: i64,
        rng: &mut R,
    ) -> Result<(CipherTextG2<B>, ZkpBin<B>), Error> {
        if m != 0 && m != 1 {
            return Err(Error::OutOfRange("bit proofs require m in {0, 1}"));
        }
        let (s, t, r) =
            enc_components_with_rand::<B, _, _>(&self.q, &self.xq, &self.yq, &self.zq, m, rng);
        let proof = prove_bit::<B, _, _>(
            &self.q, &self.xq, &self.yq, &self.zq, &s, &t, m == 1, &r, rng,
        );
        Ok((CipherTextG2 { s, t }, proof))
    }

    /// Verifies a bit proof for a G1 ciphertext.
    #[instrument(level = "trace", skip_all)]
    pub fn verify_zkp_bin_g1(&self, ct: &CipherTextG1<B>, proof: &ZkpBin<B>) -> bool {
        verify_bit::<B, _>(&self.p, &self.xp, &self.yp, &self.zp, &ct.s, &ct.t, proof)
    }

    /// Verifies a bit proof for a G2 ciphertext.
    #[instrument(level = "trace", skip_all)]
    pub fn verify_zkp_bin_g2(&self, ct: &CipherTextG2<B>, proof: &ZkpBin<B>) -> bool {
        verify_bit::<B, _>(&self.q, &self.xq, &self.yq, &self.zq, &ct.s, &ct.t, proof)
    }

    /// Encrypts `m` in both source groups together with a proof that the
    /// two ciphertexts carry the same plaintext.
    #[instrument(level = "trace", skip_all)]
    pub fn encrypt_with_zkp_eq<R: RngCore + ?Sized>(
        &self,
        m: i64,
        rng: &mut R,
    ) -> (CipherTextG1<B>, CipherTextG2<B>, ZkpEq<B>) {
        let (s1, t1, r1) =
            enc_components_with_rand::<B, _, _>(&self.p, &self.xp, &self.yp, &self.zp, m, rng);
        let (s2, t2, r2) =
            enc_components_with_rand::<B, _, _>(&self.q, &self.xq, &self.yq, &self.zq, m, rng);

        let km = B::Scalar::random(rng);
        let k1 = B::Scalar::random(rng);
        let k2 = B::Scalar::random(rng);
        let a1 = self.yp.mul_scalar(&km).add(&self.p.mul_scalar(&k1));
        let a2 = self.zp.mul_scalar(&km).add(&self.xp.mul_scalar(&k1));
        let a3 = self.yq.mul_scalar(&km).add(&self.q.mul_scalar(&k2));
        let a4 = self.zq.mul_scalar(&km).add(&self.xq.mul_scalar(&k2));

        let c = self.eq_challenge(&s1, &t1, &s2, &t2, &a1, &a2, &a3, &a4);
        let sm = km + c * B::Scalar::from_i64(m);
        let sr1 = k1 + c * r1;
        let sr2 = k2 + c * r2;

        (
            CipherTextG1 { s: s1, t: t1 },
            CipherTextG2 { s: s2, t: t2 },
            ZkpEq {
                d: [c, sm, sr1, sr2],
            },
        )
    }

    /// Verifies an equal-plaintext proof for a G1/G2 ciphertext pair.
    #[instrument(level = "trace", skip_all)]
    pub fn verify_zkp_eq(
        &self,
        c1: &CipherTextG1<B>,
        c2: &CipherTextG2<B>,
        proof: &ZkpEq<B>,
    ) -> bool {
        let [c, sm, sr1, sr2] = proof.d;
        let a1 = self
            .yp
            .mul_scalar(&sm)
            .add(&self.p.mul_scalar(&sr1))
            .sub(&c1.s.mul_scalar(&c));
        let a2 = self
            .zp
            .mul_scalar(&sm)
            .add(&self.xp.mul_scalar(&sr1))
            .sub(&c1.t.mul_scalar(&c));
        let a3 = self
            .yq
            .mul_scalar(&sm)
            .add(&self.q.mul_scalar(&sr2))
            .sub(&c2.s.mul_scalar(&c));
        let a4 = self
            .zq
            .mul_scalar(&sm)
            .add(&self.xq.mul_scalar(&sr2))
            .sub(&c2.t.mul_scalar(&c));
        self.eq_challenge(&c1.s, &c1.t, &c2.s, &c2.t, &a1, &a2, &a3, &a4) == c
    }

    #[allow(clippy::too_many_arguments)]
    fn eq_challenge(
        &self,
        s1: &B::G1,
        t1: &B::G1,
        s2: &B::G2,
        t2: &B::G2,
        a1: &B::G1,
        a2: &B::G1,
        a3: &B::G2,
        a4: &B::G2,
    ) -> B::Scalar {
        let mut hasher = Sha256::new();
        hasher.update(ZKP_EQ_DOMAIN);
        for point in [&self.p, &self.xp, &self.yp, &self.zp] {
            hasher.update(point.to_bytes());
        }
        for point in [&self.q, &self.xq, &self.yq, &self.zq] {
            hasher.update(point.to_bytes());
        }
        hasher.update(s1.to_bytes());
        hasher.update(t1.to_bytes());
        hasher.update(s2.to_bytes());
        hasher.update(t2.to_bytes());
        hasher.update(a1.to_bytes());
        hasher.update(a2.to_bytes());
        hasher.update(a3.to_bytes());
        hasher.update(a4.to_bytes());
        B::Scalar::from_le_bytes_mod_order(&hasher.finalize())
    }
}

impl<B: PairingBackend> PrecomputedPublicKey<B> {
    /// Encrypts a bit in G1 with a proof (delegates; no pairings involved).
    pub fn encrypt_g1_with_zkp_bin<R: RngCore + ?Sized>(
        &self,
        m: i64,
        rng: &mut R,
    ) -> Result<(CipherTextG1<B>, ZkpBin<B>), Error> {
        self.public_key().encrypt_g1_with_zkp_bin(m, rng)
    }

    /// Encrypts a bit in G2 with a proof (delegates).
    pub fn encrypt_g2_with_zkp_bin<R: RngCore + ?Sized>(
        &self,
        m: i64,
        rng: &mut R,
    ) -> Result<(CipherTextG2<B>, ZkpBin<B>), Error> {
        self.public_key().encrypt_g2_with_zkp_bin(m, rng)
    }

    /// Verifies a bit proof for a G1 ciphertext.
    pub fn verify_zkp_bin_g1(&self, ct: &CipherTextG1<B>, proof: &ZkpBin<B>) -> bool {
        self.public_key().verify_zkp_bin_g1(ct, proof)
    }

    /// Verifies a bit proof for a G2 ciphertext.
    pub fn verify_zkp_bin_g2(&self, ct: &CipherTextG2<B>, proof: &ZkpBin<B>) -> bool {
        self.public_key().verify_zkp_bin_g2(ct, proof)
    }
}
