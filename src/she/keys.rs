//! Key material: secret key, public key, precomputed public key.
//!
//! A secret key is six uniform scalars split across the two source groups.
//! Only `x1` and `x2` are ever serialized; the `y`/`z` scalars are derived
//! from them by hashing with fixed domain tags, which keeps the exported
//! form at two scalars while letting a receiver rebuild the full key.
//!
//! The secret key owns the two BSGS decryption tables. They are built on
//! `B1 = (x1·y1 - z1)·P` and on `g = e(B1, B2)`, the elements every
//! decryption reduces a ciphertext to (times the plaintext).

use rand_core::RngCore;
use sha2::{Digest, Sha512};
use tracing::instrument;
use zeroize::Zeroize;

use crate::backend::{FieldElement, GroupPoint, PairingBackend, TargetElement};
use crate::dlp::{EcDlpTable, GtDlpTable};
use crate::errors::Error;
use crate::she::ciphertext::{CipherText, CipherTextG1, CipherTextG2, CipherTextGT};
use crate::she::params::Params;

/// Derives one of the `y`/`z` secret scalars from a seed scalar.
fn derive_scalar<B: PairingBackend>(seed: &B::Scalar, tag: &[u8]) -> B::Scalar {
    let mut hasher = Sha512::new();
    hasher.update(b"bgn-she/keygen/v1/");
    hasher.update(tag);
    hasher.update(seed.to_bytes_le());
    B::Scalar::from_le_bytes_mod_order(&hasher.finalize())
}

/// Encrypts `m` in one source group, returning the components and the
/// encryption randomness (the proofs need it).
pub(crate) fn enc_components_with_rand<B, G, R>(
    base: &G,
    x: &G,
    y: &G,
    z: &G,
    m: i64,
    rng: &mut R,
) -> (G, G, B::Scalar)
where
    B: PairingBackend,
    G: GroupPoint<B::Scalar>,
    R: RngCore + ?Sized,
{
    let r = B::Scalar::random(rng);
    let m_scalar = B::Scalar::from_i64(m);
    let s = y.mul_scalar(&m_scalar).add(&base.mul_scalar(&r));
    let t = z.mul_scalar(&m_scalar).add(&x.mul_scalar(&r));
    (s, t, r)
}

/// Secret key with its decryption tables.
///
/// Immutable and shareable across threads once the decode range has been
/// set; `set_decode_range` and `load_gt_table` require exclusive access.
/// The scalars are wiped on drop.
#[derive(Clone, Debug)]
pub struct SecretKey<B: PairingBackend> {
    pub(crate) x1: B::Scalar,
    pub(crate) y1: B::Scalar,
    pub(crate) z1: B::Scalar,
    pub(crate) x2: B::Scalar,
    pub(crate) y2: B::Scalar,
    pub(crate) z2: B::Scalar,
    xx: B::Scalar,
    b1: B::G1,
    b2: B::G2,
    g: B::Target,
    ec_table: Option<EcDlpTable<B>>,
    gt_table: Option<GtDlpTable<B>>,
}

impl<B: PairingBackend> Drop for SecretKey<B> {
    fn drop(&mut self) {
        self.x1.zeroize();
        self.y1.zeroize();
        self.z1.zeroize();
        self.x2.zeroize();
        self.y2.zeroize();
        self.z2.zeroize();
        self.xx.zeroize();
    }
}

impl<B: PairingBackend> SecretKey<B> {
    /// Samples a fresh secret key from the injected RNG.
    ///
    /// The decode range is not set yet; call
    /// [`set_decode_range`](Self::set_decode_range) before decrypting.
    #[instrument(level = "info", skip_all)]
    pub fn generate<R: RngCore + ?Sized>(params: &Params<B>, rng: &mut R) -> Result<Self, Error> {
        let x1 = B::Scalar::random(rng);
        let x2 = B::Scalar::random(rng);
        Self::from_seed_scalars(params, x1, x2)
    }

    /// Rebuilds the full key from the two seed scalars.
    pub(crate) fn from_seed_scalars(
        params: &Params<B>,
        x1: B::Scalar,
        x2: B::Scalar,
    ) -> Result<Self, Error> {
        let y1 = derive_scalar::<B>(&x1, b"y1");
        let z1 = derive_scalar::<B>(&x1, b"z1");
        let y2 = derive_scalar::<B>(&x2, b"y2");
        let z2 = derive_scalar::<B>(&x2, b"z2");
        let b1 = params.p.mul_scalar(&(x1 * y1 - z1));
        let b2 = params.q.mul_scalar(&(x2 * y2 - z2));
        let xx = x1 * x2;
        let g = B::pairing(&b1, &b2)?;
        Ok(Self {
            x1,
            y1,
            z1,
            x2,
            y2,
            z2,
            xx,
            b1,
            b2,
            g,
            ec_table: None,
            gt_table: None,
        })
    }

    /// (Re)builds both BSGS tables for the given range.
    ///
    /// Decryption succeeds for plaintexts of magnitude up to
    /// `hash_size * (try_num + 1)`.
    #[instrument(level = "info", skip(self))]
    pub fn set_decode_range(&mut self, hash_size: u32, try_num: u32) -> Result<(), Error> {
        self.ec_table = Some(EcDlpTable::<B>::init(self.b1, hash_size, try_num)?);
        self.gt_table = Some(GtDlpTable::<B>::init(self.g, hash_size, try_num)?);
        Ok(())
    }

    /// Derives the public key.
    pub fn public_key(&self, params: &Params<B>) -> PublicKey<B> {
        PublicKey {
            p: params.p,
            xp: params.p.mul_scalar(&self.x1),
            yp: params.p.mul_scalar(&self.y1),
            zp: params.p.mul_scalar(&self.z1),
            q: params.q,
            xq: params.q.mul_scalar(&self.x2),
            yq: params.q.mul_scalar(&self.y2),
            zq: params.q.mul_scalar(&self.z2),
        }
    }

    fn ec_table(&self) -> Result<&EcDlpTable<B>, Error> {
        self.ec_table
            .as_ref()
            .ok_or(Error::InitOrder("set_decode_range before decrypting"))
    }

    fn gt_table(&self) -> Result<&GtDlpTable<B>, Error> {
        self.gt_table
            .as_ref()
            .ok_or(Error::InitOrder("set_decode_range before decrypting"))
    }

    /// Reduces a G1 ciphertext to its masked value `m·B1`.
    fn mask_g1(&self, ct: &CipherTextG1<B>) -> B::G1 {
        ct.s.mul_scalar(&self.x1).sub(&ct.t)
    }

    /// Reduces a G2 ciphertext to its masked value `m·B2`.
    fn mask_g2(&self, ct: &CipherTextG2<B>) -> B::G2 {
        ct.s.mul_scalar(&self.x2).sub(&ct.t)
    }

    /// Reduces a GT ciphertext to its masked value `g^(m)` (or `g^(m·m')`
    /// for level-2 products), applying the deferred final exponentiation
    /// when needed.
    fn mask_gt(&self, ct: &CipherTextGT<B>) -> Result<B::Target, Error> {
        let cross = ct.g[1]
            .pow_scalar(&self.x1)
            .mul(&ct.g[2].pow_scalar(&self.x2));
        let mut masked = ct.g[0]
            .pow_scalar(&self.xx)
            .mul(&ct.g[3])
            .mul(&cross.unitary_inverse());
        if !ct.finalized {
            masked = B::final_exp(&masked)?;
        }
        Ok(masked)
    }

    /// Decrypts a G1 ciphertext: `x1·S - T = m·B1`, solved on the EC table.
    #[instrument(level = "trace", skip_all)]
    pub fn decrypt_g1(&self, ct: &CipherTextG1<B>) -> Result<i64, Error> {
        let table = self.ec_table()?;
        table.log(&self.mask_g1(ct))
    }

    /// Decrypts a G2 ciphertext: `x2·S - T = m·B2`, lifted to the target
    /// group through `e(B1, m·B2) = g^m` and solved on the GT table.
    #[instrument(level = "trace", skip_all)]
    pub fn decrypt_g2(&self, ct: &CipherTextG2<B>) -> Result<i64, Error> {
        let table = self.gt_table()?;
        let lifted = B::pairing(&self.b1, &self.mask_g2(ct))?;
        table.log(&lifted)
    }

    /// Decrypts a GT ciphertext (level-1 or level-2) on the GT table.
    #[instrument(level = "trace", skip_all)]
    pub fn decrypt_gt(&self, ct: &CipherTextGT<B>) -> Result<i64, Error> {
        let table = self.gt_table()?;
        table.log(&self.mask_gt(ct)?)
    }

    /// Decrypts a tagged ciphertext.
    pub fn decrypt(&self, ct: &CipherText<B>) -> Result<i64, Error> {
        match ct {
            CipherText::Additive(c1, _) => self.decrypt_g1(c1),
            CipherText::Multiplied(ct) => self.decrypt_gt(ct),
        }
    }

    /// Decrypts a G1 ciphertext through the target group, exercising the GT
    /// table instead of the EC table.
    pub fn decrypt_g1_via_gt(
        &self,
        params: &Params<B>,
        ct: &CipherTextG1<B>,
    ) -> Result<i64, Error> {
        let yq = params.q.mul_scalar(&self.y2);
        let zq = params.q.mul_scalar(&self.z2);
        let lifted = CipherTextGT::from_miller_loops([
            B::miller_loop(&ct.s, &yq),
            B::miller_loop(&ct.s, &zq),
            B::miller_loop(&ct.t, &yq),
            B::miller_loop(&ct.t, &zq),
        ]);
        self.decrypt_gt(&lifted)
    }

    /// Decrypts a G2 ciphertext through the target group.
    pub fn decrypt_g2_via_gt(
        &self,
        params: &Params<B>,
        ct: &CipherTextG2<B>,
    ) -> Result<i64, Error> {
        let yp = params.p.mul_scalar(&self.y1);
        let zp = params.p.mul_scalar(&self.z1);
        let lifted = CipherTextGT::from_miller_loops([
            B::miller_loop(&yp, &ct.s),
            B::miller_loop(&yp, &ct.t),
            B::miller_loop(&zp, &ct.s),
            B::miller_loop(&zp, &ct.t),
        ]);
        self.decrypt_gt(&lifted)
    }

    /// Decides whether a G1 ciphertext encrypts zero, with no DLP work.
    pub fn is_zero_g1(&self, ct: &CipherTextG1<B>) -> bool {
        self.mask_g1(ct).is_identity()
    }

    /// Decides whether a G2 ciphertext encrypts zero, with no DLP work.
    pub fn is_zero_g2(&self, ct: &CipherTextG2<B>) -> bool {
        self.mask_g2(ct).is_identity()
    }

    /// Decides whether a GT ciphertext encrypts zero, with no DLP work.
    pub fn is_zero_gt(&self, ct: &CipherTextGT<B>) -> Result<bool, Error> {
        Ok(self.mask_gt(ct)?.is_one())
    }

    /// Decides whether a tagged ciphertext encrypts zero.
    pub fn is_zero(&self, ct: &CipherText<B>) -> Result<bool, Error> {
        match ct {
            CipherText::Additive(c1, _) => Ok(self.is_zero_g1(c1)),
            CipherText::Multiplied(ct) => self.is_zero_gt(ct),
        }
    }

    /// Serializes the GT decryption table (the only persisted state).
    pub fn save_gt_table(&self) -> Result<Vec<u8>, Error> {
        Ok(self.gt_table()?.to_bytes())
    }

    /// Restores the GT decryption table from its serialized form.
    pub fn load_gt_table(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.gt_table = Some(GtDlpTable::<B>::from_bytes(self.g, bytes)?);
        Ok(())
    }
}

/// Public key: the six published points plus the generators they were
/// derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey<B: PairingBackend> {
    pub(crate) p: B::G1,
    pub(crate) xp: B::G1,
    pub(crate) yp: B::G1,
    pub(crate) zp: B::G1,
    pub(crate) q: B::G2,
    pub(crate) xq: B::G2,
    pub(crate) yq: B::G2,
    pub(crate) zq: B::G2,
}

impl<B: PairingBackend> PublicKey<B> {
    /// Encrypts `m` in G1. Negative plaintexts reduce modulo the group
    /// order.
    #[instrument(level = "trace", skip_all)]
    pub fn encrypt_g1<R: RngCore + ?Sized>(&self, m: i64, rng: &mut R) -> CipherTextG1<B> {
        let (s, t, _) =
            enc_components_with_rand::<B, _, _>(&self.p, &self.xp, &self.yp, &self.zp, m, rng);
        CipherTextG1 { s, t }
    }

    /// Encrypts `m` in G2.
    #[instrument(level = "trace", skip_all)]
    pub fn encrypt_g2<R: RngCore + ?Sized>(&self, m: i64, rng: &mut R) -> CipherTextG2<B> {
        let (s, t, _) =
            enc_components_with_rand::<B, _, _>(&self.q, &self.xq, &self.yq, &self.zq, m, rng);
        CipherTextG2 { s, t }
    }

    /// Encrypts `m` directly in the target group (level-1 GT form): a fresh
    /// G1 encryption converted through the pairing and finalized.
    #[instrument(level = "trace", skip_all)]
    pub fn encrypt_gt<R: RngCore + ?Sized>(
        &self,
        m: i64,
        rng: &mut R,
    ) -> Result<CipherTextGT<B>, Error> {
        let c1 = self.encrypt_g1(m, rng);
        self.convert_g1(&c1).final_exp()
    }

    /// Encrypts `m` as the additive level-1 pair (G1 and G2 encryptions
    /// with independent randomness), keeping the result multiplicable.
    pub fn encrypt<R: RngCore + ?Sized>(&self, m: i64, rng: &mut R) -> CipherText<B> {
        CipherText::Additive(self.encrypt_g1(m, rng), self.encrypt_g2(m, rng))
    }

    /// Lifts a G1 ciphertext into the target group by multiplying with the
    /// deterministic `Enc(1)` `(yQ, zQ)` (randomness zero).
    ///
    /// The output is linkable to the input; re-randomize it when that
    /// matters.
    pub fn convert_g1(&self, ct: &CipherTextG1<B>) -> CipherTextGT<B> {
        CipherTextGT::from_miller_loops([
            B::miller_loop(&ct.s, &self.yq),
            B::miller_loop(&ct.s, &self.zq),
            B::miller_loop(&ct.t, &self.yq),
            B::miller_loop(&ct.t, &self.zq),
        ])
    }

    /// Lifts a G2 ciphertext into the target group via `(yP, zP)`.
    pub fn convert_g2(&self, ct: &CipherTextG2<B>) -> CipherTextGT<B> {
        CipherTextGT::from_miller_loops([
            B::miller_loop(&self.yp, &ct.s),
            B::miller_loop(&self.yp, &ct.t),
            B::miller_loop(&self.zp, &ct.s),
            B::miller_loop(&self.zp, &ct.t),
        ])
    }

    /// Lifts an additive ciphertext to level 2; a level-2 input is a
    /// mismatch.
    pub fn convert(&self, ct: &CipherText<B>) -> Result<CipherText<B>, Error> {
        match ct {
            CipherText::Additive(_, c2) => Ok(CipherText::Multiplied(self.convert_g2(c2))),
            CipherText::Multiplied(_) => Err(Error::LevelMismatch(
                "ciphertext is already in the target group",
            )),
        }
    }

    /// Adds a fresh encryption of zero.
    #[instrument(level = "trace", skip_all)]
    pub fn rerandomize_g1<R: RngCore + ?Sized>(
        &self,
        ct: &CipherTextG1<B>,
        rng: &mut R,
    ) -> CipherTextG1<B> {
        ct.add(&self.encrypt_g1(0, rng))
    }

    /// Adds a fresh encryption of zero.
    #[instrument(level = "trace", skip_all)]
    pub fn rerandomize_g2<R: RngCore + ?Sized>(
        &self,
        ct: &CipherTextG2<B>,
        rng: &mut R,
    ) -> CipherTextG2<B> {
        ct.add(&self.encrypt_g2(0, rng))
    }

    /// Adds the product `enc(0)·enc(0)` to a GT ciphertext.
    ///
    /// The right factor reuses `(Q, xQ)`: only the product of the two
    /// randomizers matters, so a single fresh scalar on the left suffices.
    /// One Miller loop per component.
    #[instrument(level = "trace", skip_all)]
    pub fn rerandomize_gt<R: RngCore + ?Sized>(
        &self,
        ct: &CipherTextGT<B>,
        rng: &mut R,
    ) -> Result<CipherTextGT<B>, Error> {
        let r = B::Scalar::random(rng);
        let s1 = self.p.mul_scalar(&r);
        let t1 = self.xp.mul_scalar(&r);
        let factors = CipherTextGT::from_miller_loops([
            B::miller_loop(&s1, &self.q),
            B::miller_loop(&s1, &self.xq),
            B::miller_loop(&t1, &self.q),
            B::miller_loop(&t1, &self.xq),
        ]);
        if ct.finalized {
            ct.add(&factors.final_exp()?)
        } else {
            ct.add(&factors)
        }
    }

    /// Re-randomizes a tagged ciphertext in place of the matching variant.
    pub fn rerandomize<R: RngCore + ?Sized>(
        &self,
        ct: &CipherText<B>,
        rng: &mut R,
    ) -> Result<CipherText<B>, Error> {
        match ct {
            CipherText::Additive(c1, c2) => Ok(CipherText::Additive(
                self.rerandomize_g1(c1, rng),
                self.rerandomize_g2(c2, rng),
            )),
            CipherText::Multiplied(ct) => {
                Ok(CipherText::Multiplied(self.rerandomize_gt(ct, rng)?))
            }
        }
    }
}

/// Public key with cached G2 Miller-loop halves for `Q, xQ, yQ, zQ`.
///
/// A pure function of the public key; build it once and share it. It speeds
/// up target-group encryption, G1 conversion and GT re-randomization, which
/// all pair varying G1 points against these four fixed G2 points.
#[derive(Clone, Debug)]
pub struct PrecomputedPublicKey<B: PairingBackend> {
    pk: PublicKey<B>,
    q_prep: B::PreparedG2,
    xq_prep: B::PreparedG2,
    yq_prep: B::PreparedG2,
    zq_prep: B::PreparedG2,
}

impl<B: PairingBackend> PrecomputedPublicKey<B> {
    /// Precomputes the pairing halves of the four G2 public points.
    #[instrument(level = "info", skip_all)]
    pub fn new(pk: &PublicKey<B>) -> Self {
        Self {
            pk: *pk,
            q_prep: B::prepare_g2(&pk.q),
            xq_prep: B::prepare_g2(&pk.xq),
            yq_prep: B::prepare_g2(&pk.yq),
            zq_prep: B::prepare_g2(&pk.zq),
        }
    }

    /// The underlying public key.
    pub fn public_key(&self) -> &PublicKey<B> {
        &self.pk
    }

    /// Encrypts `m` in G1 (no pairing involved; delegates).
    pub fn encrypt_g1<R: RngCore + ?Sized>(&self, m: i64, rng: &mut R) -> CipherTextG1<B> {
        self.pk.encrypt_g1(m, rng)
    }

    /// Encrypts `m` in G2 (delegates).
    pub fn encrypt_g2<R: RngCore + ?Sized>(&self, m: i64, rng: &mut R) -> CipherTextG2<B> {
        self.pk.encrypt_g2(m, rng)
    }

    /// Encrypts `m` in the target group using the cached pairing halves.
    #[instrument(level = "trace", skip_all)]
    pub fn encrypt_gt<R: RngCore + ?Sized>(
        &self,
        m: i64,
        rng: &mut R,
    ) -> Result<CipherTextGT<B>, Error> {
        let c1 = self.pk.encrypt_g1(m, rng);
        self.convert_g1(&c1).final_exp()
    }

    /// Lifts a G1 ciphertext to the target group using the cached halves.
    pub fn convert_g1(&self, ct: &CipherTextG1<B>) -> CipherTextGT<B> {
        CipherTextGT::from_miller_loops([
            B::miller_loop_prepared(&ct.s, &self.yq_prep),
            B::miller_loop_prepared(&ct.s, &self.zq_prep),
            B::miller_loop_prepared(&ct.t, &self.yq_prep),
            B::miller_loop_prepared(&ct.t, &self.zq_prep),
        ])
    }

    /// GT re-randomization using the cached halves of `Q` and `xQ`.
    #[instrument(level = "trace", skip_all)]
    pub fn rerandomize_gt<R: RngCore + ?Sized>(
        &self,
        ct: &CipherTextGT<B>,
        rng: &mut R,
    ) -> Result<CipherTextGT<B>, Error> {
        let r = B::Scalar::random(rng);
        let s1 = self.pk.p.mul_scalar(&r);
        let t1 = self.pk.xp.mul_scalar(&r);
        let factors = CipherTextGT::from_miller_loops([
            B::miller_loop_prepared(&s1, &self.q_prep),
            B::miller_loop_prepared(&s1, &self.xq_prep),
            B::miller_loop_prepared(&t1, &self.q_prep),
            B::miller_loop_prepared(&t1, &self.xq_prep),
        ]);
        if ct.finalized {
            ct.add(&factors.final_exp()?)
        } else {
            ct.add(&factors)
        }
    }
}
