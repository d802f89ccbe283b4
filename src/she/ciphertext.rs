//! Ciphertext types and homomorphic operations.
//!
//! Level-1 ciphertexts live in the source groups (`CipherTextG1`,
//! `CipherTextG2`) and admit unlimited additions and plaintext scaling.
//! Multiplying a G1 ciphertext by a G2 ciphertext yields a level-2
//! [`CipherTextGT`]: four pairing-target components, stored as raw
//! Miller-loop outputs with the final exponentiation deferred to decryption
//! or an explicit [`CipherTextGT::final_exp`] boundary. Deferral makes sums
//! of products cheap; `final_exp` distributes over componentwise products,
//! so a batch of multiplications can be added first and exponentiated once.
//!
//! The deferred/finalized state is part of a GT ciphertext's representation
//! tag: combining the two states is rejected as a level mismatch, exactly
//! like adding a level-1 to a level-2 ciphertext.

use crate::backend::{GroupPoint, PairingBackend, TargetElement};
use crate::errors::Error;

/// Level-1 ciphertext in G1: `(S, T) = (m·yP + r·P, m·zP + r·xP)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CipherTextG1<B: PairingBackend> {
    pub(crate) s: B::G1,
    pub(crate) t: B::G1,
}

/// Level-1 ciphertext in G2: `(S, T) = (m·yQ + r·Q, m·zQ + r·xQ)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CipherTextG2<B: PairingBackend> {
    pub(crate) s: B::G2,
    pub(crate) t: B::G2,
}

/// Ciphertext in the pairing target: four GT components.
///
/// `finalized` distinguishes the raw Miller-loop state (level-2 products,
/// FE deferred) from the canonical subgroup state (level-1 GT encryptions
/// and the output of [`final_exp`](Self::final_exp)).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CipherTextGT<B: PairingBackend> {
    pub(crate) g: [B::Target; 4],
    pub(crate) finalized: bool,
}

impl<B: PairingBackend> CipherTextG1<B> {
    /// Componentwise addition; the sum encrypts `m1 + m2`.
    pub fn add(&self, other: &Self) -> Self {
        Self {
            s: self.s.add(&other.s),
            t: self.t.add(&other.t),
        }
    }

    /// Componentwise subtraction; encrypts `m1 - m2`.
    pub fn sub(&self, other: &Self) -> Self {
        Self {
            s: self.s.sub(&other.s),
            t: self.t.sub(&other.t),
        }
    }

    /// Additive inverse; encrypts `-m`.
    pub fn neg(&self) -> Self {
        Self {
            s: self.s.negate(),
            t: self.t.negate(),
        }
    }

    /// Plaintext scaling; encrypts `k·m`.
    pub fn mul_plain(&self, k: i64) -> Self {
        Self {
            s: self.s.mul_i64(k),
            t: self.t.mul_i64(k),
        }
    }

    /// The one multiplication: pairs this ciphertext against a G2
    /// ciphertext, producing a level-2 GT ciphertext encrypting `m1·m2`.
    ///
    /// The final exponentiation is deliberately omitted; decryption applies
    /// it, or call [`CipherTextGT::final_exp`] explicitly.
    pub fn mul(&self, other: &CipherTextG2<B>) -> CipherTextGT<B> {
        CipherTextGT {
            g: [
                B::miller_loop(&self.s, &other.s),
                B::miller_loop(&self.s, &other.t),
                B::miller_loop(&self.t, &other.s),
                B::miller_loop(&self.t, &other.t),
            ],
            finalized: false,
        }
    }
}

impl<B: PairingBackend> CipherTextG2<B> {
    /// Componentwise addition; the sum encrypts `m1 + m2`.
    pub fn add(&self, other: &Self) -> Self {
        Self {
            s: self.s.add(&other.s),
            t: self.t.add(&other.t),
        }
    }

    /// Componentwise subtraction; encrypts `m1 - m2`.
    pub fn sub(&self, other: &Self) -> Self {
        Self {
            s: self.s.sub(&other.s),
            t: self.t.sub(&other.t),
        }
    }

    /// Additive inverse; encrypts `-m`.
    pub fn neg(&self) -> Self {
        Self {
            s: self.s.negate(),
            t: self.t.negate(),
        }
    }

    /// Plaintext scaling; encrypts `k·m`.
    pub fn mul_plain(&self, k: i64) -> Self {
        Self {
            s: self.s.mul_i64(k),
            t: self.t.mul_i64(k),
        }
    }
}

impl<B: PairingBackend> CipherTextGT<B> {
    pub(crate) fn from_miller_loops(g: [B::Target; 4]) -> Self {
        Self {
            g,
            finalized: false,
        }
    }

    /// Whether the final exponentiation has been applied to the components.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Componentwise combination; the result encrypts `m1 + m2`.
    ///
    /// Both operands must be in the same representation state; mixing a
    /// deferred-FE ciphertext with a finalized one is a level mismatch.
    pub fn add(&self, other: &Self) -> Result<Self, Error> {
        if self.finalized != other.finalized {
            return Err(Error::LevelMismatch(
                "cannot add GT ciphertexts before and after final exponentiation",
            ));
        }
        Ok(Self {
            g: [
                self.g[0].mul(&other.g[0]),
                self.g[1].mul(&other.g[1]),
                self.g[2].mul(&other.g[2]),
                self.g[3].mul(&other.g[3]),
            ],
            finalized: self.finalized,
        })
    }

    /// Componentwise combination with the inverse; encrypts `m1 - m2`.
    pub fn sub(&self, other: &Self) -> Result<Self, Error> {
        self.add(&other.neg())
    }

    /// Additive inverse in the exponent; encrypts `-m`.
    pub fn neg(&self) -> Self {
        Self {
            g: [
                self.g[0].unitary_inverse(),
                self.g[1].unitary_inverse(),
                self.g[2].unitary_inverse(),
                self.g[3].unitary_inverse(),
            ],
            finalized: self.finalized,
        }
    }

    /// Plaintext scaling in the exponent; encrypts `k·m`.
    pub fn mul_plain(&self, k: i64) -> Self {
        Self {
            g: [
                self.g[0].pow_i64(k),
                self.g[1].pow_i64(k),
                self.g[2].pow_i64(k),
                self.g[3].pow_i64(k),
            ],
            finalized: self.finalized,
        }
    }

    /// Applies the final exponentiation to every component, moving the
    /// ciphertext into the canonical subgroup state. Idempotent.
    pub fn final_exp(&self) -> Result<Self, Error> {
        if self.finalized {
            return Ok(*self);
        }
        Ok(Self {
            g: [
                B::final_exp(&self.g[0])?,
                B::final_exp(&self.g[1])?,
                B::final_exp(&self.g[2])?,
                B::final_exp(&self.g[3])?,
            ],
            finalized: true,
        })
    }
}

/// Tagged ciphertext: either the additive level-1 pair (the same plaintext
/// encrypted in G1 and G2, so it stays multiplicable) or a level-2 product.
///
/// Mixed-level operations are rejected by pattern match, not by panic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CipherText<B: PairingBackend> {
    /// Level-1: parallel G1/G2 encryptions of one plaintext.
    Additive(CipherTextG1<B>, CipherTextG2<B>),
    /// Level-2: product ciphertext in the pairing target.
    Multiplied(CipherTextGT<B>),
}

impl<B: PairingBackend> CipherText<B> {
    /// Whether this ciphertext has already been through a multiplication.
    pub fn is_multiplied(&self) -> bool {
        matches!(self, CipherText::Multiplied(_))
    }

    /// Homomorphic addition of same-level ciphertexts.
    pub fn add(&self, other: &Self) -> Result<Self, Error> {
        match (self, other) {
            (CipherText::Additive(a1, a2), CipherText::Additive(b1, b2)) => {
                Ok(CipherText::Additive(a1.add(b1), a2.add(b2)))
            }
            (CipherText::Multiplied(a), CipherText::Multiplied(b)) => {
                Ok(CipherText::Multiplied(a.add(b)?))
            }
            _ => Err(Error::LevelMismatch(
                "cannot add level-1 and level-2 ciphertexts",
            )),
        }
    }

    /// Homomorphic subtraction of same-level ciphertexts.
    pub fn sub(&self, other: &Self) -> Result<Self, Error> {
        self.add(&other.neg())
    }

    /// Additive inverse.
    pub fn neg(&self) -> Self {
        match self {
            CipherText::Additive(c1, c2) => CipherText::Additive(c1.neg(), c2.neg()),
            CipherText::Multiplied(ct) => CipherText::Multiplied(ct.neg()),
        }
    }

    /// Plaintext scaling.
    pub fn mul_plain(&self, k: i64) -> Self {
        match self {
            CipherText::Additive(c1, c2) => {
                CipherText::Additive(c1.mul_plain(k), c2.mul_plain(k))
            }
            CipherText::Multiplied(ct) => CipherText::Multiplied(ct.mul_plain(k)),
        }
    }

    /// The one multiplication. Both operands must still be level-1; the
    /// G1 half of `self` is paired against the G2 half of `other`.
    pub fn mul(&self, other: &Self) -> Result<Self, Error> {
        match (self, other) {
            (CipherText::Additive(c1, _), CipherText::Additive(_, c2)) => {
                Ok(CipherText::Multiplied(c1.mul(c2)))
            }
            _ => Err(Error::LevelMismatch(
                "cannot multiply a level-2 ciphertext",
            )),
        }
    }
}
