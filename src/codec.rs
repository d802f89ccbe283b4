//! Fixed-size binary encodings for all exported objects.
//!
//! Every encoding is the little-endian concatenation of the canonical
//! compressed forms of its components; decoders check the exact expected
//! length, points validate curve and subgroup membership, and scalars must
//! be canonical. The secret key exports only its two seed scalars; the
//! receiver re-derives the remaining scalars and the pairing cache.

use crate::backend::{FieldElement, GroupPoint, PairingBackend, TargetElement};
use crate::errors::{BackendError, Error};
use crate::she::{
    CipherTextG1, CipherTextG2, CipherTextGT, Params, PublicKey, SecretKey, ZkpBin, ZkpEq,
};

fn point_err(err: BackendError) -> Error {
    match err {
        BackendError::InvalidPoint => Error::InvalidPoint,
        _ => Error::Serialization("malformed group element"),
    }
}

fn take<'a>(bytes: &mut &'a [u8], n: usize) -> &'a [u8] {
    let (head, tail) = bytes.split_at(n);
    *bytes = tail;
    head
}

fn read_scalar<B: PairingBackend>(bytes: &mut &[u8]) -> Result<B::Scalar, Error> {
    B::Scalar::from_bytes_le(take(bytes, B::Scalar::SERIALIZED_LEN))
        .map_err(|_| Error::Serialization("non-canonical scalar"))
}

fn read_g1<B: PairingBackend>(bytes: &mut &[u8]) -> Result<B::G1, Error> {
    B::G1::from_bytes(take(bytes, B::G1::SERIALIZED_LEN)).map_err(point_err)
}

fn read_g2<B: PairingBackend>(bytes: &mut &[u8]) -> Result<B::G2, Error> {
    B::G2::from_bytes(take(bytes, B::G2::SERIALIZED_LEN)).map_err(point_err)
}

fn read_target<B: PairingBackend>(bytes: &mut &[u8]) -> Result<B::Target, Error> {
    B::Target::from_bytes(take(bytes, B::Target::SERIALIZED_LEN))
        .map_err(|_| Error::Serialization("malformed target element"))
}

impl<B: PairingBackend> SecretKey<B> {
    /// Encoded size: the two seed scalars.
    pub const SERIALIZED_LEN: usize = 2 * B::Scalar::SERIALIZED_LEN;

    /// Serializes the seed scalars `x1 ‖ x2`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SERIALIZED_LEN);
        out.extend_from_slice(&self.x1.to_bytes_le());
        out.extend_from_slice(&self.x2.to_bytes_le());
        out
    }

    /// Rebuilds the full key from the seed scalars, re-deriving the `y`/`z`
    /// scalars and the pairing cache. The decode range starts unset.
    pub fn from_bytes(params: &Params<B>, bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SERIALIZED_LEN {
            return Err(Error::Serialization("secret key length mismatch"));
        }
        let mut cursor = bytes;
        let x1 = read_scalar::<B>(&mut cursor)?;
        let x2 = read_scalar::<B>(&mut cursor)?;
        Self::from_seed_scalars(params, x1, x2)
    }
}

impl<B: PairingBackend> PublicKey<B> {
    /// Encoded size: the six published points, compressed.
    pub const SERIALIZED_LEN: usize = 3 * B::G1::SERIALIZED_LEN + 3 * B::G2::SERIALIZED_LEN;

    /// Serializes `xP ‖ yP ‖ zP ‖ xQ ‖ yQ ‖ zQ`; the generators are not
    /// exported (they are re-derived from the context).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SERIALIZED_LEN);
        for point in [&self.xp, &self.yp, &self.zp] {
            out.extend_from_slice(&point.to_bytes());
        }
        for point in [&self.xq, &self.yq, &self.zq] {
            out.extend_from_slice(&point.to_bytes());
        }
        out
    }

    /// Decodes a public key, validating every point.
    pub fn from_bytes(params: &Params<B>, bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SERIALIZED_LEN {
            return Err(Error::Serialization("public key length mismatch"));
        }
        let mut cursor = bytes;
        let xp = read_g1::<B>(&mut cursor)?;
        let yp = read_g1::<B>(&mut cursor)?;
        let zp = read_g1::<B>(&mut cursor)?;
        let xq = read_g2::<B>(&mut cursor)?;
        let yq = read_g2::<B>(&mut cursor)?;
        let zq = read_g2::<B>(&mut cursor)?;
        Ok(Self {
            p: params.p,
            xp,
            yp,
            zp,
            q: params.q,
            xq,
            yq,
            zq,
        })
    }
}

impl<B: PairingBackend> CipherTextG1<B> {
    /// Encoded size: the two components, compressed.
    pub const SERIALIZED_LEN: usize = 2 * B::G1::SERIALIZED_LEN;

    /// Serializes `S ‖ T`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SERIALIZED_LEN);
        out.extend_from_slice(&self.s.to_bytes());
        out.extend_from_slice(&self.t.to_bytes());
        out
    }

    /// Decodes a G1 ciphertext, validating both points.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SERIALIZED_LEN {
            return Err(Error::Serialization("G1 ciphertext length mismatch"));
        }
        let mut cursor = bytes;
        let s = read_g1::<B>(&mut cursor)?;
        let t = read_g1::<B>(&mut cursor)?;
        Ok(Self { s, t })
    }
}

impl<B: PairingBackend> CipherTextG2<B> {
    /// Encoded size: the two components, compressed.
    pub const SERIALIZED_LEN: usize = 2 * B::G2::SERIALIZED_LEN;

    /// Serializes `S ‖ T`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SERIALIZED_LEN);
        out.extend_from_slice(&self.s.to_bytes());
        out.extend_from_slice(&self.t.to_bytes());
        out
    }

    /// Decodes a G2 ciphertext, validating both points.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SERIALIZED_LEN {
            return Err(Error::Serialization("G2 ciphertext length mismatch"));
        }
        let mut cursor = bytes;
        let s = read_g2::<B>(&mut cursor)?;
        let t = read_g2::<B>(&mut cursor)?;
        Ok(Self { s, t })
    }
}

impl<B: PairingBackend> CipherTextGT<B> {
    /// Encoded size: one state byte plus the four target components.
    pub const SERIALIZED_LEN: usize = 1 + 4 * B::Target::SERIALIZED_LEN;

    /// Serializes the representation state followed by the four components.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SERIALIZED_LEN);
        out.push(self.finalized as u8);
        for component in &self.g {
            out.extend_from_slice(&component.to_bytes());
        }
        out
    }

    /// Decodes a GT ciphertext.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SERIALIZED_LEN {
            return Err(Error::Serialization("GT ciphertext length mismatch"));
        }
        let finalized = match bytes[0] {
            0 => false,
            1 => true,
            _ => return Err(Error::Serialization("invalid GT ciphertext state byte")),
        };
        let mut cursor = &bytes[1..];
        let g = [
            read_target::<B>(&mut cursor)?,
            read_target::<B>(&mut cursor)?,
            read_target::<B>(&mut cursor)?,
            read_target::<B>(&mut cursor)?,
        ];
        Ok(Self { g, finalized })
    }
}

impl<B: PairingBackend> ZkpBin<B> {
    /// Encoded size: four scalars.
    pub const SERIALIZED_LEN: usize = 4 * B::Scalar::SERIALIZED_LEN;

    /// Serializes `c0 ‖ s0 ‖ c1 ‖ s1`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SERIALIZED_LEN);
        for scalar in &self.d {
            out.extend_from_slice(&scalar.to_bytes_le());
        }
        out
    }

    /// Decodes a bit proof.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SERIALIZED_LEN {
            return Err(Error::Serialization("bit proof length mismatch"));
        }
        let mut cursor = bytes;
        let d = [
            read_scalar::<B>(&mut cursor)?,
            read_scalar::<B>(&mut cursor)?,
            read_scalar::<B>(&mut cursor)?,
            read_scalar::<B>(&mut cursor)?,
        ];
        Ok(Self { d })
    }
}

impl<B: PairingBackend> ZkpEq<B> {
    /// Encoded size: four scalars.
    pub const SERIALIZED_LEN: usize = 4 * B::Scalar::SERIALIZED_LEN;

    /// Serializes `c ‖ sm ‖ s1 ‖ s2`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SERIALIZED_LEN);
        for scalar in &self.d {
            out.extend_from_slice(&scalar.to_bytes_le());
        }
        out
    }

    /// Decodes an equal-plaintext proof.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SERIALIZED_LEN {
            return Err(Error::Serialization("equality proof length mismatch"));
        }
        let mut cursor = bytes;
        let d = [
            read_scalar::<B>(&mut cursor)?,
            read_scalar::<B>(&mut cursor)?,
            read_scalar::<B>(&mut cursor)?,
            read_scalar::<B>(&mut cursor)?,
        ];
        Ok(Self { d })
    }
}

#[cfg(test)]
mod tests {
    #![allow(unused_imports)]

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::backend::PairingBackend;
    use crate::config::{CurveId, SheConfig};
    use crate::errors::Error;
    use crate::she::{
        CipherTextG1, CipherTextG2, CipherTextGT, Params, PublicKey, SecretKey, ZkpBin,
    };

    fn setup<B: PairingBackend>() -> (Params<B>, SecretKey<B>, PublicKey<B>, StdRng) {
        let config = SheConfig::new(B::CURVE, 16);
        let params = Params::<B>::setup(&config).expect("params");
        let mut rng = StdRng::seed_from_u64(0x5e_ed);
        let sk = SecretKey::generate(&params, &mut rng).expect("keygen");
        let pk = sk.public_key(&params);
        (params, sk, pk, rng)
    }

    fn key_roundtrip_helper<B: PairingBackend + PartialEq>() {
        let (params, sk, pk, _) = setup::<B>();

        let sk_bytes = sk.to_bytes();
        assert_eq!(sk_bytes.len(), SecretKey::<B>::SERIALIZED_LEN);
        let sk2 = SecretKey::<B>::from_bytes(&params, &sk_bytes).expect("sk decode");
        assert_eq!(sk2.to_bytes(), sk_bytes);
        // The restored key derives the same public key.
        assert_eq!(sk2.public_key(&params), pk);

        let pk_bytes = pk.to_bytes();
        assert_eq!(pk_bytes.len(), PublicKey::<B>::SERIALIZED_LEN);
        let pk2 = PublicKey::<B>::from_bytes(&params, &pk_bytes).expect("pk decode");
        assert_eq!(pk2, pk);
        assert_eq!(pk2.to_bytes(), pk_bytes);
    }

    fn ciphertext_roundtrip_helper<B: PairingBackend + PartialEq>() {
        let (_, _, pk, mut rng) = setup::<B>();

        let c1 = pk.encrypt_g1(7, &mut rng);
        let c1_bytes = c1.to_bytes();
        assert_eq!(c1_bytes.len(), CipherTextG1::<B>::SERIALIZED_LEN);
        assert_eq!(
            CipherTextG1::<B>::from_bytes(&c1_bytes).expect("decode"),
            c1
        );

        let c2 = pk.encrypt_g2(-5, &mut rng);
        let c2_bytes = c2.to_bytes();
        assert_eq!(c2_bytes.len(), CipherTextG2::<B>::SERIALIZED_LEN);
        assert_eq!(
            CipherTextG2::<B>::from_bytes(&c2_bytes).expect("decode"),
            c2
        );

        // Both representation states of a GT ciphertext round-trip.
        let product = c1.mul(&c2);
        let ml_bytes = product.to_bytes();
        assert_eq!(ml_bytes.len(), CipherTextGT::<B>::SERIALIZED_LEN);
        let restored = CipherTextGT::<B>::from_bytes(&ml_bytes).expect("decode");
        assert_eq!(restored, product);
        assert!(!restored.is_finalized());

        let finalized = product.final_exp().expect("final exp");
        let fe_bytes = finalized.to_bytes();
        let restored = CipherTextGT::<B>::from_bytes(&fe_bytes).expect("decode");
        assert_eq!(restored, finalized);
        assert!(restored.is_finalized());
    }

    fn proof_roundtrip_helper<B: PairingBackend + PartialEq>() {
        let (_, _, pk, mut rng) = setup::<B>();
        let (ct, proof) = pk.encrypt_g1_with_zkp_bin(1, &mut rng).expect("proof");
        let bytes = proof.to_bytes();
        assert_eq!(bytes.len(), ZkpBin::<B>::SERIALIZED_LEN);
        let restored = ZkpBin::<B>::from_bytes(&bytes).expect("decode");
        assert_eq!(restored, proof);
        assert!(pk.verify_zkp_bin_g1(&ct, &restored));
    }

    fn rejection_helper<B: PairingBackend>() {
        let (params, sk, pk, mut rng) = setup::<B>();

        let mut short = sk.to_bytes();
        short.pop();
        assert!(matches!(
            SecretKey::<B>::from_bytes(&params, &short),
            Err(Error::Serialization(_))
        ));

        // An all-ones buffer is not a valid compressed point.
        let garbage = vec![0xffu8; PublicKey::<B>::SERIALIZED_LEN];
        assert!(matches!(
            PublicKey::<B>::from_bytes(&params, &garbage),
            Err(Error::InvalidPoint) | Err(Error::Serialization(_))
        ));

        let ct = pk.encrypt_gt(3, &mut rng).expect("encrypt");
        let mut bytes = ct.to_bytes();
        bytes[0] = 7;
        assert!(matches!(
            CipherTextGT::<B>::from_bytes(&bytes),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn key_roundtrip() {
        #[cfg(feature = "bls12_381")]
        key_roundtrip_helper::<crate::backend::Bls12_381Backend>();
        #[cfg(feature = "bn254")]
        key_roundtrip_helper::<crate::backend::Bn254Backend>();
    }

    #[test]
    fn ciphertext_roundtrip() {
        #[cfg(feature = "bls12_381")]
        ciphertext_roundtrip_helper::<crate::backend::Bls12_381Backend>();
        #[cfg(feature = "bn254")]
        ciphertext_roundtrip_helper::<crate::backend::Bn254Backend>();
    }

    #[test]
    fn proof_roundtrip() {
        #[cfg(feature = "bls12_381")]
        proof_roundtrip_helper::<crate::backend::Bls12_381Backend>();
        #[cfg(feature = "bn254")]
        proof_roundtrip_helper::<crate::backend::Bn254Backend>();
    }

    #[test]
    fn malformed_encodings_are_rejected() {
        #[cfg(feature = "bls12_381")]
        rejection_helper::<crate::backend::Bls12_381Backend>();
        #[cfg(feature = "bn254")]
        rejection_helper::<crate::backend::Bn254Backend>();
    }
}
