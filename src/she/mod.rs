//! The BGN-style somewhat-homomorphic encryption scheme.
//!
//! This module implements the scheme proper on top of the abstract pairing
//! backend: key material, encryption into the three groups, the homomorphic
//! operations, conversion and re-randomization, BSGS decryption, and the
//! Fiat–Shamir proofs.
//!
//! # Protocol overview
//!
//! 1. **Context** ([`Params::setup`]): validate the configuration and derive
//!    the generators `P` and `Q` by hashing a fixed string to each group.
//!
//! 2. **Key generation** ([`SecretKey::generate`]): sample the secret
//!    scalars; derive `B1 = (x1·y1 - z1)·P`, `B2 = (x2·y2 - z2)·Q` and
//!    `g = e(B1, B2)`; build the decryption tables with
//!    [`SecretKey::set_decode_range`]; publish [`SecretKey::public_key`].
//!
//! 3. **Encryption** ([`PublicKey::encrypt_g1`], [`PublicKey::encrypt_g2`],
//!    [`PublicKey::encrypt_gt`], [`PublicKey::encrypt`]): a level-1
//!    ciphertext is `(m·yP + r·P, m·zP + r·xP)` with fresh `r`, and
//!    symmetrically in G2; the target-group form is a converted G1
//!    encryption.
//!
//! 4. **Homomorphic evaluation**: unlimited additions and plaintext scaling
//!    at either level; exactly one multiplication
//!    [`CipherTextG1::mul`] pairing a G1 against a G2 ciphertext, with the
//!    final exponentiation deferred until decryption or an explicit
//!    [`CipherTextGT::final_exp`].
//!
//! 5. **Decryption** ([`SecretKey::decrypt_g1`] and friends): reduce the
//!    ciphertext to `m·B1` (or `g^m`) and recover `m` from the BSGS table.

mod ciphertext;
mod keys;
mod params;
mod zkp;

pub use ciphertext::{CipherText, CipherTextG1, CipherTextG2, CipherTextGT};
pub use keys::{PrecomputedPublicKey, PublicKey, SecretKey};
pub use params::Params;
pub use zkp::{ZkpBin, ZkpEq};

#[cfg(test)]
mod tests {
    #![allow(unused_imports)]

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::backend::{FieldElement, PairingBackend};
    use crate::config::SheConfig;
    use crate::errors::Error;

    fn setup<B: PairingBackend>(
        hash_size: u32,
        try_num: u32,
        seed: u64,
    ) -> (Params<B>, SecretKey<B>, PublicKey<B>, StdRng) {
        let config = SheConfig::new(B::CURVE, hash_size).with_try_num(try_num);
        let params = Params::<B>::setup(&config).expect("params");
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sk = SecretKey::generate(&params, &mut rng).expect("keygen");
        sk.set_decode_range(params.hash_size, params.try_num)
            .expect("decode range");
        let pk = sk.public_key(&params);
        (params, sk, pk, rng)
    }

    fn roundtrip_all_groups_helper<B: PairingBackend>() {
        let (params, sk, pk, mut rng) = setup::<B>(256, 0, 1);

        for m in [123i64, -123, 0, 255, -255] {
            let c1 = pk.encrypt_g1(m, &mut rng);
            assert_eq!(sk.decrypt_g1(&c1).expect("dec g1"), m);
            assert_eq!(sk.decrypt_g1_via_gt(&params, &c1).expect("via gt"), m);

            let c2 = pk.encrypt_g2(m, &mut rng);
            assert_eq!(sk.decrypt_g2(&c2).expect("dec g2"), m);
            assert_eq!(sk.decrypt_g2_via_gt(&params, &c2).expect("via gt"), m);

            let ct = pk.encrypt_gt(m, &mut rng).expect("enc gt");
            assert_eq!(sk.decrypt_gt(&ct).expect("dec gt"), m);
        }

        let both = pk.encrypt(123, &mut rng);
        assert_eq!(sk.decrypt(&both).expect("dec"), 123);
    }

    fn decrypt_requires_decode_range_helper<B: PairingBackend>() {
        let config = SheConfig::new(B::CURVE, 16);
        let params = Params::<B>::setup(&config).expect("params");
        let mut rng = StdRng::seed_from_u64(2);
        let sk = SecretKey::<B>::generate(&params, &mut rng).expect("keygen");
        let pk = sk.public_key(&params);
        let ct = pk.encrypt_g1(1, &mut rng);
        assert!(matches!(sk.decrypt_g1(&ct), Err(Error::InitOrder(_))));
    }

    fn is_zero_helper<B: PairingBackend>() {
        let (_, sk, pk, mut rng) = setup::<B>(16, 0, 3);
        for m in -3i64..3 {
            let c1 = pk.encrypt_g1(m, &mut rng);
            assert_eq!(sk.is_zero_g1(&c1), m == 0);
            let c2 = pk.encrypt_g2(m, &mut rng);
            assert_eq!(sk.is_zero_g2(&c2), m == 0);
            let ct = pk.encrypt_gt(m, &mut rng).expect("enc gt");
            assert_eq!(sk.is_zero_gt(&ct).expect("mask"), m == 0);
        }
    }

    fn homomorphism_helper<B: PairingBackend>() {
        let (_, sk, pk, mut rng) = setup::<B>(256, 0, 4);

        let m1 = 12i64;
        let m2 = -9i64;

        let sum = pk.encrypt_g1(m1, &mut rng).add(&pk.encrypt_g1(m2, &mut rng));
        assert_eq!(sk.decrypt_g1(&sum).expect("dec"), m1 + m2);

        let diff = pk.encrypt_g2(m1, &mut rng).sub(&pk.encrypt_g2(m2, &mut rng));
        assert_eq!(sk.decrypt_g2(&diff).expect("dec"), m1 - m2);

        let scaled = pk.encrypt_g1(m2, &mut rng).mul_plain(-7);
        assert_eq!(sk.decrypt_g1(&scaled).expect("dec"), -7 * m2);

        let product = pk.encrypt_g1(m1, &mut rng).mul(&pk.encrypt_g2(m2, &mut rng));
        assert_eq!(sk.decrypt_gt(&product).expect("dec"), m1 * m2);

        let gt_sum = pk
            .encrypt_gt(m1, &mut rng)
            .expect("enc")
            .add(&pk.encrypt_gt(m2, &mut rng).expect("enc"))
            .expect("add");
        assert_eq!(sk.decrypt_gt(&gt_sum).expect("dec"), m1 + m2);

        let gt_neg = pk.encrypt_gt(m1, &mut rng).expect("enc").neg();
        assert_eq!(sk.decrypt_gt(&gt_neg).expect("dec"), -m1);
    }

    fn chained_ops_helper<B: PairingBackend>() {
        let (_, sk, pk, mut rng) = setup::<B>(1 << 10, 70, 5);

        let (m1, m2, m3, m4) = (12i64, -9i64, 12i64, -9i64);

        let c1 = pk
            .encrypt_g1(m1, &mut rng)
            .sub(&pk.encrypt_g1(m2, &mut rng))
            .mul_plain(4);
        let c2 = pk
            .encrypt_g2(m3, &mut rng)
            .sub(&pk.encrypt_g2(m4, &mut rng))
            .mul_plain(-5);
        let ct = c1.mul(&c2);
        let ct = ct.add(&ct).expect("add").mul_plain(-4);

        let expected = 160 * (m1 - m2) * (m3 - m4);
        assert_eq!(expected, 70560);
        assert_eq!(sk.decrypt_gt(&ct).expect("dec"), expected);
    }

    fn final_exp_split_helper<B: PairingBackend>() {
        let (_, sk, pk, mut rng) = setup::<B>(256, 0, 6);

        let (m11, m12, m21, m22) = (5i64, 7i64, -3i64, 9i64);
        let c11 = pk.encrypt_g1(m11, &mut rng);
        let c12 = pk.encrypt_g1(m12, &mut rng);
        let c21 = pk.encrypt_g2(m21, &mut rng);
        let c22 = pk.encrypt_g2(m22, &mut rng);

        // Deferred state decrypts directly.
        let ml1 = c11.mul(&c21);
        assert_eq!(sk.decrypt_gt(&ml1).expect("dec"), m11 * m21);

        // Explicit final exponentiation gives the same plaintext.
        let fe1 = ml1.final_exp().expect("final exp");
        assert!(fe1.is_finalized());
        assert_eq!(sk.decrypt_gt(&fe1).expect("dec"), m11 * m21);

        // Sum of Miller-loop products, exponentiated once.
        let ml2 = c12.mul(&c22);
        let combined = ml1.add(&ml2).expect("add").final_exp().expect("final exp");
        assert_eq!(sk.decrypt_gt(&combined).expect("dec"), m11 * m21 + m12 * m22);
        assert_eq!(m11 * m21 + m12 * m22, 48);

        // Deferred addition equals finalized addition.
        let eager = fe1
            .add(&ml2.final_exp().expect("final exp"))
            .expect("add");
        assert_eq!(sk.decrypt_gt(&eager).expect("dec"), 48);

        // The two representation states do not mix.
        assert!(matches!(
            ml1.add(&fe1),
            Err(Error::LevelMismatch(_))
        ));
    }

    fn convert_helper<B: PairingBackend>() {
        let (_, sk, pk, mut rng) = setup::<B>(256, 0, 7);

        let m = 123i64;
        let c1 = pk.encrypt_g1(m, &mut rng);
        assert_eq!(sk.decrypt_gt(&pk.convert_g1(&c1)).expect("dec"), m);

        let c2 = pk.encrypt_g2(m, &mut rng);
        assert_eq!(sk.decrypt_gt(&pk.convert_g2(&c2)).expect("dec"), m);

        let both = pk.encrypt(m, &mut rng);
        let lifted = pk.convert(&both).expect("convert");
        assert_eq!(sk.decrypt(&lifted).expect("dec"), m);
        assert!(matches!(
            pk.convert(&lifted),
            Err(Error::LevelMismatch(_))
        ));
    }

    fn rerandomize_helper<B: PairingBackend + PartialEq>() {
        let (_, sk, pk, mut rng) = setup::<B>(256, 0, 8);

        let m1 = 12i64;
        let m2 = -9i64;
        let m3 = 12i64;

        let c1 = pk.encrypt_g1(m1, &mut rng);
        let c1r = pk.rerandomize_g1(&c1, &mut rng);
        assert_ne!(c1, c1r);
        assert_eq!(sk.decrypt_g1(&c1r).expect("dec"), m1);

        let c2 = pk.encrypt_g2(m2, &mut rng);
        let c2r = pk.rerandomize_g2(&c2, &mut rng);
        assert_ne!(c2, c2r);
        assert_eq!(sk.decrypt_g2(&c2r).expect("dec"), m2);

        // Level-1 GT ciphertext (finalized state).
        let ct1 = pk.encrypt_gt(m3, &mut rng).expect("enc");
        let ct1r = pk.rerandomize_gt(&ct1, &mut rng).expect("rerand");
        assert_ne!(ct1, ct1r);
        assert_eq!(sk.decrypt_gt(&ct1r).expect("dec"), m3);

        // Level-2 product (deferred state).
        let ct2 = c1r.mul(&c2r);
        let ct2r = pk.rerandomize_gt(&ct2, &mut rng).expect("rerand");
        assert_ne!(ct2, ct2r);
        assert_eq!(sk.decrypt_gt(&ct2r).expect("dec"), m1 * m2);

        // Rerandomized product plus a fresh GT encryption, states aligned
        // first.
        let combined = ct1r
            .add(&ct2r.final_exp().expect("final exp"))
            .expect("add");
        assert_eq!(sk.decrypt_gt(&combined).expect("dec"), m1 * m2 + m3);
    }

    fn zkp_bin_helper<B: PairingBackend>() {
        let (_, sk, pk, mut rng) = setup::<B>(16, 0, 9);

        for m in 0i64..2 {
            let (c1, proof) = pk.encrypt_g1_with_zkp_bin(m, &mut rng).expect("prove");
            assert_eq!(sk.decrypt_g1(&c1).expect("dec"), m);
            assert!(pk.verify_zkp_bin_g1(&c1, &proof));

            let mut tampered = proof;
            tampered.d[0] = tampered.d[0] + B::Scalar::one();
            assert!(!pk.verify_zkp_bin_g1(&c1, &tampered));

            // A proof for a different ciphertext does not transfer.
            let other = pk.encrypt_g1(m, &mut rng);
            assert!(!pk.verify_zkp_bin_g1(&other, &proof));

            let (c2, proof) = pk.encrypt_g2_with_zkp_bin(m, &mut rng).expect("prove");
            assert_eq!(sk.decrypt_g2(&c2).expect("dec"), m);
            assert!(pk.verify_zkp_bin_g2(&c2, &proof));

            let mut tampered = proof;
            tampered.d[3] = tampered.d[3] + B::Scalar::one();
            assert!(!pk.verify_zkp_bin_g2(&c2, &tampered));
        }

        assert!(matches!(
            pk.encrypt_g1_with_zkp_bin(2, &mut rng),
            Err(Error::OutOfRange(_))
        ));
        assert!(matches!(
            pk.encrypt_g2_with_zkp_bin(-1, &mut rng),
            Err(Error::OutOfRange(_))
        ));
    }

    fn zkp_eq_helper<B: PairingBackend>() {
        let (_, sk, pk, mut rng) = setup::<B>(256, 0, 10);

        let (c1, c2, proof) = pk.encrypt_with_zkp_eq(77, &mut rng);
        assert_eq!(sk.decrypt_g1(&c1).expect("dec"), 77);
        assert_eq!(sk.decrypt_g2(&c2).expect("dec"), 77);
        assert!(pk.verify_zkp_eq(&c1, &c2, &proof));

        let mut tampered = proof;
        tampered.d[1] = tampered.d[1] + B::Scalar::one();
        assert!(!pk.verify_zkp_eq(&c1, &c2, &tampered));

        // Ciphertexts of different plaintexts do not verify against it.
        let other = pk.encrypt_g2(78, &mut rng);
        assert!(!pk.verify_zkp_eq(&c1, &other, &proof));
    }

    fn dlp_escape_helper<B: PairingBackend>() {
        let (_, sk, pk, mut rng) = setup::<B>(8, 2, 11);
        let limit = 8 * (2 + 1) as i64;

        for m in [limit, -limit] {
            let c1 = pk.encrypt_g1(m, &mut rng);
            assert_eq!(sk.decrypt_g1(&c1).expect("dec"), m);
            let ct = pk.encrypt_gt(m, &mut rng).expect("enc");
            assert_eq!(sk.decrypt_gt(&ct).expect("dec"), m);
        }
        for m in [limit + 1, -(limit + 1)] {
            let c1 = pk.encrypt_g1(m, &mut rng);
            assert!(matches!(sk.decrypt_g1(&c1), Err(Error::DlpOutOfRange)));
            let ct = pk.encrypt_gt(m, &mut rng).expect("enc");
            assert!(matches!(sk.decrypt_gt(&ct), Err(Error::DlpOutOfRange)));
        }
    }

    fn table_save_load_helper<B: PairingBackend>() {
        let (_, mut sk, pk, mut rng) = setup::<B>(256, 0, 12);

        let m = 255i64;
        let ct = pk.encrypt_gt(m, &mut rng).expect("enc");
        assert_eq!(sk.decrypt_gt(&ct).expect("dec"), m);

        let saved = sk.save_gt_table().expect("save");

        // Shrinking the range makes the same ciphertext undecodable.
        sk.set_decode_range(1, 1).expect("decode range");
        assert!(matches!(sk.decrypt_gt(&ct), Err(Error::DlpOutOfRange)));

        // Restoring the saved table brings the plaintext back.
        sk.load_gt_table(&saved).expect("load");
        assert_eq!(sk.decrypt_gt(&ct).expect("dec"), m);
    }

    fn precomputed_key_helper<B: PairingBackend + PartialEq>() {
        let (_, sk, pk, mut rng) = setup::<B>(256, 0, 13);
        let ppk = PrecomputedPublicKey::new(&pk);

        let m = 152i64;
        assert_eq!(
            sk.decrypt_g1(&ppk.encrypt_g1(m, &mut rng)).expect("dec"),
            m
        );
        assert_eq!(
            sk.decrypt_g2(&ppk.encrypt_g2(m, &mut rng)).expect("dec"),
            m
        );
        assert_eq!(
            sk.decrypt_gt(&ppk.encrypt_gt(m, &mut rng).expect("enc"))
                .expect("dec"),
            m
        );

        // Prepared conversion agrees with the plain one.
        let c1 = pk.encrypt_g1(m, &mut rng);
        assert_eq!(ppk.convert_g1(&c1), pk.convert_g1(&c1));

        let ct = c1.mul(&pk.encrypt_g2(-1, &mut rng));
        let rerand = ppk.rerandomize_gt(&ct, &mut rng).expect("rerand");
        assert_eq!(sk.decrypt_gt(&rerand).expect("dec"), -m);

        let (cb, proof) = ppk.encrypt_g1_with_zkp_bin(1, &mut rng).expect("prove");
        assert!(ppk.verify_zkp_bin_g1(&cb, &proof));
    }

    fn tagged_ciphertext_helper<B: PairingBackend>() {
        let (_, sk, pk, mut rng) = setup::<B>(256, 0, 14);

        let a = pk.encrypt(6, &mut rng);
        let b = pk.encrypt(-4, &mut rng);

        let sum = a.add(&b).expect("add");
        assert_eq!(sk.decrypt(&sum).expect("dec"), 2);
        assert!(!sum.is_multiplied());

        let product = a.mul(&b).expect("mul");
        assert!(product.is_multiplied());
        assert_eq!(sk.decrypt(&product).expect("dec"), -24);

        let scaled = product.mul_plain(3);
        assert_eq!(sk.decrypt(&scaled).expect("dec"), -72);

        assert!(matches!(a.add(&product), Err(Error::LevelMismatch(_))));
        assert!(matches!(product.mul(&b), Err(Error::LevelMismatch(_))));

        let rerand = pk.rerandomize(&product, &mut rng).expect("rerand");
        assert_eq!(sk.decrypt(&rerand).expect("dec"), -24);
        assert!(!sk.is_zero(&rerand).expect("mask"));
    }

    macro_rules! backend_tests {
        ($name:ident, $helper:ident) => {
            #[test]
            fn $name() {
                #[cfg(feature = "bls12_381")]
                $helper::<crate::backend::Bls12_381Backend>();
                #[cfg(feature = "bn254")]
                $helper::<crate::backend::Bn254Backend>();
            }
        };
    }

    backend_tests!(roundtrip_all_groups, roundtrip_all_groups_helper);
    backend_tests!(
        decrypt_requires_decode_range,
        decrypt_requires_decode_range_helper
    );
    backend_tests!(is_zero_agrees_with_decrypt, is_zero_helper);
    backend_tests!(homomorphism, homomorphism_helper);
    backend_tests!(chained_ops, chained_ops_helper);
    backend_tests!(final_exp_split, final_exp_split_helper);
    backend_tests!(convert_commutes_with_decrypt, convert_helper);
    backend_tests!(rerandomize_preserves_plaintext, rerandomize_helper);
    backend_tests!(zkp_bin, zkp_bin_helper);
    backend_tests!(zkp_eq, zkp_eq_helper);
    backend_tests!(dlp_escape_boundary, dlp_escape_helper);
    backend_tests!(table_save_load, table_save_load_helper);
    backend_tests!(precomputed_key, precomputed_key_helper);
    backend_tests!(tagged_ciphertext_ops, tagged_ciphertext_helper);
}
