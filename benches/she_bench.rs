use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use bgn_she::{
    Bls12_381Backend, CurveId, Params, PrecomputedPublicKey, SecretKey, SheConfig,
};

/// Full-flow benchmark with setup done once:
/// - params + keygen + decode tables are built outside the measured loops
/// - level-1 encryption, the one multiplication, and decryption are measured
pub fn bench_she(c: &mut Criterion) {
    // Deterministic RNG for repeatable benchmarks
    let mut rng = StdRng::seed_from_u64(0xdead_beef);

    type BE = Bls12_381Backend;

    let config = SheConfig::new(CurveId::Bls12_381, 1 << 12).with_try_num(16);
    let params = Params::<BE>::setup(&config).expect("params failed");

    let mut sk = SecretKey::generate(&params, &mut rng).expect("keygen failed");
    sk.set_decode_range(params.hash_size, params.try_num)
        .expect("decode range failed");
    let pk = sk.public_key(&params);
    let ppk = PrecomputedPublicKey::new(&pk);

    c.bench_function("encrypt_g1", |b| {
        b.iter(|| {
            let ct = pk.encrypt_g1(1234, &mut rng);
            black_box(ct);
        })
    });

    c.bench_function("encrypt_gt", |b| {
        b.iter(|| {
            let ct = pk.encrypt_gt(1234, &mut rng).expect("encrypt failed");
            black_box(ct);
        })
    });

    c.bench_function("encrypt_gt_precomputed", |b| {
        b.iter(|| {
            let ct = ppk.encrypt_gt(1234, &mut rng).expect("encrypt failed");
            black_box(ct);
        })
    });

    let c1 = pk.encrypt_g1(123, &mut rng);
    let c2 = pk.encrypt_g2(-45, &mut rng);

    c.bench_function("mul", |b| {
        b.iter(|| {
            let ct = c1.mul(&c2);
            black_box(ct);
        })
    });

    let product = c1.mul(&c2);

    c.bench_function("decrypt_g1", |b| {
        b.iter(|| {
            let m = sk.decrypt_g1(&c1).expect("decrypt failed");
            black_box(m);
        })
    });

    c.bench_function("decrypt_gt_level2", |b| {
        b.iter(|| {
            let m = sk.decrypt_gt(&product).expect("decrypt failed");
            black_box(m);
        })
    });
}

criterion_group!(benches, bench_she);
criterion_main!(benches);
