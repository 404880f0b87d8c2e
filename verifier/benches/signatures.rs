use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use verifier::{EcdsaVerifier, ProofVerifier, SchnorrVerifier, SigningKey, VerifyingKey};

fn bench_sign(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let sk = SigningKey::random(&mut rng);
    let msg = [7u8; 32];

    c.bench_function("schnorr_sign", |bencher| {
        bencher.iter(|| {
            let proof = sk.sign_schnorr(black_box(&msg)).expect("sign");
            black_box(proof);
        })
    });

    c.bench_function("ecdsa_sign", |bencher| {
        bencher.iter(|| {
            let sig = sk.sign_ecdsa(black_box(&msg)).expect("sign");
            black_box(sig);
        })
    });
}

fn bench_verify(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let sk = SigningKey::random(&mut rng);
    let vk = VerifyingKey::from(&sk);
    let msg = [7u8; 32];
    let proof = sk.sign_schnorr(&msg).expect("sign");
    let der = sk.sign_ecdsa(&msg).expect("sign").to_der();
    let key = vk.to_compressed();
    let proof_bytes = proof.to_bytes();

    c.bench_function("schnorr_verify", |bencher| {
        bencher.iter(|| {
            let ok = vk.verify_schnorr(black_box(&msg), black_box(&proof)).expect("verify");
            black_box(ok);
        })
    });

    c.bench_function("schnorr_verify_from_bytes", |bencher| {
        bencher.iter(|| {
            let outcome = SchnorrVerifier.verify(black_box(&key), black_box(&proof_bytes), &msg);
            black_box(outcome);
        })
    });

    c.bench_function("ecdsa_verify_from_bytes", |bencher| {
        bencher.iter(|| {
            let outcome = EcdsaVerifier.verify(black_box(&key), black_box(&der), &msg);
            black_box(outcome);
        })
    });
}

criterion_group!(benches, bench_sign, bench_verify);
criterion_main!(benches);
