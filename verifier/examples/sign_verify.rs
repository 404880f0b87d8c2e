use rand::SeedableRng;
use rand::rngs::StdRng;
use verifier::{
    EcdsaSignature, EcdsaVerifier, ProofVerifier, SchnorrProof, SchnorrVerifier, SigningKey,
    VerifyingKey,
};

fn main() {
    let mut rng = StdRng::seed_from_u64(42);
    let sk = SigningKey::random(&mut rng).normalized_for_x_only();
    let vk = VerifyingKey::from(&sk);

    let sk_bytes = bincode::serialize(&sk).expect("serialize sk");
    let vk_bytes = bincode::serialize(&vk).expect("serialize vk");

    let nonce = [0x42u8; 32];

    let proof = sk.sign_schnorr(&nonce).expect("sign");
    let proof_bytes = bincode::serialize(&proof).expect("serialize proof");

    let sk2: SigningKey = bincode::deserialize(&sk_bytes).expect("deserialize sk");
    let vk2: VerifyingKey = bincode::deserialize(&vk_bytes).expect("deserialize vk");
    let proof2: SchnorrProof = bincode::deserialize(&proof_bytes).expect("deserialize proof");
    assert_eq!(sk2, sk);

    assert!(vk2.verify_schnorr(&nonce, &proof2).expect("verify"));
    for key in [&vk2.to_compressed()[..], &vk2.x_only()[..]] {
        let outcome = SchnorrVerifier.verify(key, &proof2.to_bytes(), &nonce);
        println!("schnorr ({} byte key): {outcome}", key.len());
    }

    let sig = sk.sign_ecdsa(&nonce).expect("sign");
    let sig_bytes = bincode::serialize(&sig).expect("serialize sig");
    let sig2: EcdsaSignature = bincode::deserialize(&sig_bytes).expect("deserialize sig");
    let outcome = EcdsaVerifier.verify(&vk2.to_compressed(), &sig2.to_der(), &nonce);
    println!("ecdsa: {outcome} der={}", hex::encode(sig2.to_der()));
}
