use std::sync::Arc;

use auth::{
    AuthConfig, Authenticator, ChallengeRequest, EcdsaLogin, LoginRequest, LoginService,
    MemoryDirectory, SchnorrLogin, SubjectKey,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;
use verifier::{SigningKey, VerifierMode};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let config = AuthConfig::from_env()?;
    tracing::info!(ttl_secs = config.challenge_ttl.as_secs(), verifier = %config.verifier, "starting");

    let signer = SigningKey::random(&mut StdRng::seed_from_u64(2024));
    let pubkey = hex::encode(signer.verifying_key().to_compressed());

    let directory = MemoryDirectory::new();
    directory.register(SubjectKey::from_compressed_hex(&pubkey)?, "alice");
    let service = LoginService::new(Authenticator::new(&config), Arc::new(directory));

    let challenge = service.challenge(&ChallengeRequest {
        pubkey: pubkey.clone(),
    })?;
    println!("challenge: {}", serde_json::to_string(&challenge)?);

    let nonce = hex::decode(&challenge.challenge_hex)?;
    let request = match config.verifier {
        VerifierMode::Schnorr => {
            let proof = signer.sign_schnorr(&nonce)?;
            LoginRequest::Schnorr(SchnorrLogin {
                pubkey,
                r_hex: proof.r_hex(),
                s_hex: proof.s_hex(),
                challenge_hex: challenge.challenge_hex,
            })
        }
        VerifierMode::Ecdsa => LoginRequest::Ecdsa(EcdsaLogin {
            pubkey,
            signature_der: hex::encode(signer.sign_ecdsa(&nonce)?.to_der()),
            challenge_hex: challenge.challenge_hex,
        }),
    };
    println!("request: {}", serde_json::to_string(&request)?);

    let first = service.login(&request)?;
    println!("first attempt: {}", serde_json::to_string(&first)?);

    let replay = service.login(&request)?;
    println!("replayed attempt: {}", serde_json::to_string(&replay)?);

    Ok(())
}
