//! Signing and verifying keys over secp256k1.
//!
//! Only [`VerifyingKey`] is used on the server path. [`SigningKey`] exists so
//! clients, tests and demos can produce proofs the verifiers accept.

use core::fmt;

use curve::{Affine, Group, RandomField, ScalarField, decode_compressed, decode_point};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::{PK_SIZE, SK_SIZE, X_ONLY_PK_SIZE};
use crate::errors::SignatureError;
use crate::signatures::{EcdsaSignature, SchnorrProof, challenge_hash, message_scalar};

/// A secret signing key.
///
/// The signing key is a non-zero scalar modulo the group order n. Its
/// `Debug` output is redacted.
///
/// # Example
///
/// ```
/// use verifier::SigningKey;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let signing_key = SigningKey::random(&mut rng);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningKey {
    scalar: ScalarField,
}

/// A public verifying key.
///
/// The verifying key is a point on secp256k1 other than the identity,
/// derived from the signing key as `G * sk` or decoded from a compressed
/// or x-only encoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyingKey {
    point: Affine,
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("scalar", &"<redacted>")
            .finish()
    }
}

fn nonce_from_hash(parts: &[&[u8]]) -> Result<ScalarField, SignatureError> {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let digest: [u8; 32] = hasher.finalize().into();
    let k = ScalarField::from_be_bytes_reduced(&digest);
    if k.is_zero() {
        return Err(SignatureError::InvalidNonce);
    }
    Ok(k)
}

impl SigningKey {
    /// Generates a random signing key using the provided random number generator.
    ///
    /// # Arguments
    ///
    /// * `rng` - A cryptographically secure random number generator
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            scalar: ScalarField::random_nonzero(rng),
        }
    }

    /// Imports a big-endian secret scalar.
    ///
    /// # Returns
    ///
    /// `Err(SignatureError::ScalarOutOfRange)` if the value is zero or `>= n`.
    pub fn from_bytes(bytes: &[u8; SK_SIZE]) -> Result<Self, SignatureError> {
        match ScalarField::from_be_bytes(bytes) {
            Some(scalar) if !scalar.is_zero() => Ok(Self { scalar }),
            _ => Err(SignatureError::ScalarOutOfRange),
        }
    }

    pub fn to_bytes(&self) -> [u8; SK_SIZE] {
        self.scalar.to_be_bytes()
    }

    /// Derives the public verifying key `G * sk`.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey {
            point: <Affine as Group>::mul_generator(&self.scalar),
        }
    }

    /// Returns the key whose public point has an even y-coordinate.
    ///
    /// An x-only verifying key always lifts to the even-y point, so a key
    /// that will be presented in x-only form must be normalized first.
    pub fn normalized_for_x_only(&self) -> Self {
        if self.verifying_key().point.has_even_y() {
            *self
        } else {
            Self {
                scalar: -self.scalar,
            }
        }
    }

    /// Produces a Schnorr proof over `msg` with the deterministic nonce
    /// `k = SHA256(sk || msg) mod n`.
    ///
    /// The proof is `(x(G * k), k + e * sk)` with
    /// `e = SHA256(x(G * k) || x(P) || msg) mod n`.
    ///
    /// # Returns
    ///
    /// `Err(SignatureError::InvalidNonce)` if the derived nonce is zero.
    pub fn sign_schnorr(&self, msg: &[u8]) -> Result<SchnorrProof, SignatureError> {
        let k = nonce_from_hash(&[&self.scalar.to_be_bytes()[..], msg])?;
        self.schnorr_with_nonce(&k, msg)
    }

    /// Produces a Schnorr proof over `msg` with a nonce drawn from `rng`.
    pub fn sign_schnorr_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        msg: &[u8],
    ) -> Result<SchnorrProof, SignatureError> {
        let k = ScalarField::random_nonzero(rng);
        self.schnorr_with_nonce(&k, msg)
    }

    fn schnorr_with_nonce(
        &self,
        k: &ScalarField,
        msg: &[u8],
    ) -> Result<SchnorrProof, SignatureError> {
        let commitment = <Affine as Group>::mul_generator(k);
        let r = commitment.to_x_only().ok_or(SignatureError::InvalidNonce)?;

        let pk = self.verifying_key();
        let e = challenge_hash(&r, &pk.x_only(), msg);
        let s = *k + e * self.scalar;

        Ok(SchnorrProof { r, s })
    }

    /// Produces an ECDSA signature over `SHA256(msg)` with the deterministic
    /// nonce `k = SHA256(sk || SHA256(msg)) mod n`.
    pub fn sign_ecdsa(&self, msg: &[u8]) -> Result<EcdsaSignature, SignatureError> {
        let digest: [u8; 32] = Sha256::digest(msg).into();
        let z = ScalarField::from_be_bytes_reduced(&digest);
        let k = nonce_from_hash(&[&self.scalar.to_be_bytes()[..], &digest[..]])?;

        let commitment = <Affine as Group>::mul_generator(&k);
        let x = commitment.to_x_only().ok_or(SignatureError::InvalidNonce)?;
        let r = ScalarField::from_be_bytes_reduced(&x);
        let s = k.inverse() * (z + r * self.scalar);
        if r.is_zero() || s.is_zero() {
            return Err(SignatureError::InvalidNonce);
        }

        Ok(EcdsaSignature { r, s })
    }
}

impl VerifyingKey {
    /// Decodes a 33-byte compressed or 32-byte x-only key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        Self::from_affine(decode_point(bytes)?)
    }

    /// Decodes a strict 33-byte compressed key; x-only keys are rejected.
    pub fn from_compressed(bytes: &[u8]) -> Result<Self, SignatureError> {
        Self::from_affine(decode_compressed(bytes)?)
    }

    /// Wraps a curve point, rejecting the identity.
    pub fn from_affine(point: Affine) -> Result<Self, SignatureError> {
        if point.is_infinity() {
            return Err(SignatureError::InvalidPoint);
        }
        Ok(Self { point })
    }

    pub fn as_affine(&self) -> &Affine {
        &self.point
    }

    /// Compressed SEC1 encoding.
    pub fn to_compressed(&self) -> [u8; PK_SIZE] {
        let mut out = [0u8; PK_SIZE];
        out[0] = if self.point.y.is_odd() { 0x03 } else { 0x02 };
        out[1..].copy_from_slice(&self.point.x.to_be_bytes());
        out
    }

    /// The x-coordinate alone, as hashed into the Schnorr challenge.
    pub fn x_only(&self) -> [u8; X_ONLY_PK_SIZE] {
        self.point.x.to_be_bytes()
    }

    /// Verifies a Schnorr proof on a message using this verifying key.
    ///
    /// Recomputes `e = SHA256(r || x(P) || msg) mod n` and
    /// `R' = G * s - P * e`, then compares `x(R')` with `r`.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the proof is valid
    /// - `Ok(false)` if `R'` is the identity or its x-coordinate differs from `r`
    ///
    /// # Example
    ///
    /// ```
    /// use verifier::SigningKey;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let signing_key = SigningKey::random(&mut rng);
    /// let verifying_key = signing_key.verifying_key();
    ///
    /// let proof = signing_key.sign_schnorr(b"nonce").expect("signing failed");
    /// assert!(verifying_key.verify_schnorr(b"nonce", &proof).expect("verification failed"));
    /// ```
    pub fn verify_schnorr(&self, msg: &[u8], proof: &SchnorrProof) -> Result<bool, SignatureError> {
        if self.point.is_infinity() {
            return Err(SignatureError::InvalidPoint);
        }

        let e = challenge_hash(&proof.r, &self.x_only(), msg);
        let recomputed = Affine::double_scalar_mul_basepoint(&proof.s, &-e, &self.point);

        Ok(recomputed
            .to_x_only()
            .is_some_and(|x| x == proof.r))
    }

    /// Verifies an ECDSA signature over `SHA256(msg)`.
    ///
    /// Computes `R = G * (z / s) + P * (r / s)` and accepts iff
    /// `x(R) mod n == r`.
    pub fn verify_ecdsa(&self, msg: &[u8], sig: &EcdsaSignature) -> Result<bool, SignatureError> {
        if self.point.is_infinity() {
            return Err(SignatureError::InvalidPoint);
        }
        if sig.r.is_zero() || sig.s.is_zero() {
            return Err(SignatureError::ScalarOutOfRange);
        }

        let z = message_scalar(msg);
        let s_inv = sig.s.inverse();
        let u1 = z * s_inv;
        let u2 = sig.r * s_inv;
        let recomputed = Affine::double_scalar_mul_basepoint(&u1, &u2, &self.point);

        Ok(recomputed
            .to_x_only()
            .is_some_and(|x| ScalarField::from_be_bytes_reduced(&x) == sig.r))
    }
}

impl From<&SigningKey> for VerifyingKey {
    fn from(sk: &SigningKey) -> Self {
        sk.verifying_key()
    }
}
