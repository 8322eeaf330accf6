//! Classical ECDH used as a KEM.
//!
//! Encapsulation generates an ephemeral key pair; the ciphertext is the
//! ephemeral public key and the shared secret the raw Diffie-Hellman output.
//! NIST curve points use uncompressed SEC1 encoding.

use crate::kem::{expect_len, Encapsulated, Kem, KemKeypair, KemSizes, SharedSecret};
use crate::{Error, Result};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use rand::RngCore;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};
use zeroize::Zeroizing;

pub const X25519_SIZES: KemSizes = KemSizes { public_key: 32, secret_key: 32, ciphertext: 32, shared_secret: 32 };
pub const P256_SIZES: KemSizes = KemSizes { public_key: 65, secret_key: 32, ciphertext: 65, shared_secret: 32 };
pub const P384_SIZES: KemSizes = KemSizes { public_key: 97, secret_key: 48, ciphertext: 97, shared_secret: 48 };
pub const P521_SIZES: KemSizes = KemSizes { public_key: 133, secret_key: 66, ciphertext: 133, shared_secret: 66 };
pub const X448_SIZES: KemSizes = KemSizes { public_key: 56, secret_key: 56, ciphertext: 56, shared_secret: 56 };

/// Classical partner backend by hybrid prefix (`x25519`, `x448`, `p256`,
/// `p384`, `p521`).
pub fn lookup(prefix: &str) -> Option<Box<dyn Kem>> {
    match prefix {
        "x25519" => Some(Box::new(X25519)),
        "x448" => Some(Box::new(X448)),
        "p256" => Some(Box::new(P256)),
        "p384" => Some(Box::new(P384)),
        "p521" => Some(Box::new(P521)),
        _ => None,
    }
}

fn array32(bytes: &[u8], err: fn(String) -> Error, what: &str) -> Result<[u8; 32]> {
    bytes.try_into().map_err(|_| err(format!("x25519 {what}: expected 32 bytes, got {}", bytes.len())))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct X25519;

impl Kem for X25519 {
    fn name(&self) -> &str {
        "x25519"
    }

    fn sizes(&self) -> KemSizes {
        X25519_SIZES
    }

    fn keypair(&self) -> Result<KemKeypair> {
        let sk = StaticSecret::random_from_rng(OsRng);
        let pk = PublicKey::from(&sk);
        Ok(KemKeypair::new(pk.as_bytes().to_vec(), sk.to_bytes().to_vec()))
    }

    fn encapsulate(&self, public_key: &[u8]) -> Result<Encapsulated> {
        let peer = PublicKey::from(array32(public_key, Error::InvalidKey, "public key")?);
        let eph = EphemeralSecret::random_from_rng(OsRng);
        let ct = PublicKey::from(&eph);
        let ss = eph.diffie_hellman(&peer);
        if !ss.was_contributory() {
            return Err(Error::InvalidKey("x25519 public key is a low-order point".into()));
        }
        Ok(Encapsulated { ciphertext: ct.as_bytes().to_vec(), shared_secret: SharedSecret::new(ss.as_bytes().to_vec()) })
    }

    fn decapsulate(&self, secret_key: &[u8], ciphertext: &[u8]) -> Result<SharedSecret> {
        let sk = StaticSecret::from(array32(secret_key, Error::InvalidKey, "secret key")?);
        let peer = PublicKey::from(array32(ciphertext, Error::InvalidCiphertext, "ciphertext")?);
        let ss = sk.diffie_hellman(&peer);
        if !ss.was_contributory() {
            return Err(Error::InvalidCiphertext("x25519 ciphertext is a low-order point".into()));
        }
        Ok(SharedSecret::new(ss.as_bytes().to_vec()))
    }
}

/// X448 (RFC 7748). Low-order points are refused when parsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct X448;

impl X448 {
    fn secret(bytes: &[u8]) -> Result<x448::Secret> {
        expect_len("x448 secret key", bytes.len(), X448_SIZES.secret_key, Error::InvalidKey)?;
        x448::Secret::from_bytes(bytes).ok_or_else(|| Error::InvalidKey("x448 secret key".into()))
    }

    fn random_secret() -> Result<x448::Secret> {
        let mut raw = Zeroizing::new([0u8; 56]);
        OsRng.fill_bytes(&mut raw[..]);
        Self::secret(&raw[..])
    }
}

impl Kem for X448 {
    fn name(&self) -> &str {
        "x448"
    }

    fn sizes(&self) -> KemSizes {
        X448_SIZES
    }

    fn keypair(&self) -> Result<KemKeypair> {
        let sk = Self::random_secret()?;
        let pk = x448::PublicKey::from(&sk);
        Ok(KemKeypair::new(pk.as_bytes().to_vec(), sk.as_bytes().to_vec()))
    }

    fn encapsulate(&self, public_key: &[u8]) -> Result<Encapsulated> {
        expect_len("x448 public key", public_key.len(), X448_SIZES.public_key, Error::InvalidKey)?;
        let peer = x448::PublicKey::from_bytes(public_key)
            .ok_or_else(|| Error::InvalidKey("x448 public key is a low-order point".into()))?;
        let eph = Self::random_secret()?;
        let ct = x448::PublicKey::from(&eph);
        let ss = eph
            .as_diffie_hellman(&peer)
            .ok_or_else(|| Error::Crypto("x448 key agreement produced no secret".into()))?;
        Ok(Encapsulated { ciphertext: ct.as_bytes().to_vec(), shared_secret: SharedSecret::new(ss.as_bytes().to_vec()) })
    }

    fn decapsulate(&self, secret_key: &[u8], ciphertext: &[u8]) -> Result<SharedSecret> {
        let sk = Self::secret(secret_key)?;
        expect_len("x448 ciphertext", ciphertext.len(), X448_SIZES.ciphertext, Error::InvalidCiphertext)?;
        let peer = x448::PublicKey::from_bytes(ciphertext)
            .ok_or_else(|| Error::InvalidCiphertext("x448 ciphertext is a low-order point".into()))?;
        let ss = sk
            .as_diffie_hellman(&peer)
            .ok_or_else(|| Error::InvalidCiphertext("x448 key agreement produced no secret".into()))?;
        Ok(SharedSecret::new(ss.as_bytes().to_vec()))
    }
}

macro_rules! nist_curve {
    ($ty:ident, $curve:ident, $name:literal, $sizes:expr) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        impl Kem for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn sizes(&self) -> KemSizes {
                $sizes
            }

            fn keypair(&self) -> Result<KemKeypair> {
                let sk = $curve::SecretKey::random(&mut OsRng);
                let pk = sk.public_key().to_encoded_point(false);
                Ok(KemKeypair::new(pk.as_bytes().to_vec(), sk.to_bytes().to_vec()))
            }

            fn encapsulate(&self, public_key: &[u8]) -> Result<Encapsulated> {
                expect_len(concat!($name, " public key"), public_key.len(), $sizes.public_key, Error::InvalidKey)?;
                let peer = $curve::PublicKey::from_sec1_bytes(public_key)
                    .map_err(|_| Error::InvalidKey(concat!($name, ": point not on curve").into()))?;
                let eph = $curve::ecdh::EphemeralSecret::random(&mut OsRng);
                let ct = eph.public_key().to_encoded_point(false);
                let ss = eph.diffie_hellman(&peer);
                Ok(Encapsulated {
                    ciphertext: ct.as_bytes().to_vec(),
                    shared_secret: SharedSecret::new(ss.raw_secret_bytes().to_vec()),
                })
            }

            fn decapsulate(&self, secret_key: &[u8], ciphertext: &[u8]) -> Result<SharedSecret> {
                expect_len(concat!($name, " ciphertext"), ciphertext.len(), $sizes.ciphertext, Error::InvalidCiphertext)?;
                let sk = $curve::SecretKey::from_slice(secret_key)
                    .map_err(|_| Error::InvalidKey(concat!($name, ": invalid scalar").into()))?;
                let peer = $curve::PublicKey::from_sec1_bytes(ciphertext)
                    .map_err(|_| Error::InvalidCiphertext(concat!($name, ": point not on curve").into()))?;
                let ss = $curve::ecdh::diffie_hellman(sk.to_nonzero_scalar(), peer.as_affine());
                Ok(SharedSecret::new(ss.raw_secret_bytes().to_vec()))
            }
        }
    };
}

nist_curve!(P256, p256, "p256", P256_SIZES);
nist_curve!(P384, p384, "p384", P384_SIZES);
nist_curve!(P521, p521, "p521", P521_SIZES);

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn x25519_rfc7748_vector() {
        let alice_sk = hex!("77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a");
        let bob_pk = hex!("de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f");
        let expected = hex!("4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742");
        let ss = X25519.decapsulate(&alice_sk, &bob_pk).unwrap();
        assert_eq!(ss.as_bytes(), &expected[..]);
    }

    #[test]
    fn curves_round_trip_with_declared_sizes() {
        for kem in ["x25519", "x448", "p256", "p384", "p521"].into_iter().filter_map(lookup) {
            let sizes = kem.sizes();
            let kp = kem.keypair().unwrap();
            assert_eq!(kp.public_key.len(), sizes.public_key, "{}", kem.name());
            assert_eq!(kp.secret_key.len(), sizes.secret_key, "{}", kem.name());
            let enc = kem.encapsulate(&kp.public_key).unwrap();
            assert_eq!(enc.ciphertext.len(), sizes.ciphertext);
            assert_eq!(enc.shared_secret.len(), sizes.shared_secret);
            assert_eq!(kem.decapsulate(&kp.secret_key, &enc.ciphertext).unwrap(), enc.shared_secret);
        }
    }

    #[test]
    fn tampered_nist_point_is_rejected() {
        let kp = P256.keypair().unwrap();
        let mut ct = P256.encapsulate(&kp.public_key).unwrap().ciphertext;
        ct[0] = !ct[0];
        assert!(matches!(P256.decapsulate(&kp.secret_key, &ct), Err(Error::InvalidCiphertext(_))));
    }

    #[test]
    fn x448_rfc7748_vector() {
        let alice_sk = hex!(
            "9a8f4925d1519f5775cf46b04b5800d4ee9ee8bae8bc5565d498c28dd9c9baf574a9419744897391006382a6f127ab1d9ac2d8c0a598726b"
        );
        let bob_pk = hex!(
            "3eb7a829b0cd20f5bcfc0b599b6feccf6da4627107bdb0d4f345b43027d8b972fc3e34fb4232a13ca706dcb57aec3dae07bdc1c67bf33609"
        );
        let expected = hex!(
            "07fff4181ac6cc95ec1c16a94a0f74d12da232ce40a77552281d282bb60c0b56fd2464c335543936521c24403085d59a449a5037514a879d"
        );
        let ss = X448.decapsulate(&alice_sk, &bob_pk).unwrap();
        assert_eq!(ss.as_bytes(), &expected[..]);
    }

    #[test]
    fn low_order_x25519_ciphertext_is_rejected() {
        let kp = X25519.keypair().unwrap();
        let identity = [0u8; 32];
        assert!(matches!(X25519.decapsulate(&kp.secret_key, &identity), Err(Error::InvalidCiphertext(_))));
    }

    #[test]
    fn low_order_x448_ciphertext_is_rejected() {
        let kp = X448.keypair().unwrap();
        let identity = [0u8; 56];
        assert!(matches!(X448.decapsulate(&kp.secret_key, &identity), Err(Error::InvalidCiphertext(_))));
    }

    #[test]
    fn unknown_prefixes() {
        assert!(lookup("ed25519").is_none());
        assert!(lookup("rsa3072").is_none());
    }
}
